use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod palette;
mod render;
mod settings;
mod sources;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    // stdout carries the merged log; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();
    commands::run_command(cli)
}

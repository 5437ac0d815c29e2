use std::io::{self, BufWriter, Write};

use anyhow::Context;
use colored::Colorize;
use mergelog_core::{MergeEngine, MergeReport};
use mergelog_types::Stamp;
use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::palette::Palette;
use crate::render::{JsonRenderer, TextRenderer};
use crate::settings::Settings;
use crate::sources::{alias_width, open_sources, resolve_range, SourceArg};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let report = run_merge(&cli, BufWriter::new(stdout.lock()), Stamp::now())?;

    debug!(
        chunks = report.chunks_read,
        emitted = report.entries_emitted,
        continuations = report.continuations_merged,
        orphans = report.orphans_discarded,
        out_of_range = report.out_of_range,
        read_errors = report.read_errors,
        flushes = report.flushes,
        "run report"
    );
    if cli.verbose {
        eprintln!(
            "{} {} entries from {} chunks ({} malformed, {} out of range)",
            "merged".green().bold(),
            report.entries_emitted,
            report.chunks_read,
            report.diagnostics.len().to_string().yellow(),
            report.out_of_range,
        );
    }
    Ok(())
}

/// Resolve settings and sources, merge, and render to `out`.
pub fn run_merge<W: Write>(cli: &Cli, out: W, now: Stamp) -> anyhow::Result<MergeReport> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .with_overrides(cli);

    let range = resolve_range(cli.duration, cli.stop.as_deref(), now)?;
    let palette = Palette::for_scheme(settings.color);
    let args: Vec<SourceArg> = cli.sources.iter().map(|s| SourceArg::parse(s)).collect();
    let specs = open_sources(&args, range, &palette)?;
    let engine = MergeEngine::new(specs, settings.merge)?;

    let report = match cli.format {
        OutputFormat::Text => {
            let mut renderer = TextRenderer::new(out, palette, alias_width(&args));
            let report = engine.run(&mut renderer)?;
            renderer.finish().context("unable to flush output")?;
            report
        }
        OutputFormat::Json => {
            let mut renderer = JsonRenderer::new(out);
            let report = engine.run(&mut renderer)?;
            renderer.finish().context("unable to flush output")?;
            report
        }
    };
    Ok(report)
}

use std::path::PathBuf;

use clap::Parser;
use mergelog_core::Chunking;

use crate::palette::ColorScheme;

#[derive(Parser, Debug)]
#[command(
    name = "mergelog",
    about = "Merge time-ordered log files into one chronological stream",
    version
)]
pub struct Cli {
    /// Log files to merge, as `path` or `alias:path`
    #[arg(required = true, value_name = "[ALIAS:]PATH")]
    pub sources: Vec<String>,

    /// Color scheme to use
    #[arg(long, value_enum)]
    pub color: Option<ColorScheme>,

    /// Length of the time window in seconds, ending at --stop (or now)
    #[arg(long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// End of the time window, e.g. "2015/01/02 15:04:05.000 UTC"
    #[arg(long, value_name = "STAMP")]
    pub stop: Option<String>,

    /// Chunks read across all sources between flushes
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// How lines are grouped into chunks before classification
    #[arg(long, value_enum)]
    pub chunking: Option<ChunkingArg>,

    /// TOML file with default settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ChunkingArg {
    Grouped,
    Line,
}

impl From<ChunkingArg> for Chunking {
    fn from(arg: ChunkingArg) -> Self {
        match arg {
            ChunkingArg::Grouped => Chunking::Grouped,
            ChunkingArg::Line => Chunking::Line,
        }
    }
}

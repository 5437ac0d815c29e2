use std::fs;
use std::path::Path;

use anyhow::Context;
use mergelog_core::MergeConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::palette::ColorScheme;

/// Defaults read from a `--config` TOML file.
///
/// ```toml
/// color = "light"
///
/// [merge]
/// batch_size = 500
/// chunking = "line"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub color: ColorScheme,
    pub merge: MergeConfig,
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Layer explicit command-line flags over the file values.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(color) = cli.color {
            self.color = color;
        }
        if let Some(batch_size) = cli.batch_size {
            self.merge.batch_size = batch_size;
        }
        if let Some(chunking) = cli.chunking {
            self.merge.chunking = chunking.into();
        }
        self
    }
}

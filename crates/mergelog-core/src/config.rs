use serde::{Deserialize, Serialize};

use crate::error::{MergeError, Result};

/// Number of chunks processed between flush attempts.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// How a source's lines are grouped into chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chunking {
    /// A timed header line plus every following non-header line.
    #[default]
    Grouped,
    /// Every line is its own chunk; continuation lines are attached by the
    /// engine instead of the reader.
    Line,
}

/// Configuration for the [`MergeEngine`](crate::MergeEngine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Chunks processed, across all sources, before the buffer is drained
    /// up to the watermark.
    pub batch_size: usize,
    /// Chunk boundary rule applied to every source.
    pub chunking: Chunking,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            chunking: Chunking::default(),
        }
    }
}

impl MergeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(MergeError::InvalidConfig(
                "batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = MergeConfig::default();
        assert_eq!(c.batch_size, 1000);
        assert_eq!(c.chunking, Chunking::Grouped);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_batch_rejected() {
        let c = MergeConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(MergeError::InvalidConfig(_))));
    }
}

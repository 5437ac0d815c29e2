use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stamp::Stamp;

/// Opaque rendering hint attached to every entry of one source.
///
/// Assigned once per source when the run is set up (the CLI uses it as a
/// palette index). The merge engine carries it through untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayToken(pub usize);

impl fmt::Display for DisplayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One logical log record.
///
/// The stamp is fixed when the entry is created from its timed header line.
/// The body holds the header line plus any continuation lines, joined with
/// `\n`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Alias of the source this entry was read from.
    pub source_alias: String,
    /// Stamp parsed from the header line.
    pub timestamp: Stamp,
    /// Header line and continuation lines.
    pub body: String,
    /// Rendering hint of the originating source.
    pub display_token: DisplayToken,
}

impl LogEntry {
    pub fn new(
        source_alias: impl Into<String>,
        timestamp: Stamp,
        body: impl Into<String>,
        display_token: DisplayToken,
    ) -> Self {
        Self {
            source_alias: source_alias.into(),
            timestamp,
            body: body.into(),
            display_token,
        }
    }

    /// Append continuation text as one or more additional lines.
    pub fn append(&mut self, text: &str) {
        self.body.push('\n');
        self.body.push_str(text);
    }

    /// Body lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body.split('\n')
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }
}

//! Classification of raw chunks into timed entries and continuation text.
//!
//! A timed header line looks like
//!
//! ```text
//! [I 2015/01/02 15:04:05.123 UTC server.go:88] listening on :8080
//! ```
//!
//! a bracket-opened tag word, a stamp of exactly three space-terminated
//! tokens, then anything. Only the first line of a chunk is inspected.

use std::sync::LazyLock;

use mergelog_types::Stamp;
use regex::Regex;

static ENTRY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[0-9A-Za-z_]+ (([^ ]* ){3}).*")
        .expect("ENTRY_HEADER is a valid static regex pattern")
});

/// Outcome of classifying one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedChunk {
    /// Header line with a valid stamp. `body` is the whole chunk.
    Timed { stamp: Stamp, body: String },
    /// No header line: text belonging to the previous entry of the source.
    Continuation { body: String },
    /// Header shape matched but the stamp did not parse.
    Malformed { stamp_text: String, reason: String },
}

/// Stateless chunk classifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntryParser;

impl EntryParser {
    pub fn new() -> Self {
        Self
    }

    /// Whether `line` has the shape of a timed header line.
    ///
    /// Used by [`SourceReader`](crate::SourceReader) as its chunk boundary.
    pub fn is_entry_start(line: &str) -> bool {
        ENTRY_HEADER.is_match(line)
    }

    /// The trimmed stamp field of a header line, if `line` is one.
    pub fn stamp_field(line: &str) -> Option<&str> {
        ENTRY_HEADER
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }

    /// Classify a chunk by its first line.
    pub fn classify(&self, chunk: String) -> ParsedChunk {
        let first_line = chunk.split('\n').next().unwrap_or_default();
        let Some(stamp_text) = Self::stamp_field(first_line) else {
            return ParsedChunk::Continuation { body: chunk };
        };

        match Stamp::parse(stamp_text) {
            Ok(stamp) => ParsedChunk::Timed { stamp, body: chunk },
            Err(e) => ParsedChunk::Malformed {
                stamp_text: stamp_text.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

use std::fmt;
use std::io::{self, BufRead};

use mergelog_types::{DisplayToken, Stamp};
use tracing::debug;

use crate::buffer::EntryHandle;
use crate::config::Chunking;
use crate::parser::EntryParser;
use crate::range::RangeFilter;
use crate::reader::SourceReader;

/// Resolved configuration for one input stream, handed to the engine.
pub struct SourceSpec {
    pub alias: String,
    pub input: Box<dyn BufRead>,
    pub range: RangeFilter,
    pub display_token: DisplayToken,
}

impl SourceSpec {
    /// A source with an unbounded range and the default display token.
    pub fn new(alias: impl Into<String>, input: impl BufRead + 'static) -> Self {
        Self {
            alias: alias.into(),
            input: Box::new(input),
            range: RangeFilter::unbounded(),
            display_token: DisplayToken::default(),
        }
    }

    pub fn with_range(mut self, range: RangeFilter) -> Self {
        self.range = range;
        self
    }

    pub fn with_display_token(mut self, token: DisplayToken) -> Self {
        self.display_token = token;
        self
    }
}

impl fmt::Debug for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSpec")
            .field("alias", &self.alias)
            .field("range", &self.range)
            .field("display_token", &self.display_token)
            .finish_non_exhaustive()
    }
}

/// Per-source cursor owned by the engine.
#[derive(Debug)]
pub(crate) struct SourceState {
    pub alias: String,
    /// `None` once the source is closed; dropping it releases the input.
    reader: Option<SourceReader<Box<dyn BufRead>>>,
    pub range: RangeFilter,
    pub display_token: DisplayToken,
    /// Last stamp observed from this source, `Stamp::MIN` until the first.
    pub last_read: Stamp,
    /// This source's most recent entry still eligible for continuation text.
    pub last_entry: Option<EntryHandle>,
    pub chunks_read: u64,
}

impl SourceState {
    pub fn open(spec: SourceSpec, chunking: Chunking) -> Self {
        Self {
            alias: spec.alias,
            reader: Some(SourceReader::new(
                spec.input,
                chunking,
                EntryParser::is_entry_start,
            )),
            range: spec.range,
            display_token: spec.display_token,
            last_read: Stamp::MIN,
            last_entry: None,
            chunks_read: 0,
        }
    }

    /// Next chunk from the source; `Ok(None)` at EOF or once closed.
    pub fn read_chunk(&mut self) -> io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let chunk = reader.next_chunk()?;
        if chunk.is_some() {
            self.chunks_read += 1;
        }
        Ok(chunk)
    }

    pub fn close(&mut self) {
        if let Some(reader) = self.reader.take() {
            debug!(
                source = %self.alias,
                chunks = self.chunks_read,
                lines = reader.lines_read(),
                "source closed"
            );
        }
    }
}

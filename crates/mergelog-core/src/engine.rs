use mergelog_types::{LogEntry, Stamp};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::buffer::MergeBuffer;
use crate::config::MergeConfig;
use crate::error::Result;
use crate::parser::{EntryParser, ParsedChunk};
use crate::source::{SourceSpec, SourceState};

/// Receiver of finalized entries, in emission order.
pub trait EntrySink {
    fn emit(&mut self, entry: LogEntry) -> Result<()>;
}

impl EntrySink for Vec<LogEntry> {
    fn emit(&mut self, entry: LogEntry) -> Result<()> {
        self.push(entry);
        Ok(())
    }
}

/// A header line whose stamp could not be parsed. The chunk was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Alias of the source the chunk came from.
    pub source: String,
    /// The raw stamp field.
    pub stamp_text: String,
    pub reason: String,
}

/// Counters and diagnostics collected over one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Chunks read across all sources.
    pub chunks_read: u64,
    /// Entries handed to the sink.
    pub entries_emitted: u64,
    /// Continuation chunks appended to an existing entry.
    pub continuations_merged: u64,
    /// Continuation chunks with no entry to extend.
    pub orphans_discarded: u64,
    /// Timed chunks outside their source's range.
    pub out_of_range: u64,
    /// Sources closed because of a read error.
    pub read_errors: u64,
    /// Buffer drains, including the final one.
    pub flushes: u64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Round-robin merge of several time-ordered sources.
///
/// Each round reads one chunk from every open source, newest source index
/// first so exhausted sources can be removed in place. Every chunk lowers
/// the watermark accumulator to its source's last observed stamp. Once
/// `batch_size` chunks have been read since the previous flush, entries
/// strictly below the watermark are drained to the sink and the accumulator
/// resets to +infinity.
///
/// The drain is safe because every open source was read during the batch
/// and each source is assumed to be non-decreasing in time: nothing it
/// produces later can sort before the watermark.
pub struct MergeEngine {
    sources: Vec<SourceState>,
    buffer: MergeBuffer,
    parser: EntryParser,
    config: MergeConfig,
    /// Minimum last-read stamp seen since the previous flush.
    watermark: Stamp,
    /// Chunks read since the previous flush.
    since_flush: usize,
    report: MergeReport,
}

impl MergeEngine {
    /// Open every source. Sources keep the order given; equal stamps from
    /// different sources are emitted in the order they were read.
    pub fn new(specs: Vec<SourceSpec>, config: MergeConfig) -> Result<Self> {
        config.validate()?;
        let sources = specs
            .into_iter()
            .map(|spec| SourceState::open(spec, config.chunking))
            .collect();
        Ok(Self {
            sources,
            buffer: MergeBuffer::new(),
            parser: EntryParser::new(),
            config,
            watermark: Stamp::MAX,
            since_flush: 0,
            report: MergeReport::default(),
        })
    }

    /// Drive the merge to completion and return the run report.
    pub fn run<S: EntrySink + ?Sized>(mut self, sink: &mut S) -> Result<MergeReport> {
        info!(
            sources = self.sources.len(),
            batch_size = self.config.batch_size,
            chunking = ?self.config.chunking,
            "merge started"
        );
        while self.step(sink)? {}
        self.finish(sink)?;
        info!(
            chunks = self.report.chunks_read,
            emitted = self.report.entries_emitted,
            malformed = self.report.diagnostics.len(),
            "merge complete"
        );
        Ok(self.report)
    }

    /// Run one round, then flush if a full batch has been read.
    ///
    /// Returns `true` while sources remain open.
    pub fn step<S: EntrySink + ?Sized>(&mut self, sink: &mut S) -> Result<bool> {
        if self.sources.is_empty() {
            return Ok(false);
        }
        self.round();
        if self.since_flush >= self.config.batch_size {
            self.flush(sink)?;
        }
        Ok(!self.sources.is_empty())
    }

    /// Read one chunk from every open source and lower the watermark to the
    /// round's minimum.
    pub fn round(&mut self) {
        let mut round_min = Stamp::MAX;

        for idx in (0..self.sources.len()).rev() {
            let chunk = match self.sources[idx].read_chunk() {
                Ok(Some(chunk)) => chunk,
                Ok(None) => {
                    self.retire(idx);
                    continue;
                }
                Err(e) => {
                    warn!(source = %self.sources[idx].alias, error = %e, "read failed; closing source");
                    self.report.read_errors += 1;
                    self.retire(idx);
                    continue;
                }
            };

            self.since_flush += 1;
            self.report.chunks_read += 1;
            self.ingest(idx, chunk);
            round_min = round_min.min(self.sources[idx].last_read);
        }

        if round_min < self.watermark {
            self.watermark = round_min;
        }
    }

    /// Drain every entry strictly below the watermark, then reset it.
    pub fn flush<S: EntrySink + ?Sized>(&mut self, sink: &mut S) -> Result<usize> {
        let watermark = self.watermark;
        let mut emitted = 0;
        while let Some(entry) = self.buffer.pop_before(watermark) {
            sink.emit(entry)?;
            self.report.entries_emitted += 1;
            emitted += 1;
        }

        debug!(%watermark, emitted, pending = self.buffer.len(), "flush");
        self.watermark = Stamp::MAX;
        self.since_flush = 0;
        self.report.flushes += 1;
        Ok(emitted)
    }

    /// Drain the whole buffer regardless of the watermark.
    pub fn finish<S: EntrySink + ?Sized>(&mut self, sink: &mut S) -> Result<usize> {
        let mut emitted = 0;
        while let Some(entry) = self.buffer.pop_front() {
            sink.emit(entry)?;
            self.report.entries_emitted += 1;
            emitted += 1;
        }

        debug!(emitted, "final flush");
        self.watermark = Stamp::MAX;
        self.since_flush = 0;
        self.report.flushes += 1;
        Ok(emitted)
    }

    /// Number of sources still open.
    pub fn active_sources(&self) -> usize {
        self.sources.len()
    }

    /// Number of entries waiting in the buffer.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Current watermark accumulator; `Stamp::MAX` right after a flush.
    pub fn watermark(&self) -> Stamp {
        self.watermark
    }

    pub fn report(&self) -> &MergeReport {
        &self.report
    }

    /// Classify a chunk and apply it to the buffer.
    fn ingest(&mut self, idx: usize, chunk: String) {
        let source = &mut self.sources[idx];

        match self.parser.classify(chunk) {
            ParsedChunk::Timed { stamp, body } => {
                source.last_read = stamp;
                if !source.range.contains(stamp) {
                    // Continuations of a filtered entry go with it.
                    source.last_entry = None;
                    self.report.out_of_range += 1;
                    return;
                }
                let entry = LogEntry::new(source.alias.clone(), stamp, body, source.display_token);
                source.last_entry = Some(self.buffer.insert(entry));
            }
            ParsedChunk::Continuation { body } => {
                match source.last_entry.filter(|h| self.buffer.append(*h, &body)) {
                    Some(handle) => {
                        source.last_read = handle.stamp();
                        self.report.continuations_merged += 1;
                    }
                    None => {
                        source.last_entry = None;
                        self.report.orphans_discarded += 1;
                        debug!(source = %source.alias, "discarding continuation with no entry to extend");
                    }
                }
            }
            ParsedChunk::Malformed { stamp_text, reason } => {
                warn!(source = %source.alias, stamp = %stamp_text, %reason, "unable to parse date stamp; dropping entry");
                source.last_entry = None;
                self.report.diagnostics.push(Diagnostic {
                    source: source.alias.clone(),
                    stamp_text,
                    reason,
                });
            }
        }
    }

    fn retire(&mut self, idx: usize) {
        let mut source = self.sources.remove(idx);
        source.close();
    }
}

/// Merge `specs` into `sink` with the given configuration.
pub fn merge<S: EntrySink + ?Sized>(
    specs: Vec<SourceSpec>,
    config: MergeConfig,
    sink: &mut S,
) -> Result<MergeReport> {
    MergeEngine::new(specs, config)?.run(sink)
}

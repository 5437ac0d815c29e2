//! Streaming merge engine for mergelog.
//!
//! Interleaves several independently time-ordered log streams into one
//! chronological stream. Each source is read round-robin, one chunk per
//! round; chunks are classified into timed entries and continuation text,
//! held in an ordered [`MergeBuffer`], and released to an [`EntrySink`] only
//! once the cross-source watermark proves no source can still produce an
//! earlier entry.

pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod range;
pub mod reader;
pub mod source;

pub use buffer::{EntryHandle, MergeBuffer};
pub use config::{Chunking, MergeConfig, DEFAULT_BATCH_SIZE};
pub use engine::{merge, Diagnostic, EntrySink, MergeEngine, MergeReport};
pub use error::MergeError;
pub use parser::{EntryParser, ParsedChunk};
pub use range::RangeFilter;
pub use reader::SourceReader;
pub use source::SourceSpec;

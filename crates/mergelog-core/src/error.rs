use std::io;

/// Errors that abort a merge run.
///
/// Per-chunk problems (malformed stamps, orphan continuations, unreadable
/// sources mid-run) are recorded in the run report instead.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// I/O error while handing entries to the sink.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The sink rejected an entry for a reason other than I/O.
    #[error("sink error: {0}")]
    Sink(String),

    /// The engine configuration cannot be used.
    #[error("invalid merge configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, MergeError>;

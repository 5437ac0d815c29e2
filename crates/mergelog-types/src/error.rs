use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid timestamp '{text}': {reason}")]
    InvalidStamp { text: String, reason: String },

    #[error("unknown time zone '{0}'")]
    InvalidZone(String),

    #[error("timestamp '{0}' is outside the representable range")]
    StampOutOfRange(String),
}

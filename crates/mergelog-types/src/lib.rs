//! Foundation types for mergelog.
//!
//! This crate provides the timestamp and entry types shared by the merge
//! engine and the command-line front end.
//!
//! # Key Types
//!
//! - [`Stamp`] — Nanosecond epoch timestamp, parsed from the fixed log stamp format
//! - [`LogEntry`] — One logical log record: source alias, stamp, and multi-line body
//! - [`DisplayToken`] — Opaque per-source rendering hint

pub mod entry;
pub mod error;
pub mod stamp;

pub use entry::{DisplayToken, LogEntry};
pub use error::TypeError;
pub use stamp::{Stamp, STAMP_LAYOUT};

use std::time::Duration;

use mergelog_types::Stamp;
use serde::{Deserialize, Serialize};

/// Inclusive time window a source's entries must fall in to be emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub start: Stamp,
    pub stop: Stamp,
}

impl RangeFilter {
    pub fn new(start: Stamp, stop: Stamp) -> Self {
        Self { start, stop }
    }

    /// A filter that admits every stamp.
    pub fn unbounded() -> Self {
        Self::new(Stamp::MIN, Stamp::MAX)
    }

    /// The window `[stop - duration, stop]`, clamped at [`Stamp::MIN`].
    pub fn window(stop: Stamp, duration: Duration) -> Self {
        Self::new(stop.saturating_sub(duration), stop)
    }

    /// Returns `true` if `stamp` lies within the window, bounds included.
    pub fn contains(&self, stamp: Stamp) -> bool {
        self.start <= stamp && stamp <= self.stop
    }
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self::unbounded()
    }
}

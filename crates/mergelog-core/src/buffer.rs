use std::collections::VecDeque;

use mergelog_types::{LogEntry, Stamp};

/// Non-owning reference to an entry held by a [`MergeBuffer`].
///
/// Resolves to nothing once the entry has been drained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryHandle {
    seq: u64,
    stamp: Stamp,
}

impl EntryHandle {
    /// Stamp of the referenced entry.
    pub fn stamp(&self) -> Stamp {
        self.stamp
    }
}

#[derive(Debug)]
struct Slot {
    /// Insertion sequence number, unique per buffer.
    seq: u64,
    entry: LogEntry,
}

/// Pending entries from all sources, ascending by stamp.
///
/// Equal stamps keep insertion order, so the buffer is strictly ordered by
/// `(stamp, seq)`. That ordering lets a handle be resolved by binary search.
#[derive(Debug, Default)]
pub struct MergeBuffer {
    slots: VecDeque<Slot>,
    next_seq: u64,
}

impl MergeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Insert `entry` after every entry with a stamp less than or equal to
    /// its own.
    ///
    /// The scan runs from the back: sources are read in lockstep, so new
    /// entries usually land at or near the end.
    pub fn insert(&mut self, entry: LogEntry) -> EntryHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let stamp = entry.timestamp;

        let mut at = self.slots.len();
        while at > 0 && self.slots[at - 1].entry.timestamp > stamp {
            at -= 1;
        }
        self.slots.insert(at, Slot { seq, entry });

        EntryHandle { seq, stamp }
    }

    /// Look up a still-buffered entry.
    pub fn get(&self, handle: EntryHandle) -> Option<&LogEntry> {
        self.position(handle).map(|idx| &self.slots[idx].entry)
    }

    /// Append continuation text to a still-buffered entry.
    ///
    /// Returns `false` if the entry has already been drained. The entry's
    /// position does not change.
    pub fn append(&mut self, handle: EntryHandle, text: &str) -> bool {
        match self.position(handle) {
            Some(idx) => {
                self.slots[idx].entry.append(text);
                true
            }
            None => false,
        }
    }

    /// Stamp of the earliest entry.
    pub fn front_stamp(&self) -> Option<Stamp> {
        self.slots.front().map(|slot| slot.entry.timestamp)
    }

    /// Remove and return the earliest entry if its stamp is strictly below
    /// `watermark`.
    pub fn pop_before(&mut self, watermark: Stamp) -> Option<LogEntry> {
        if self.front_stamp()? < watermark {
            self.slots.pop_front().map(|slot| slot.entry)
        } else {
            None
        }
    }

    /// Remove and return the earliest entry unconditionally.
    pub fn pop_front(&mut self) -> Option<LogEntry> {
        self.slots.pop_front().map(|slot| slot.entry)
    }

    /// Buffered entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.slots.iter().map(|slot| &slot.entry)
    }

    fn position(&self, handle: EntryHandle) -> Option<usize> {
        let key = (handle.stamp, handle.seq);
        let idx = self
            .slots
            .partition_point(|slot| (slot.entry.timestamp, slot.seq) < key);
        self.slots
            .get(idx)
            .filter(|slot| slot.seq == handle.seq)
            .map(|_| idx)
    }
}

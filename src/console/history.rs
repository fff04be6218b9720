//! Command history with ring buffer
//!
//! Static allocation, `HISTORY_LENGTH` entries of `BUFFER_SIZE` bytes each.
//!
//! Two cursors walk the ring:
//!
//! ```text
//!            insert_idx (newest stored line)
//!                 │
//!   [slot 0][slot 1][slot 2][slot 3]
//!         │
//!     output_idx (next line handed out by an up step)
//! ```
//!
//! `insert_idx` advances before each write, so the first lap fills slots
//! 1..K-1 and slot 0 is only used once the ring wraps. After an up step
//! `output_idx` rests one slot older than the line on screen.

use crate::config::{BUFFER_SIZE, HISTORY_LENGTH};

/// Navigation direction for arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Up arrow: older line
    Up,
    /// Down arrow: back towards newer lines already visited
    Down,
}

/// Command history ring buffer
pub struct History {
    /// Ring buffer of command lines
    entries: [[u8; BUFFER_SIZE]; HISTORY_LENGTH],
    /// Length of each entry
    lengths: [usize; HISTORY_LENGTH],
    /// Slot holding the most recently stored line
    insert_idx: usize,
    /// Set once `insert_idx` has completed a lap
    insert_wrapped: bool,
    /// Navigation cursor
    output_idx: usize,
    /// Set once an up step crossed slot 0 on a wrapped ring
    output_wrapped: bool,
    /// Up steps taken since the last submission
    up_count: usize,
}

impl History {
    /// Create empty history
    pub const fn new() -> Self {
        Self {
            entries: [[0u8; BUFFER_SIZE]; HISTORY_LENGTH],
            lengths: [0; HISTORY_LENGTH],
            insert_idx: 0,
            insert_wrapped: false,
            output_idx: 0,
            output_wrapped: false,
            up_count: 0,
        }
    }

    /// Record a submitted line and reset navigation.
    ///
    /// The line is stored only if it differs from the newest entry, so
    /// consecutive duplicates collapse. Returns the slot written, if any.
    pub fn push(&mut self, line: &[u8]) -> Option<usize> {
        let len = line.len().min(BUFFER_SIZE - 1);
        let line = &line[..len];

        let stored = if !line.is_empty() && line != self.slot(self.insert_idx) {
            if advance(&mut self.insert_idx) {
                self.insert_wrapped = true;
            }
            let slot = &mut self.entries[self.insert_idx];
            slot.fill(0);
            slot[..len].copy_from_slice(line);
            self.lengths[self.insert_idx] = len;
            Some(self.insert_idx)
        } else {
            None
        };

        self.reset_nav();
        stored
    }

    /// Step towards older entries.
    ///
    /// Returns `None` when no older entry exists.
    pub fn get_prev(&mut self) -> Option<&[u8]> {
        if self.output_wrapped && self.output_idx == self.insert_idx {
            return None;
        }
        if !self.insert_wrapped && self.output_idx == 0 {
            return None;
        }

        self.up_count += 1;
        let shown = self.output_idx;

        if self.insert_wrapped {
            if self.output_idx == 0 {
                self.output_idx = HISTORY_LENGTH - 1;
                self.output_wrapped = true;
            } else {
                self.output_idx -= 1;
            }
        } else if self.output_idx != 0 {
            self.output_idx -= 1;
        }

        Some(self.slot(shown))
    }

    /// Step back towards newer entries already visited.
    ///
    /// Only retraces up steps: never moves past the entry shown by the
    /// first up step after a submission.
    pub fn get_next(&mut self) -> Option<&[u8]> {
        if self.up_count <= 1 {
            return None;
        }

        self.up_count -= 1;
        if advance(&mut self.output_idx) {
            self.output_wrapped = false;
        }

        let mut shown = self.output_idx;
        advance(&mut shown);
        Some(self.slot(shown))
    }

    /// Step in `direction`.
    pub fn navigate(&mut self, direction: Direction) -> Option<&[u8]> {
        match direction {
            Direction::Up => self.get_prev(),
            Direction::Down => self.get_next(),
        }
    }

    /// Reset navigation to the newest entry
    pub fn reset_nav(&mut self) {
        self.output_idx = self.insert_idx;
        self.output_wrapped = false;
        self.up_count = 0;
    }

    /// Stored bytes of ring slot `idx`.
    pub fn slot(&self, idx: usize) -> &[u8] {
        let idx = idx % HISTORY_LENGTH;
        &self.entries[idx][..self.lengths[idx]]
    }

    /// Newest stored line, empty if nothing was stored yet.
    pub fn latest(&self) -> &[u8] {
        self.slot(self.insert_idx)
    }

    pub fn insert_index(&self) -> usize {
        self.insert_idx
    }

    pub fn insert_wrapped(&self) -> bool {
        self.insert_wrapped
    }

    pub fn output_index(&self) -> usize {
        self.output_idx
    }

    pub fn output_wrapped(&self) -> bool {
        self.output_wrapped
    }

    pub fn up_count(&self) -> usize {
        self.up_count
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance a ring cursor one slot. Returns `true` when it wrapped to 0.
fn advance(idx: &mut usize) -> bool {
    *idx += 1;
    if *idx == HISTORY_LENGTH {
        *idx = 0;
        true
    } else {
        false
    }
}

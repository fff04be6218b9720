//! Line buffer for console input
//!
//! Fixed `BUFFER_SIZE` bytes. Holds at most `BUFFER_SIZE - 1` characters and
//! keeps a zero terminator at `len`.

use crate::config::BUFFER_SIZE;

/// Line input buffer
pub struct LineBuffer {
    buf: [u8; BUFFER_SIZE],
    len: usize,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; BUFFER_SIZE],
            len: 0,
        }
    }

    /// Append a character.
    ///
    /// Returns `false` when the buffer is full and the byte was dropped.
    pub fn push(&mut self, c: u8) -> bool {
        if self.len >= BUFFER_SIZE - 1 {
            return false;
        }
        self.buf[self.len] = c;
        self.len += 1;
        self.buf[self.len] = 0;
        true
    }

    /// Remove last character
    pub fn backspace(&mut self) {
        if self.len > 0 {
            self.len -= 1;
        }
        self.buf[self.len] = 0;
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.buf.fill(0);
        self.len = 0;
    }

    /// Replace contents, truncating to capacity
    pub fn set(&mut self, bytes: &[u8]) {
        let copy_len = bytes.len().min(BUFFER_SIZE - 1);
        self.buf[..copy_len].copy_from_slice(&bytes[..copy_len]);
        self.len = copy_len;
        self.buf[self.len] = 0;
    }

    /// Shift the contents left over any leading whitespace.
    pub fn strip_leading_whitespace(&mut self) {
        let skip = self.as_bytes().iter().take_while(|b| is_space(**b)).count();
        if skip > 0 {
            self.buf.copy_within(skip..self.len, 0);
            self.len -= skip;
            self.buf[self.len] = 0;
        }
    }

    /// Terminate the contents before any trailing whitespace.
    pub fn strip_trailing_whitespace(&mut self) {
        while self.len > 0 && is_space(self.buf[self.len - 1]) {
            self.len -= 1;
            self.buf[self.len] = 0;
        }
    }

    /// Strip whitespace on both ends.
    pub fn trim(&mut self) {
        self.strip_leading_whitespace();
        self.strip_trailing_whitespace();
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if another character would be dropped
    pub fn is_full(&self) -> bool {
        self.len >= BUFFER_SIZE - 1
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Contents including the terminator
    #[cfg(test)]
    fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.len]
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Token separators: space, tab, CR, LF.
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

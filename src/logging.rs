//! Non-blocking diagnostic log for the console.
//!
//! ```text
//! Console                LogStream            Host loop
//! ───────                ─────────            ─────────
//!
//! console_debug!() ───▶ [L0][L1][L2] ──────▶ drain_to(out)
//! fixed buffer           lock-free            when idle
//! never blocks           ring buffer
//! ```
//!
//! The console never writes diagnostics to its user channels. Entries are
//! stamped with the console tick (bytes processed) instead of wall time, and
//! are dropped, not queued, when the ring is full.

use core::cell::UnsafeCell;
use core::fmt::Write;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 120;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 32;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Console tick at the time of the event.
    pub tick: u32,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        tick: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text.
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }

    /// Format as `[tick] LEVEL: message\r\n`.
    pub fn write_to(&self, out: &mut dyn Write) -> core::fmt::Result {
        write!(out, "[{:10}] {}: {}\r\n", self.tick, self.level.as_str(), self.message())
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One ring slot and its publication stamp.
///
/// The stamp is kept relative to the slot index so every slot starts out as
/// the same constant. For position `pos` mapping to this slot, a stamp of
/// `pos` means free, `pos + 1` means written and ready to drain.
struct Slot {
    seq: AtomicU32,
    entry: UnsafeCell<LogEntry>,
}

impl Slot {
    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY: Self = Self {
        seq: AtomicU32::new(0),
        entry: UnsafeCell::new(LogEntry::EMPTY),
    };

    #[inline]
    fn stamp(&self, idx: usize) -> u32 {
        self.seq.load(Ordering::Acquire).wrapping_add(idx as u32)
    }

    #[inline]
    fn set_stamp(&self, idx: usize, stamp: u32) {
        self.seq.store(stamp.wrapping_sub(idx as u32), Ordering::Release);
    }
}

/// Lock-free log ring: producers push, one consumer drains.
///
/// - Push never blocks (drops message if full)
/// - Drain runs from the host loop at leisure
/// - An entry becomes visible to `drain` only once its producer has finished
///   copying it in, so a slow producer holds back the entries claimed after it
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    slots: [Slot; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: A producer writes a slot only after winning the CAS on write_idx
// for a slot whose stamp says free, and publishes it with a Release store.
// The single consumer reads a slot only after an Acquire load of that stamp.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            slots: [Slot::EMPTY; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry, never blocks.
    ///
    /// Returns `true` if message was queued, `false` if dropped (ring full).
    #[inline]
    pub fn push(&self, tick: u32, level: LogLevel, msg: &[u8]) -> bool {
        let mut pos = self.write_idx.load(Ordering::Relaxed);

        let idx = loop {
            let idx = (pos as usize) & Self::MASK;
            let lag = self.slots[idx].stamp(idx).wrapping_sub(pos) as i32;

            if lag == 0 {
                match self.write_idx.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break idx,
                    Err(current) => pos = current,
                }
            } else if lag < 0 {
                // Slot still holds an undrained entry from the previous lap
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            } else {
                // Another producer claimed `pos` first
                pos = self.write_idx.load(Ordering::Relaxed);
            }
        };

        let slot = &self.slots[idx];

        // SAFETY: winning the CAS for a free slot makes this the only writer,
        // and the consumer will not read it until the stamp below.
        unsafe {
            let entry = &mut *slot.entry.get();
            entry.tick = tick;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        slot.set_stamp(idx, pos.wrapping_add(1));
        true
    }

    /// Drain next log entry.
    ///
    /// Returns `None` if the next entry in order is not yet published.
    /// Only one thread may drain.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let idx = (read as usize) & Self::MASK;
        let slot = &self.slots[idx];

        if slot.stamp(idx) != read.wrapping_add(1) {
            return None;
        }

        // SAFETY: the Acquire stamp load above saw the producer's publish.
        let entry = unsafe { *slot.entry.get() };

        // Free the slot for the producer one lap ahead
        slot.set_stamp(idx, read.wrapping_add(N as u32));
        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Write every pending entry to `out`, then a drop report if any
    /// messages were lost. Returns the number of entries written.
    pub fn drain_to(&self, out: &mut dyn Write) -> usize {
        let mut count = 0;
        while let Some(entry) = self.drain() {
            let _ = entry.write_to(out);
            count += 1;
        }

        let dropped = self.dropped();
        if dropped > 0 {
            let _ = write!(out, "[WARN] Dropped: {}\r\n", dropped);
            self.reset_dropped();
        }
        count
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Check if any entry has been claimed and not yet drained.
    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() > 0
    }

    /// Get number of claimed entries not yet drained, including any a
    /// producer is still writing.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer, truncating at the end.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl Write for BufWriter<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Log macro, formats on the stack and pushes.
///
/// # Example
///
/// ```ignore
/// console_log!(LogLevel::Info, CONSOLE_LOG, tick, "dispatch {}", name);
/// ```
#[macro_export]
macro_rules! console_log {
    ($level:expr, $stream:expr, $tick:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($tick, $level, &buf[..len]);
    }};
}

#[macro_export]
macro_rules! console_info {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Info, $stream, $tick, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_warn {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Warn, $stream, $tick, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_error {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Error, $stream, $tick, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_debug {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Debug, $stream, $tick, $($arg)*)
    };
}

/// Trace log (maximum verbosity).
#[macro_export]
macro_rules! console_trace {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Trace, $stream, $tick, $($arg)*)
    };
}

//! Shared test doubles for the console integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Write;

use rust_serial_console::{Args, Console, ConsoleError, ConsoleIo, Poll};

/// Scripted I/O: queued input, captured output per channel
#[derive(Default)]
pub struct MockIo {
    input: VecDeque<u8>,
    pub out: String,
    pub debug: String,
}

impl MockIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for `read_byte`
    pub fn push(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    /// Take everything written on the normal channel so far
    pub fn take_out(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    /// Take everything written on the debug channel so far
    pub fn take_debug(&mut self) -> String {
        std::mem::take(&mut self.debug)
    }
}

impl ConsoleIo for MockIo {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn print(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn debug_print(&mut self, text: &str) {
        self.debug.push_str(text);
    }
}

/// Queue `bytes` and poll until the input runs dry
pub fn type_bytes(console: &mut Console<'_, MockIo>, bytes: &[u8]) {
    console.io_mut().push(bytes);
    while console.poll() == Poll::Consumed {}
}

/// Up arrow as sent by a terminal
pub const UP: &[u8] = b"\x1b[A";
/// Down arrow as sent by a terminal
pub const DOWN: &[u8] = b"\x1b[B";

thread_local! {
    static CALLS: RefCell<Vec<Vec<String>>> = const { RefCell::new(Vec::new()) };
}

/// Handler that records its argument vector
pub fn record(args: &Args<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    CALLS.with(|calls| {
        calls
            .borrow_mut()
            .push(args.argv().iter().map(|s| s.to_string()).collect())
    });
    let _ = write!(out, "ran {}", args.argc());
    Ok(())
}

/// Handler that always rejects its input
pub fn reject(_args: &Args<'_>, _out: &mut dyn Write) -> Result<(), ConsoleError> {
    Err(ConsoleError::InvalidValue)
}

/// Argument vectors recorded on this thread since the last call
pub fn take_calls() -> Vec<Vec<String>> {
    CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
}

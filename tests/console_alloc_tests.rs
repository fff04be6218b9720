//! Tokenizer allocation failure: the line is dropped, the console survives
//!
//! This binary installs its own global allocator, so it holds a single test:
//! the armed failure is one-shot and must not be consumed by a parallel test.

mod common;

use std::alloc::{GlobalAlloc, Layout, System};
use std::mem::{align_of, size_of};
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{record, take_calls, type_bytes, MockIo};
use rust_serial_console::config::TOKENIZER_INITIAL_CAPACITY;
use rust_serial_console::{Command, Console, LogLevel, LogStream};

/// Allocator that refuses one request for an argument vector of a given size
struct FailingAlloc;

/// Byte size of the next `&str` vector request to refuse; 0 when disarmed
static FAIL_SIZE: AtomicUsize = AtomicUsize::new(0);

impl FailingAlloc {
    fn should_fail(size: usize, align: usize) -> bool {
        align == align_of::<&str>()
            && size != 0
            && FAIL_SIZE
                .compare_exchange(size, 0, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
    }
}

unsafe impl GlobalAlloc for FailingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if Self::should_fail(layout.size(), layout.align()) {
            return std::ptr::null_mut();
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if Self::should_fail(new_size, layout.align()) {
            return std::ptr::null_mut();
        }
        System.realloc(ptr, layout, new_size)
    }
}

#[global_allocator]
static ALLOC: FailingAlloc = FailingAlloc;

/// Refuse the next argument vector holding `slots` tokens
fn fail_next_argv(slots: usize) {
    FAIL_SIZE.store(slots * size_of::<&str>(), Ordering::SeqCst);
}

static COMMANDS: &[Command] = &[Command::new("set", record)];

#[test]
fn test_allocation_failure_drops_line() {
    let log: LogStream = LogStream::new();
    let mut console = Console::new(MockIo::new(), COMMANDS).with_log(&log);

    // Initial reservation refused
    fail_next_argv(TOKENIZER_INITIAL_CAPACITY);
    type_bytes(&mut console, b"set a\r");

    assert_eq!(FAIL_SIZE.load(Ordering::SeqCst), 0, "failure was not hit");
    assert_eq!(console.io_mut().take_debug(), "memory allocation failed\r\n");
    assert_eq!(console.io_mut().take_out(), "set a\r\n\r\n> ");
    assert!(take_calls().is_empty());
    assert!(console.line().is_empty());
    assert_eq!(console.history().latest(), b"set a");

    let entry = std::iter::from_fn(|| log.drain())
        .find(|e| e.level == LogLevel::Error)
        .expect("error logged");
    assert!(entry.message().starts_with("tokenizer:"));

    // Next line goes through
    type_bytes(&mut console, b"set b\r");

    assert_eq!(console.io_mut().take_debug(), "");
    assert_eq!(console.io_mut().take_out(), "set b\r\nran 2\r\n> ");
    assert_eq!(take_calls(), vec![vec!["set".to_string(), "b".to_string()]]);

    // Growth past the initial capacity refused
    let line = "set 1 2 3 4 5 6 7 8 9 10\r";
    fail_next_argv(TOKENIZER_INITIAL_CAPACITY * 2);
    type_bytes(&mut console, line.as_bytes());

    assert_eq!(FAIL_SIZE.load(Ordering::SeqCst), 0, "failure was not hit");
    assert_eq!(console.io_mut().take_debug(), "memory allocation failed\r\n");
    assert!(take_calls().is_empty());

    // Same line again, allocator disarmed
    console.io_mut().take_out();
    type_bytes(&mut console, line.as_bytes());

    assert_eq!(console.io_mut().take_debug(), "");
    let calls = take_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), TOKENIZER_INITIAL_CAPACITY + 1);
}

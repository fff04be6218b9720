//! Line editor tests: echo, editing keys, submission framing

mod common;

use common::{record, take_calls, type_bytes, MockIo, UP};
use rust_serial_console::config::BUFFER_SIZE;
use rust_serial_console::{Command, Console, ConsoleConfig, InputState, LogLevel, LogStream, Poll};
use rust_serial_console::console::commands::CommandFn;

static COMMANDS: &[Command] = &[
    Command::new("set", record),
    Command::new("show", record),
];

fn console() -> Console<'static, MockIo> {
    Console::new(MockIo::new(), COMMANDS)
}

#[test]
fn test_printable_bytes_are_echoed() {
    let mut console = console();

    type_bytes(&mut console, b"show wpm");

    assert_eq!(console.line().as_str(), "show wpm");
    assert_eq!(console.io_mut().take_out(), "show wpm");
}

#[test]
fn test_full_printable_line_submitted_unchanged() {
    let mut console = console();
    let line: Vec<u8> = (0..BUFFER_SIZE - 1).map(|i| b'a' + (i % 26) as u8).collect();

    type_bytes(&mut console, &line);
    assert_eq!(console.line().as_bytes(), &line[..]);
    assert_eq!(console.io_mut().take_out().as_bytes(), &line[..]);

    type_bytes(&mut console, b"\r");
    assert_eq!(console.history().latest(), &line[..]);
}

#[test]
fn test_overflow_bytes_dropped_silently() {
    let mut console = console();

    type_bytes(&mut console, &[b'x'; BUFFER_SIZE + 10]);

    assert_eq!(console.line().len(), BUFFER_SIZE - 1);
    assert_eq!(console.io_mut().take_out().len(), BUFFER_SIZE - 1);
    assert!(console.io().debug.is_empty());
}

#[test]
fn test_backspace_erases() {
    let mut console = console();

    type_bytes(&mut console, b"ab\x7f");
    assert_eq!(console.line().as_str(), "a");
    assert_eq!(console.io_mut().take_out(), "ab\x08 \x08");

    type_bytes(&mut console, b"\x08");
    assert!(console.line().is_empty());
    assert_eq!(console.io_mut().take_out(), "\x08 \x08");
}

#[test]
fn test_backspace_on_empty_line_is_silent() {
    let mut console = console();

    type_bytes(&mut console, b"\x08\x7f");

    assert!(console.line().is_empty());
    assert!(console.io().out.is_empty());
}

#[test]
fn test_empty_enter_reprints_prompt() {
    let mut console = console();

    type_bytes(&mut console, b"\r");

    assert_eq!(console.io_mut().take_out(), "\r\n> ");
    assert_eq!(console.history().insert_index(), 0);
    assert!(take_calls().is_empty());
}

#[test]
fn test_submission_framing_and_dispatch() {
    let mut console = console();

    type_bytes(&mut console, b"set wpm 25\r");

    assert_eq!(console.io_mut().take_out(), "set wpm 25\r\nran 3\r\n> ");
    assert_eq!(take_calls(), vec![vec!["set", "wpm", "25"]]);
    assert!(console.line().is_empty());
}

#[test]
fn test_unknown_command_reported() {
    let mut console = console();

    type_bytes(&mut console, b"frobnicate\r");

    assert_eq!(console.io_mut().take_out(), "frobnicate\r\n\r\n> ");
    assert_eq!(console.io_mut().take_debug(), "command `frobnicate' not found, try `help'\r\n");
    assert!(take_calls().is_empty());
    // Still stored: history does not care whether the command exists
    assert_eq!(console.history().latest(), b"frobnicate");
}

#[test]
fn test_line_trimmed_before_history_and_dispatch() {
    let mut console = console();

    type_bytes(&mut console, b"  set  speed   5 \r");

    assert_eq!(console.history().latest(), b"set  speed   5");
    assert_eq!(take_calls(), vec![vec!["set", "speed", "5"]]);
}

#[test]
fn test_whitespace_only_line_not_stored_or_dispatched() {
    let mut console = console();

    type_bytes(&mut console, b"   \r");

    assert_eq!(console.io_mut().take_out(), "   \r\n\r\n> ");
    assert_eq!(console.history().insert_index(), 0);
    assert!(console.io().debug.is_empty());
    assert!(take_calls().is_empty());
}

#[test]
fn test_help_lists_commands() {
    let mut console = console();

    type_bytes(&mut console, b"help\r");

    assert_eq!(
        console.io_mut().take_out(),
        "help\r\nAvailable commands:\r\n  help\r\n  set\r\n  show\r\n\r\n> "
    );
}

#[test]
fn test_bytes_outside_accepted_range_ignored() {
    let mut console = console();

    type_bytes(&mut console, b"a{|}\t\n\x01\x80b");

    assert_eq!(console.line().as_str(), "ab");
    assert_eq!(console.io_mut().take_out(), "ab");
}

#[test]
fn test_tilde_accepted() {
    let mut console = console();

    type_bytes(&mut console, b"~z");
    assert_eq!(console.line().as_str(), "~z");
}

#[test]
fn test_literal_bracket_starts_escape() {
    let mut console = console();

    type_bytes(&mut console, b"a[bc");

    // '[' and the byte after it are swallowed
    assert_eq!(console.line().as_str(), "ac");
    assert_eq!(console.io_mut().take_out(), "ac");
}

#[test]
fn test_right_left_arrows_ignored() {
    let mut console = console();

    type_bytes(&mut console, b"ab\x1b[C\x1b[D[C[D");

    assert_eq!(console.line().as_str(), "ab");
    assert_eq!(console.state(), InputState::Normal);
}

#[test]
fn test_unknown_escape_final_byte_swallowed() {
    let mut console = console();

    type_bytes(&mut console, b"a\x1b[Zb[~");

    assert_eq!(console.line().as_str(), "ab");
    assert_eq!(console.io_mut().take_out(), "ab");
    assert_eq!(console.state(), InputState::Normal);
}

#[test]
fn test_lone_escape_does_not_eat_next_byte() {
    let mut console = console();

    type_bytes(&mut console, b"\x1bx");

    assert_eq!(console.line().as_str(), "x");
    assert_eq!(console.state(), InputState::Normal);
}

#[test]
fn test_escape_sequence_spans_polls() {
    let mut console = console();
    type_bytes(&mut console, b"show\r");
    console.io_mut().take_out();

    console.io_mut().push(b"\x1b[");
    assert_eq!(console.poll(), Poll::Consumed);
    assert_eq!(console.state(), InputState::AwaitingBracket);
    assert_eq!(console.poll(), Poll::Consumed);
    assert_eq!(console.state(), InputState::AwaitingDirection);

    // No data: state is kept
    assert_eq!(console.poll(), Poll::Idle);
    assert_eq!(console.state(), InputState::AwaitingDirection);

    console.io_mut().push(b"A");
    assert_eq!(console.poll(), Poll::Consumed);
    assert_eq!(console.line().as_str(), "show");
    assert_eq!(console.io_mut().take_out(), "show");
}

#[test]
fn test_up_arrow_replaces_typed_text() {
    let mut console = console();
    type_bytes(&mut console, b"show\r");
    console.io_mut().take_out();

    type_bytes(&mut console, b"se");
    type_bytes(&mut console, UP);

    assert_eq!(console.line().as_str(), "show");
    assert_eq!(console.io_mut().take_out(), "se\x08 \x08\x08 \x08show");
}

#[test]
fn test_custom_prompt_and_banner() {
    let config = ConsoleConfig::new().with_prompt("fw> ").with_banner("RustConsole test");
    let mut console = Console::with_config(MockIo::new(), COMMANDS, config);

    console.print_banner();
    type_bytes(&mut console, b"\r");

    assert_eq!(console.io_mut().take_out(), "\r\nRustConsole test\r\nfw> \r\nfw> ");
}

#[test]
fn test_default_config_has_no_banner() {
    let mut console = console();

    console.print_banner();
    assert_eq!(console.io_mut().take_out(), "> ");
}

#[test]
fn test_independent_consoles() {
    let mut first = console();
    let mut second = console();

    type_bytes(&mut first, b"show\r");
    type_bytes(&mut second, b"set\r");

    assert_eq!(first.history().latest(), b"show");
    assert_eq!(second.history().latest(), b"set");
}

#[test]
fn test_handler_fn_type_matches_table() {
    let handler: CommandFn = record;
    let table = [Command::new("tmp", handler)];
    let mut console = Console::new(MockIo::new(), &table);

    type_bytes(&mut console, b"tmp x\r");
    assert_eq!(take_calls(), vec![vec!["tmp", "x"]]);

    let io = console.into_io();
    assert!(io.debug.is_empty());
}

#[test]
fn test_diagnostics_logged() {
    let log: LogStream = LogStream::new();
    let mut console = Console::new(MockIo::new(), COMMANDS).with_log(&log);

    type_bytes(&mut console, b"frob\r");

    let stored = log.drain().unwrap();
    assert_eq!(stored.level, LogLevel::Debug);
    assert_eq!(stored.message(), "history: stored slot 1");
    assert_eq!(stored.tick, 5);

    let dispatched = log.drain().unwrap();
    assert_eq!(dispatched.message(), "dispatch frob argc=1");

    let unknown = log.drain().unwrap();
    assert_eq!(unknown.level, LogLevel::Warn);
    assert_eq!(unknown.message(), "frob: E01: unknown command");

    assert!(log.drain().is_none());
    // Diagnostics never reach the user channels
    assert!(!console.io().out.contains("dispatch"));
}

//! Main console struct integrating all components

use core::fmt::Write;

use super::io::DebugChannel;
use super::{parse_line, ConsoleIo, Command, Direction, History, LineBuffer, Registry};
use crate::config::ConsoleConfig;
use crate::logging::LogStream;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Erase one character on the terminal
const ERASE: &str = "\x08 \x08";

/// Escape sequence state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Normal,
    /// Got ESC
    AwaitingBracket,
    /// Got `[`
    AwaitingDirection,
}

/// Outcome of one `Console::poll` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// No byte was available
    Idle,
    /// One byte was read and processed
    Consumed,
}

/// Console state machine
pub struct Console<'a, I: ConsoleIo> {
    io: I,
    registry: Registry<'a>,
    config: ConsoleConfig,
    line: LineBuffer,
    history: History,
    state: InputState,
    log: Option<&'a LogStream>,
    /// Bytes processed so far, stamped on log entries
    tick: u32,
}

impl<'a, I: ConsoleIo> Console<'a, I> {
    /// Create a console over `io` with the default configuration.
    pub fn new(io: I, commands: &'a [Command]) -> Self {
        Self::with_config(io, commands, ConsoleConfig::default())
    }

    pub fn with_config(io: I, commands: &'a [Command], config: ConsoleConfig) -> Self {
        Self {
            io,
            registry: Registry::new(commands),
            config,
            line: LineBuffer::new(),
            history: History::new(),
            state: InputState::Normal,
            log: None,
            tick: 0,
        }
    }

    /// Record diagnostics into `log`.
    pub fn with_log(mut self, log: &'a LogStream) -> Self {
        self.log = Some(log);
        self
    }

    /// Read at most one byte and react to it.
    pub fn poll(&mut self) -> Poll {
        match self.io.read_byte() {
            Some(byte) => {
                self.feed(byte);
                Poll::Consumed
            }
            None => Poll::Idle,
        }
    }

    /// Process a single input byte
    pub fn feed(&mut self, byte: u8) {
        self.tick = self.tick.wrapping_add(1);

        match self.state {
            InputState::Normal => self.process_normal(byte),
            InputState::AwaitingBracket => {
                if byte == b'[' {
                    self.state = InputState::AwaitingDirection;
                } else {
                    self.state = InputState::Normal;
                    self.process_normal(byte);
                }
            }
            InputState::AwaitingDirection => {
                self.state = InputState::Normal;
                match byte {
                    b'A' => self.handle_arrow(Direction::Up),
                    b'B' => self.handle_arrow(Direction::Down),
                    // Right/left (no cursor movement) and anything else
                    _ => {}
                }
            }
        }
    }

    fn process_normal(&mut self, byte: u8) {
        match byte {
            // Backspace
            0x08 | 0x7F => self.handle_backspace(),

            // Enter
            b'\r' => self.handle_enter(),

            // Arrow key, with or without the leading ESC
            b'[' => self.state = InputState::AwaitingDirection,
            0x1B => self.state = InputState::AwaitingBracket,

            // Printable character
            0x20..=0x7A | 0x7E => self.handle_printable(byte),

            _ => {}
        }
    }

    fn handle_backspace(&mut self) {
        if !self.line.is_empty() {
            self.io.print(ERASE);
        }
        self.line.backspace();
    }

    fn handle_printable(&mut self, byte: u8) {
        if self.line.is_full() {
            if let Some(log) = self.log {
                crate::console_trace!(log, self.tick, "line full, dropped 0x{:02x}", byte);
            }
            return;
        }

        self.line.push(byte);
        let mut utf8 = [0u8; 4];
        self.io.print((byte as char).encode_utf8(&mut utf8));
    }

    fn handle_enter(&mut self) {
        self.io.print("\r\n");

        if self.line.is_empty() {
            self.io.print(self.config.prompt);
            return;
        }

        self.line.trim();
        if let Some(slot) = self.history.push(self.line.as_bytes()) {
            if let Some(log) = self.log {
                crate::console_debug!(log, self.tick, "history: stored slot {}", slot);
            }
        }

        self.submit();

        self.line.clear();
        self.io.print("\r\n");
        self.io.print(self.config.prompt);
    }

    /// Tokenize the edit buffer and run the command it names.
    fn submit(&mut self) {
        let Self { io, registry, line, log, tick, .. } = self;
        let (log, tick) = (*log, *tick);

        let args = match parse_line(line.as_str()) {
            Ok(args) => args,
            Err(e) => {
                let _ = write!(DebugChannel(&mut *io), "memory allocation failed\r\n");
                if let Some(log) = log {
                    crate::console_error!(log, tick, "tokenizer: {}", e);
                }
                return;
            }
        };

        if args.is_empty() {
            return;
        }

        if let Some(log) = log {
            crate::console_debug!(log, tick, "dispatch {} argc={}", args.name().unwrap_or(""), args.argc());
        }

        if let Err(e) = registry.dispatch(&args, io) {
            if let Some(log) = log {
                crate::console_warn!(log, tick, "{}: {}", args.name().unwrap_or(""), e);
            }
        }
    }

    fn handle_arrow(&mut self, direction: Direction) {
        let Self { io, line, history, .. } = self;

        if let Some(entry) = history.navigate(direction) {
            for _ in 0..line.len() {
                io.print(ERASE);
            }
            line.set(entry);
            io.print(line.as_str());
        }
    }

    /// Print the prompt
    pub fn print_prompt(&mut self) {
        self.io.print(self.config.prompt);
    }

    /// Print welcome banner
    pub fn print_banner(&mut self) {
        if let Some(banner) = self.config.banner {
            self.io.print("\r\n");
            self.io.print(banner);
            self.io.print("\r\n");
        }
        self.print_prompt();
    }

    /// Current edit buffer
    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn io(&self) -> &I {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut I {
        &mut self.io
    }

    /// Give the I/O capability back to the host.
    pub fn into_io(self) -> I {
        self.io
    }
}

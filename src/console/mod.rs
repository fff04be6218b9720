//! Serial console: line editing, history recall and command dispatch
//!
//! Polled from the host loop, one byte per call - no dedicated task.
//! Static buffers for the line and history; the only heap use is the
//! per-line argument vector.

pub mod commands;
pub mod console;
pub mod error;
pub mod history;
pub mod io;
pub mod line_buffer;
pub mod parser;

pub use commands::{Command, CommandFn, Registry, HELP};
pub use console::{Console, InputState, Poll, VERSION};
pub use error::ConsoleError;
pub use history::{Direction, History};
pub use io::{ConsoleIo, DebugChannel, NormalChannel};
pub use line_buffer::LineBuffer;
pub use parser::{parse_line, Args};

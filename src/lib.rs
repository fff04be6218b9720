//! # RustSerialConsole
//!
//! Interactive line-editing console for firmware.
//!
//! ## Architecture
//!
//! The host owns the transport and polls a [`Console`] from its main loop:
//! - Bytes come in through [`ConsoleIo::read_byte`], one per poll
//! - Printable bytes are echoed, arrow sequences recall [`History`]
//! - A completed line is tokenized and dispatched through the [`Registry`]
//!
//! Everything lives in the `Console` value; several consoles can coexist.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod console;
pub mod log_globals;
pub mod logging;

pub use config::{ConsoleConfig, SerialConfig};
pub use console::{
    Args, Command, CommandFn, Console, ConsoleError, ConsoleIo, Direction, History, InputState,
    LineBuffer, Poll, Registry,
};
pub use log_globals::CONSOLE_LOG;
pub use logging::{LogLevel, LogStream};

//! Console error types

use thiserror::Error;

/// Console error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// E01: Unknown command
    #[error("E01: unknown command")]
    UnknownCommand,
    /// E02: Invalid value format
    #[error("E02: invalid value")]
    InvalidValue,
    /// E03: Missing required argument
    #[error("E03: missing argument")]
    MissingArg,
    /// E04: Value out of allowed range
    #[error("E04: out of range")]
    OutOfRange,
    /// E05: Argument vector could not grow
    #[error("E05: allocation failed")]
    OutOfMemory,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::InvalidValue => "E02",
            Self::MissingArg => "E03",
            Self::OutOfRange => "E04",
            Self::OutOfMemory => "E05",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::InvalidValue => "invalid value",
            Self::MissingArg => "missing argument",
            Self::OutOfRange => "out of range",
            Self::OutOfMemory => "allocation failed",
        }
    }
}

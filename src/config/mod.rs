//! Module: config
//!
//! Purpose: Compile-time sizing and runtime presentation settings for the
//! console.
//!
//! Architecture:
//! - Buffer and ring sizes are constants: every buffer is statically sized
//! - `ConsoleConfig`: prompt and banner, chosen when the console is built
//! - `SerialConfig`: transport settings used by the firmware binary

/// Edit buffer capacity in bytes, terminator included.
///
/// A line holds at most `BUFFER_SIZE - 1` characters.
pub const BUFFER_SIZE: usize = 128;

/// Number of history slots.
pub const HISTORY_LENGTH: usize = 4;

/// Token slots reserved before the first tokenizer growth.
pub const TOKENIZER_INITIAL_CAPACITY: usize = 10;

/// Default prompt.
pub const PROMPT: &str = "> ";

/// Presentation settings for a console instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Printed after every submitted or empty line.
    pub prompt: &'static str,
    /// Printed once by `Console::print_banner`.
    pub banner: Option<&'static str>,
}

impl ConsoleConfig {
    /// Default settings: `"> "` prompt, no banner.
    pub const fn new() -> Self {
        Self {
            prompt: PROMPT,
            banner: None,
        }
    }

    /// Replace the prompt.
    pub const fn with_prompt(mut self, prompt: &'static str) -> Self {
        self.prompt = prompt;
        self
    }

    /// Set the banner.
    pub const fn with_banner(mut self, banner: &'static str) -> Self {
        self.banner = Some(banner);
        self
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// UART configuration for the console transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
        }
    }
}

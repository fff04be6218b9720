//! Command line tokenizer
//!
//! Splits on runs of space, tab, CR and LF. Tokens borrow the line they were
//! cut from, so an `Args` lives only as long as the edit buffer is left
//! alone: in practice, for one dispatch.

use alloc::vec::Vec;

use super::ConsoleError;
use crate::config::TOKENIZER_INITIAL_CAPACITY;

const SEPARATORS: [char; 4] = [' ', '\t', '\r', '\n'];

/// Argument vector of a submitted line.
///
/// `argv()[0]` is the command name and `argc()` counts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args<'a> {
    argv: Vec<&'a str>,
}

impl<'a> Args<'a> {
    /// Number of tokens, command name included
    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    /// All tokens in order
    pub fn argv(&self) -> &[&'a str] {
        &self.argv
    }

    /// The command name (first token)
    pub fn name(&self) -> Option<&'a str> {
        self.argv.first().copied()
    }

    /// Get argument by index (0-based, after the command name)
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.argv.get(idx + 1).copied()
    }

    /// Arguments after the command name
    pub fn args(&self) -> &[&'a str] {
        self.argv.get(1..).unwrap_or(&[])
    }

    /// True when the line held no tokens
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }

    /// Slots reserved in the underlying vector
    pub fn capacity(&self) -> usize {
        self.argv.capacity()
    }
}

/// Tokenize a command line.
///
/// Reserves `TOKENIZER_INITIAL_CAPACITY` slots and doubles on overflow.
/// Fails with `OutOfMemory` if any reservation fails; no partial vector is
/// returned.
pub fn parse_line(line: &str) -> Result<Args<'_>, ConsoleError> {
    let mut argv: Vec<&str> = Vec::new();
    argv.try_reserve_exact(TOKENIZER_INITIAL_CAPACITY)
        .map_err(|_| ConsoleError::OutOfMemory)?;

    for token in line.split(SEPARATORS).filter(|t| !t.is_empty()) {
        if argv.len() == argv.capacity() {
            let grow = argv.capacity().max(1);
            argv.try_reserve_exact(grow)
                .map_err(|_| ConsoleError::OutOfMemory)?;
        }
        argv.push(token);
    }

    Ok(Args { argv })
}

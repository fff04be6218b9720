//! Command registry and dispatch
//!
//! The registry borrows the caller's table and puts the built-in `help`
//! entry in front of it. Lookup is a linear scan, first match wins: a
//! caller entry named `help`, or a second entry with an earlier name, is
//! never reached.

use core::fmt::Write;

use super::io::{ConsoleIo, DebugChannel, NormalChannel};
use super::parser::Args;
use super::ConsoleError;

/// Handler signature: full argument vector and the normal output channel.
pub type CommandFn = fn(&Args<'_>, &mut dyn Write) -> Result<(), ConsoleError>;

/// Command descriptor
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub handler: CommandFn,
}

impl Command {
    pub const fn new(name: &'static str, handler: CommandFn) -> Self {
        Self { name, handler }
    }
}

impl core::fmt::Debug for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish()
    }
}

/// Name of the built-in command
pub const HELP: &str = "help";

/// What a registry entry runs
#[derive(Clone, Copy)]
enum Action {
    Help,
    Run(CommandFn),
}

/// Registered commands: built-in `help`, then the caller's table.
///
/// The table is borrowed, not copied: every lookup scans the caller's slice.
/// The shared borrow freezes it for the registry's lifetime, so the set of
/// commands still cannot change after construction.
pub struct Registry<'a> {
    commands: &'a [Command],
}

impl<'a> Registry<'a> {
    /// Build the registry over `commands`.
    pub const fn new(commands: &'a [Command]) -> Self {
        Self { commands }
    }

    /// Number of entries, `help` included
    pub fn len(&self) -> usize {
        self.commands.len() + 1
    }

    /// Never true: `help` is always present
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All command names in lookup order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries().map(|(name, _)| name)
    }

    /// First caller entry named `name`, if `help` does not shadow it
    pub fn find(&self, name: &str) -> Option<&'a Command> {
        if name == HELP {
            return None;
        }
        self.commands.iter().find(|c| c.name == name)
    }

    /// True if `name` resolves to a command
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Run the command named by `args`.
    ///
    /// Unknown commands and handler errors are reported on the debug
    /// channel and returned so the caller can log them.
    pub fn dispatch<I: ConsoleIo + ?Sized>(
        &self,
        args: &Args<'_>,
        io: &mut I,
    ) -> Result<(), ConsoleError> {
        let name = args.name().unwrap_or("");

        let Some(action) = self.lookup(name) else {
            let _ = write!(
                DebugChannel(io),
                "command `{}' not found, try `{}'\r\n",
                name,
                HELP
            );
            return Err(ConsoleError::UnknownCommand);
        };

        let result = match action {
            Action::Help => {
                self.print_help(&mut NormalChannel(&mut *io));
                Ok(())
            }
            Action::Run(handler) => handler(args, &mut NormalChannel(&mut *io)),
        };

        if let Err(e) = result {
            let _ = write!(
                DebugChannel(io),
                "{}: {}: {}\r\n",
                name,
                e.code(),
                e.message()
            );
        }
        result
    }

    /// Write the `help` listing.
    pub fn print_help(&self, out: &mut dyn Write) {
        let _ = write!(out, "Available commands:\r\n");
        for name in self.names() {
            let _ = write!(out, "  {}\r\n", name);
        }
    }

    fn entries(&self) -> impl Iterator<Item = (&'static str, Action)> + '_ {
        core::iter::once((HELP, Action::Help))
            .chain(self.commands.iter().map(|c| (c.name, Action::Run(c.handler))))
    }

    fn lookup(&self, name: &str) -> Option<Action> {
        self.entries()
            .find(|(entry, _)| *entry == name)
            .map(|(_, action)| action)
    }
}

//! Global log stream instance.

use crate::logging::LogStream;

/// Diagnostic stream for the firmware console.
///
/// Single producer (the polling loop), single consumer (the drain in the
/// same loop or a lower-priority task).
pub static CONSOLE_LOG: LogStream = LogStream::new();

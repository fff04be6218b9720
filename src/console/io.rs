//! Character I/O supplied by the host
//!
//! The console never touches hardware. The host hands it something that can
//! read one byte without blocking and write text on two channels:
//!
//! ```text
//! UART RX ──▶ read_byte() ──▶ Console ──▶ print()       ──▶ UART TX (echo, prompt, help)
//!                                    └──▶ debug_print() ──▶ debug sink (errors)
//! ```

use core::fmt;

/// Host-provided I/O capability.
pub trait ConsoleIo {
    /// Read one byte. `None` means no data is available right now.
    fn read_byte(&mut self) -> Option<u8>;

    /// Write text on the normal channel.
    fn print(&mut self, text: &str);

    /// Write text on the debug channel.
    fn debug_print(&mut self, text: &str);
}

impl<T: ConsoleIo + ?Sized> ConsoleIo for &mut T {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn print(&mut self, text: &str) {
        (**self).print(text)
    }

    fn debug_print(&mut self, text: &str) {
        (**self).debug_print(text)
    }
}

/// Normal channel as a `fmt::Write` sink.
pub struct NormalChannel<'a, I: ConsoleIo + ?Sized>(pub &'a mut I);

impl<I: ConsoleIo + ?Sized> fmt::Write for NormalChannel<'_, I> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.print(s);
        Ok(())
    }
}

/// Debug channel as a `fmt::Write` sink.
pub struct DebugChannel<'a, I: ConsoleIo + ?Sized>(pub &'a mut I);

impl<I: ConsoleIo + ?Sized> fmt::Write for DebugChannel<'_, I> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.debug_print(s);
        Ok(())
    }
}

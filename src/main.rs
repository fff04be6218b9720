//! RustSerialConsole - Main entry point
//!
//! On ESP-IDF targets the console runs on UART1 (GPIO17 TX, GPIO18 RX).
//! On the host it runs on stdin/stdout so the line editor can be tried
//! without hardware.

use core::fmt::Write;

use rust_serial_console::console::{DebugChannel, VERSION};
use rust_serial_console::{Args, Command, ConsoleConfig, ConsoleError, CONSOLE_LOG};

/// Demo command table
static COMMANDS: &[Command] = &[
    Command::new("echo", cmd_echo),
    Command::new("sum", cmd_sum),
    Command::new("version", cmd_version),
];

fn console_config() -> ConsoleConfig {
    ConsoleConfig::new().with_banner(VERSION)
}

// --- Command Implementations ---

fn cmd_echo(args: &Args<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    for (i, word) in args.args().iter().enumerate() {
        if i > 0 {
            let _ = write!(out, " ");
        }
        let _ = write!(out, "{}", word);
    }
    Ok(())
}

fn cmd_sum(args: &Args<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if args.args().is_empty() {
        return Err(ConsoleError::MissingArg);
    }

    let mut total: u32 = 0;
    for value in args.args() {
        let v: u32 = value.parse().map_err(|_| ConsoleError::InvalidValue)?;
        total = total.checked_add(v).ok_or(ConsoleError::OutOfRange)?;
    }

    let _ = write!(out, "{}", total);
    Ok(())
}

fn cmd_version(_args: &Args<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = write!(out, "{}", VERSION);
    Ok(())
}

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    host::run();
}

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::hal::delay::{FreeRtos, NON_BLOCK};
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{self, UartDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::EspError;

    use rust_serial_console::{Console, ConsoleIo, Poll, SerialConfig};

    use super::*;

    /// Console I/O over a UART driver
    struct UartIo<'d> {
        uart: UartDriver<'d>,
    }

    impl ConsoleIo for UartIo<'_> {
        fn read_byte(&mut self) -> Option<u8> {
            let mut byte = [0u8; 1];
            match self.uart.read(&mut byte, NON_BLOCK) {
                Ok(1) => Some(byte[0]),
                _ => None,
            }
        }

        fn print(&mut self, text: &str) {
            let _ = self.uart.write(text.as_bytes());
        }

        fn debug_print(&mut self, text: &str) {
            // stderr goes to the ESP-IDF console on UART0
            eprint!("{}", text);
        }
    }

    pub fn run() -> Result<(), EspError> {
        // Initialize ESP-IDF
        esp_idf_svc::sys::link_patches();

        let peripherals = Peripherals::take()?;
        let serial = SerialConfig::default();
        let uart_config = uart::config::Config::default().baudrate(Hertz(serial.baud_rate));

        let uart = UartDriver::new(
            peripherals.uart1,
            peripherals.pins.gpio17,
            peripherals.pins.gpio18,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;

        let mut console = Console::with_config(UartIo { uart }, COMMANDS, console_config())
            .with_log(&CONSOLE_LOG);
        console.print_banner();

        loop {
            if console.poll() == Poll::Idle {
                CONSOLE_LOG.drain_to(&mut DebugChannel(console.io_mut()));
                FreeRtos::delay_ms(10);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{Read, Stdout, Write as _};

    use rust_serial_console::{Console, ConsoleIo, Poll};

    use super::*;

    /// Console I/O over the process's stdin/stdout
    struct StdIo {
        stdin: std::io::Bytes<std::io::Stdin>,
        stdout: Stdout,
    }

    impl ConsoleIo for StdIo {
        fn read_byte(&mut self) -> Option<u8> {
            loop {
                match self.stdin.next()? {
                    // Terminals in cooked mode send LF; the console submits on CR
                    Ok(b'\n') => return Some(b'\r'),
                    Ok(b'\r') => continue,
                    Ok(byte) => return Some(byte),
                    Err(_) => return None,
                }
            }
        }

        fn print(&mut self, text: &str) {
            let _ = self.stdout.write_all(text.as_bytes());
            let _ = self.stdout.flush();
        }

        fn debug_print(&mut self, text: &str) {
            eprint!("{}", text);
        }
    }

    pub fn run() {
        let io = StdIo {
            stdin: std::io::stdin().bytes(),
            stdout: std::io::stdout(),
        };

        let mut console = Console::with_config(io, COMMANDS, console_config()).with_log(&CONSOLE_LOG);
        console.print_banner();

        // Blocking stdin: Idle means end of input
        while console.poll() == Poll::Consumed {
            if std::env::var_os("CONSOLE_TRACE").is_some() {
                CONSOLE_LOG.drain_to(&mut DebugChannel(console.io_mut()));
            }
        }

        CONSOLE_LOG.drain_to(&mut DebugChannel(console.io_mut()));
        console.io_mut().print("\r\n");
    }
}

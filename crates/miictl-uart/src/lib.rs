//! miictl-uart - Serial transport for Switchblox firmware commands
//!
//! The board firmware listens on a UART and applies each received command
//! verbatim; there is no framing, checksum or acknowledgment protocol. This
//! crate owns opening the port and writing the flattened command bytes.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

use std::io::Write;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use thiserror::Error;

use miictl_core::Command;

/// Default UART baud rate of the Switchblox firmware
pub const DEFAULT_BAUD: u32 = 115_200;

/// Errors raised while talking to the board
#[derive(Debug, Error)]
pub enum UartError {
    /// Serial port could not be opened or configured
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Write to the port failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for UART operations
pub type Result<T> = std::result::Result<T, UartError>;

/// Writer that delivers generated commands to the board firmware
pub struct UartWriter {
    port: Box<dyn SerialPort>,
}

impl UartWriter {
    /// Open the board's serial port, 8N1 with a 5 second timeout
    pub fn open(device: &str, baud: Option<u32>) -> Result<Self> {
        let baud_rate = baud.unwrap_or(DEFAULT_BAUD);

        let port = serialport::new(device, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_secs(5))
            .open()?;

        log::info!("Opened serial port {} at {} baud", device, baud_rate);

        Ok(Self { port })
    }

    /// Write every command to the port, in order, and flush
    pub fn send(&mut self, commands: &[Command]) -> Result<()> {
        for cmd in commands {
            log::debug!("tx {}", cmd);
            self.port.write_all(&cmd.flatten())?;
        }
        self.port.flush()?;
        log::info!("Sent {} command(s)", commands.len());
        Ok(())
    }
}

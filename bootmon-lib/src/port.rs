//! Serial link configuration and line-oriented reading.

use crate::Defaults;
use crate::error::{ControlLine, Error, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read};
use std::time::{Duration, Instant};

/// Lines longer than this are handed out in pieces.
const MAX_LINE_LEN: usize = 4096;

/// Configuration for opening the serial link
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Serial port path (e.g., /dev/ttyUSB0, COM3)
    pub port_path: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Read timeout, also the upper bound of a single `read_line` wait
    pub timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port_path: Defaults::PORT.to_string(),
            baud_rate: Defaults::BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: Defaults::READ_TIMEOUT,
        }
    }
}

impl LinkConfig {
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            ..Default::default()
        }
    }
}

/// Drives the modem control lines of a port.
pub trait ControlLines {
    fn set_dtr(&mut self, level: bool) -> Result<()>;
    fn set_rts(&mut self, level: bool) -> Result<()>;
}

/// Produces received text one line at a time.
pub trait LineSource {
    /// Returns the next line including its terminator, a partial line if the
    /// read timed out part way through, or `None` if nothing arrived.
    fn read_line(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Everything the monitor needs from a port.
pub trait MonitorPort: ControlLines + LineSource {}

impl<T: ControlLines + LineSource> MonitorPort for T {}

/// Splits a byte stream with read timeouts into lines.
///
/// A single `read_line_from` call waits at most `budget` for a newline; once
/// it runs out, whatever has arrived is handed out even while bytes keep
/// trickling in.
#[derive(Debug)]
pub struct LineBuffer {
    pending: Vec<u8>,
    budget: Duration,
}

impl LineBuffer {
    pub fn new(budget: Duration) -> Self {
        Self {
            pending: Vec::new(),
            budget,
        }
    }

    /// Number of bytes received but not yet handed out.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn read_line_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<Option<Vec<u8>>> {
        let started = Instant::now();
        let mut chunk = [0u8; 256];
        loop {
            if let Some(line) = self.split_line() {
                return Ok(Some(line));
            }
            if self.pending.len() >= MAX_LINE_LEN || started.elapsed() >= self.budget {
                return Ok(self.take_pending());
            }
            match reader.read(&mut chunk) {
                Ok(0) => return Ok(self.take_pending()),
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::TimedOut => return Ok(self.take_pending()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn split_line(&mut self) -> Option<Vec<u8>> {
        let end = self.pending.iter().position(|&b| b == b'\n')? + 1;
        let rest = self.pending.split_off(end);
        Some(std::mem::replace(&mut self.pending, rest))
    }

    fn take_pending(&mut self) -> Option<Vec<u8>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}

/// An open serial port. Dropping it closes the device.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    config: LinkConfig,
    buffer: LineBuffer,
}

impl SerialLink {
    pub fn open(config: LinkConfig) -> Result<Self> {
        let port = serialport::new(&config.port_path, config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .open()
            .map_err(|e| Error::device_open(&config.port_path, e))?;

        tracing::debug!(
            port = %config.port_path,
            baud = config.baud_rate,
            "serial device opened"
        );

        Ok(Self {
            port,
            buffer: LineBuffer::new(config.timeout),
            config,
        })
    }
}

impl ControlLines for SerialLink {
    fn set_dtr(&mut self, level: bool) -> Result<()> {
        self.port
            .write_data_terminal_ready(level)
            .map_err(|e| Error::control_line(ControlLine::Dtr, e))
    }

    fn set_rts(&mut self, level: bool) -> Result<()> {
        self.port
            .write_request_to_send(level)
            .map_err(|e| Error::control_line(ControlLine::Rts, e))
    }
}

impl LineSource for SerialLink {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        self.buffer.read_line_from(&mut self.port)
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        tracing::debug!(port = %self.config.port_path, "serial device closed");
    }
}

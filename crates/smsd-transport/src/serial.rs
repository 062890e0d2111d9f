use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use tracing::debug;

use smsd_frame::{escape, unescape, FRAME_END};

use crate::error::{Result, TransportError};
use crate::exchange::Exchange;

/// Controller baud rate (fixed by the device).
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Serial transport configuration.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Serial device path (e.g. `/dev/ttyACM0`, `COM7`).
    pub path: String,
    /// Baud rate. Default: 115200.
    pub baud_rate: u32,
    /// Read timeout for one exchange. Default: 1 s.
    pub timeout: Duration,
}

impl SerialConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Blocking transport over the controller's USB virtual serial port.
///
/// Each exchange clears both port buffers, writes the escaped frame and
/// reads until the end marker (or timeout). Escaping and unescaping
/// happen here, so the dispatcher sees raw frames on both transports.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport").finish_non_exhaustive()
    }
}

impl SerialTransport {
    /// Open the serial port.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.path, config.baud_rate)
            .timeout(config.timeout)
            .open()
            .map_err(|source| TransportError::OpenPort {
                path: config.path.clone(),
                source,
            })?;
        debug!(path = %config.path, baud = config.baud_rate, "port opened");
        Ok(Self { port })
    }

    /// Read bytes until the end marker is observed.
    ///
    /// On timeout, whatever arrived is returned so the marker check in
    /// `unescape` reports the malformed message; a timeout with nothing
    /// received at all stays an I/O error.
    fn read_until_end_marker(&mut self) -> Result<Vec<u8>> {
        let mut wire = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(0) => return Ok(wire),
                Ok(_) => {
                    wire.push(byte[0]);
                    if byte[0] == FRAME_END {
                        return Ok(wire);
                    }
                }
                Err(err)
                    if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock)
                        && !wire.is_empty() =>
                {
                    return Ok(wire);
                }
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl Exchange for SerialTransport {
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        self.port.clear(ClearBuffer::All)?;

        let wire = escape(request);
        debug!(len = wire.len(), "send frame");
        self.port.write_all(&wire)?;
        self.port.flush()?;

        let wire_reply = self.read_until_end_marker()?;
        debug!(len = wire_reply.len(), "recv frame");
        Ok(unescape(&wire_reply)?)
    }
}

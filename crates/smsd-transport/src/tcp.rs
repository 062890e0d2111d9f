use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::exchange::Exchange;

/// Default controller TCP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Receive buffer size; one reply never exceeds a single read of this.
pub const RECV_BUFFER_SIZE: usize = 2048;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// TCP transport configuration.
#[derive(Debug, Clone)]
pub struct TcpConfig {
    /// Controller hostname or IP address.
    pub host: String,
    /// Controller TCP port. Default: 5000.
    pub port: u16,
    /// Timeout applied to connect, send and receive. Default: 1 s.
    pub timeout: Duration,
}

impl TcpConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Blocking TCP transport.
///
/// Frames travel raw: length-delimited only by the embedded length field
/// and the transport's natural message boundary. One exchange is one
/// send followed by a single receive of up to [`RECV_BUFFER_SIZE`]
/// bytes; a short read is authoritative, never re-read.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to the controller.
    pub fn connect(config: &TcpConfig) -> Result<Self> {
        let addr_str = format!("{}:{}", config.host, config.port);
        let addr = addr_str
            .to_socket_addrs()
            .map_err(|source| TransportError::Connect {
                addr: addr_str.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| TransportError::Connect {
                addr: addr_str.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "no address resolved",
                ),
            })?;

        let stream = TcpStream::connect_timeout(&addr, config.timeout).map_err(|source| {
            TransportError::Connect {
                addr: addr_str.clone(),
                source,
            }
        })?;
        stream.set_read_timeout(Some(config.timeout))?;
        stream.set_write_timeout(Some(config.timeout))?;
        stream.set_nodelay(true)?;

        debug!(addr = %addr_str, "connected");
        Ok(Self { stream })
    }
}

impl Exchange for TcpTransport {
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        debug!(len = request.len(), "send frame");
        self.stream.write_all(request)?;
        self.stream.flush()?;

        let mut reply = vec![0u8; RECV_BUFFER_SIZE];
        let n = self.stream.read(&mut reply)?;
        reply.truncate(n);
        debug!(len = n, "recv frame");
        Ok(reply)
    }
}

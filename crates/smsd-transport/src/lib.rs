//! Blocking transports for the SMSD-LAN controller.
//!
//! Both transports expose one operation: send a request, receive a
//! reply, within a configured timeout (the [`Exchange`] trait). The
//! serial transport additionally passes bytes through the frame crate's
//! escape layer; TCP sends frames raw.
//!
//! Strictly synchronous: one in-flight request per connection, no
//! retries, no reconnects. A dropped connection is fatal for the caller.

pub mod error;
pub mod exchange;
pub mod serial;
pub mod tcp;

pub use error::{Result, TransportError};
pub use exchange::Exchange;
pub use serial::{SerialConfig, SerialTransport, DEFAULT_BAUD_RATE};
pub use tcp::{TcpConfig, TcpTransport, DEFAULT_PORT, RECV_BUFFER_SIZE};

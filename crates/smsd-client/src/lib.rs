//! Synchronous command dispatcher for the SMSD-LAN controller.
//!
//! A [`Session`] owns a transport, negotiates the protocol version on
//! connect, and exposes one method per controller operation. Every
//! method frames its request, runs a single blocking exchange, validates
//! the reply checksum and outcome code, and decodes the typed result.

pub mod error;
pub mod session;

pub use error::{ClientError, Result};
pub use session::Session;

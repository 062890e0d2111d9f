//! Host-side driver for the SMSD-LAN stepper motor controller.
//!
//! smsd talks to the controller over TCP or a USB virtual serial port
//! using its binary checksummed frame protocol, and exposes the full
//! command set as typed methods on a synchronous [`Session`].
//!
//! # Crate Structure
//!
//! - [`frame`] — Checksummed frame codec and the serial escape layer
//! - [`proto`] — Command/outcome tables and payload marshaling
//! - [`transport`] — Blocking TCP and serial request/reply transports
//! - [`client`] — The [`Session`] command dispatcher
//!
//! # Example
//!
//! ```no_run
//! use smsd::{Session, TcpConfig};
//!
//! # fn main() -> Result<(), smsd::ClientError> {
//! let mut session = Session::connect_tcp(&TcpConfig::new("192.168.1.2"))?;
//! session.authorization(None)?;
//! session.set_max_speed(400)?;
//! session.move_f(10_000)?;
//! # Ok(())
//! # }
//! ```

/// Re-export frame codec types.
pub mod frame {
    pub use smsd_frame::*;
}

/// Re-export protocol tables and payload types.
pub mod proto {
    pub use smsd_proto::*;
}

/// Re-export transport types.
pub mod transport {
    pub use smsd_transport::*;
}

/// Re-export the command dispatcher.
pub mod client {
    pub use smsd_client::*;
}

pub use smsd_client::{ClientError, Result, Session};
pub use smsd_proto::{
    Direction, ErrorStatistics, InputStatus, LanConfig, MemoryBank, MotorCommand, MotorMode,
    MotorState, Outcome, PowerstepStatus, ProgramBank, ProgramEntry, StackState,
};
pub use smsd_transport::{SerialConfig, SerialTransport, TcpConfig, TcpTransport};

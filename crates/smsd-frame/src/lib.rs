//! Checksummed frame codec for the SMSD-LAN controller protocol.
//!
//! Every request and reply travels in one frame:
//! - A 1-byte protocol version
//! - A 1-byte command type
//! - A 1-byte rolling sequence id
//! - A 2-byte little-endian payload length
//! - The payload (at most 1024 bytes)
//! - A trailing 1-byte two's-complement checksum
//!
//! On the USB virtual serial port the frame is additionally wrapped in
//! start/end markers with reserved bytes escaped (see [`escape`]). TCP
//! sends frames raw.

pub mod codec;
pub mod error;
pub mod escape;

pub use codec::{checksum, decode_frame, encode_frame, Frame, HEADER_SIZE, MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use escape::{escape, unescape, ESCAPE, FRAME_END, FRAME_START};

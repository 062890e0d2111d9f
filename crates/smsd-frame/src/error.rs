/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The trailing checksum byte does not match the recomputed sum.
    #[error("checksum mismatch (stored 0x{stored:02X}, computed 0x{computed:02X})")]
    ChecksumMismatch { stored: u8, computed: u8 },

    /// The buffer ends before the frame declared by the length field.
    #[error("truncated frame ({actual} bytes, need {expected})")]
    TruncatedFrame { expected: usize, actual: usize },

    /// The payload exceeds the protocol maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A serial message is missing its start/end markers or carries a
    /// malformed escape sequence.
    #[error("invalid message format: {0}")]
    InvalidMessageFormat(&'static str),
}

pub type Result<T> = std::result::Result<T, FrameError>;

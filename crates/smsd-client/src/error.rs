use smsd_proto::Outcome;

/// Errors surfaced by session operations.
///
/// Every failure is synchronous and final: nothing is retried or
/// recovered internally, and there is no partial-success state.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level error (including timeouts).
    #[error("transport error: {0}")]
    Transport(#[from] smsd_transport::TransportError),

    /// Frame-level error (checksum, truncation, message format).
    #[error(transparent)]
    Frame(#[from] smsd_frame::FrameError),

    /// Payload marshaling error.
    #[error(transparent)]
    Proto(#[from] smsd_proto::ProtoError),

    /// The version handshake produced no usable reply.
    #[error("version negotiation failed")]
    VersionNegotiationFailed,

    /// The reply outcome code maps to no catalog member.
    #[error("unknown outcome code 0x{0:04X}")]
    UnknownOutcomeCode(u16),

    /// The reply outcome differs from the one this operation expects.
    #[error("unexpected outcome {actual} (expected {expected})")]
    OutcomeMismatch { expected: Outcome, actual: Outcome },
}

pub type Result<T> = std::result::Result<T, ClientError>;

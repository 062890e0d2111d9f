/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the controller's TCP endpoint.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// Failed to open the serial port.
    #[error("failed to open serial port {path}: {source}")]
    OpenPort {
        path: String,
        source: serialport::Error,
    },

    /// An I/O error occurred during an exchange (including timeouts).
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serial-port control operation failed.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// The serial wire bytes could not be unwrapped into a frame.
    #[error(transparent)]
    Frame(#[from] smsd_frame::FrameError),
}

pub type Result<T> = std::result::Result<T, TransportError>;

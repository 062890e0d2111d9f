/// Errors that can occur while marshaling command payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// A reply payload is shorter than its fixed layout requires.
    #[error("reply payload too short ({actual} bytes, need {expected})")]
    ShortPayload { expected: usize, actual: usize },

    /// A program bank contains a byte that maps to no motor command.
    #[error("unknown command code 0x{0:02X} in program bank")]
    UnknownCommandCode(u8),

    /// A program holds more entries than one memory bank stores.
    #[error("program too long ({len} entries, max {max})")]
    ProgramTooLong { len: usize, max: usize },

    /// A mode field exceeds its documented bit width.
    #[error("mode field {field} out of range ({value}, max {max})")]
    ModeFieldRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

pub type Result<T> = std::result::Result<T, ProtoError>;

//! Command catalog and payload marshaling for the SMSD-LAN controller.
//!
//! Pure data rules, no I/O: the numeric command and outcome tables the
//! protocol multiplexes over, plus explicit encode/decode functions for
//! every fixed-layout payload the controller understands. All multi-byte
//! fields are little-endian.

pub mod catalog;
pub mod error;
pub mod payload;
pub mod status;

pub use catalog::{CommandType, MemoryBank, MotorCommand, Outcome};
pub use error::{ProtoError, Result};
pub use payload::{
    encode_motor_command, encode_password, ErrorStatistics, LanConfig, ProgramBank,
    ProgramEntry, ReplyEnvelope, DEFAULT_PASSWORD, MOTOR_COMMAND_LEN, PASSWORD_LEN,
    PROGRAM_BANK_CAPACITY, PROGRAM_BANK_LEN, REPLY_ENVELOPE_LEN,
};
pub use status::{Direction, InputStatus, MotorMode, MotorState, PowerstepStatus, StackState};

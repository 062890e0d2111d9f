//! Fixed-layout payload encode/decode.
//!
//! Every payload variant writes its fields in declared order at their
//! natural width, little-endian, with no padding. Decoding reads the
//! same layout back from a reply's payload region; raw bytes are never
//! reinterpreted as typed records in place.

use crate::catalog::MotorCommand;
use crate::error::{ProtoError, Result};

/// Password length on the wire.
pub const PASSWORD_LEN: usize = 8;

/// Factory password used when the caller supplies none.
pub const DEFAULT_PASSWORD: [u8; PASSWORD_LEN] = [0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01];

/// Motor command record: command code (1) + data (4, LE i32).
pub const MOTOR_COMMAND_LEN: usize = 5;

/// Reply envelope: outcome (2) + return data (4) + powerstep status (2).
pub const REPLY_ENVELOPE_LEN: usize = 8;

/// Entries in one program-memory bank.
pub const PROGRAM_BANK_CAPACITY: usize = 204;

/// Byte length of a full program-memory bank payload.
pub const PROGRAM_BANK_LEN: usize = PROGRAM_BANK_CAPACITY * MOTOR_COMMAND_LEN;

/// Encode an authorization/password payload.
///
/// The ASCII password is truncated to eight bytes and zero-filled on the
/// right when shorter; `None` sends the factory default.
pub fn encode_password(password: Option<&str>) -> [u8; PASSWORD_LEN] {
    match password {
        None => DEFAULT_PASSWORD,
        Some(password) => {
            let mut buf = [0u8; PASSWORD_LEN];
            let bytes = password.as_bytes();
            let n = bytes.len().min(PASSWORD_LEN);
            buf[..n].copy_from_slice(&bytes[..n]);
            buf
        }
    }
}

/// Encode a motor command record.
pub fn encode_motor_command(command: MotorCommand, data: i32) -> [u8; MOTOR_COMMAND_LEN] {
    let mut buf = [0u8; MOTOR_COMMAND_LEN];
    buf[0] = command.code();
    buf[1..5].copy_from_slice(&data.to_le_bytes());
    buf
}

fn check_len(payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() < expected {
        return Err(ProtoError::ShortPayload {
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

fn read_u16(payload: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([payload[offset], payload[offset + 1]])
}

fn read_u32(payload: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        payload[offset],
        payload[offset + 1],
        payload[offset + 2],
        payload[offset + 3],
    ])
}

/// The common reply structure carried by command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyEnvelope {
    /// Error code or echoed command-success code.
    pub outcome_code: u16,
    /// Command-specific return value (parameter reads).
    pub return_data: i32,
    /// Raw POWERSTEP01 status register bits.
    pub status_bits: u16,
}

impl ReplyEnvelope {
    /// Decode the envelope from a reply payload.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        check_len(payload, REPLY_ENVELOPE_LEN)?;
        Ok(Self {
            outcome_code: read_u16(payload, 0),
            return_data: read_u32(payload, 2) as i32,
            status_bits: read_u16(payload, 6),
        })
    }

    /// Encode the envelope (reply construction, used by tests and
    /// controller simulators).
    pub fn encode(&self) -> [u8; REPLY_ENVELOPE_LEN] {
        let mut buf = [0u8; REPLY_ENVELOPE_LEN];
        buf[0..2].copy_from_slice(&self.outcome_code.to_le_bytes());
        buf[2..6].copy_from_slice(&self.return_data.to_le_bytes());
        buf[6..8].copy_from_slice(&self.status_bits.to_le_bytes());
        buf
    }
}

/// Network configuration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanConfig {
    pub mac: [u8; 6],
    pub ip: [u8; 4],
    pub subnet: [u8; 4],
    pub gateway: [u8; 4],
    pub dns: [u8; 4],
    pub port: u16,
    pub dhcp: bool,
}

/// LAN config: mac (6) + ip (4) + subnet (4) + gateway (4) + dns (4) + port (2) + dhcp (1).
pub const LAN_CONFIG_LEN: usize = 25;

impl LanConfig {
    pub fn encode(&self) -> [u8; LAN_CONFIG_LEN] {
        let mut buf = [0u8; LAN_CONFIG_LEN];
        buf[0..6].copy_from_slice(&self.mac);
        buf[6..10].copy_from_slice(&self.ip);
        buf[10..14].copy_from_slice(&self.subnet);
        buf[14..18].copy_from_slice(&self.gateway);
        buf[18..22].copy_from_slice(&self.dns);
        buf[22..24].copy_from_slice(&self.port.to_le_bytes());
        buf[24] = u8::from(self.dhcp);
        buf
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        check_len(payload, LAN_CONFIG_LEN)?;
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&payload[0..6]);
        let mut ip = [0u8; 4];
        ip.copy_from_slice(&payload[6..10]);
        let mut subnet = [0u8; 4];
        subnet.copy_from_slice(&payload[10..14]);
        let mut gateway = [0u8; 4];
        gateway.copy_from_slice(&payload[14..18]);
        let mut dns = [0u8; 4];
        dns.copy_from_slice(&payload[18..22]);
        Ok(Self {
            mac,
            ip,
            subnet,
            gateway,
            dns,
            port: read_u16(payload, 22),
            dhcp: payload[24] != 0,
        })
    }
}

/// Power-on and fault counters kept in controller FRAM.
///
/// Best-effort diagnostics; the counters are only ever read by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorStatistics {
    /// Number of times the controller entered its working mode.
    pub starts: u32,
    pub error_xt: u16,
    pub error_time_out: u16,
    pub error_init_powerstep: u16,
    pub error_init_wiznet: u16,
    pub error_init_fram: u16,
    pub error_socket: u16,
    pub error_fram: u16,
    pub error_interrupt: u16,
    pub error_extern_5v: u16,
    pub error_extern_vdd: u16,
    pub error_thermal_powerstep: u16,
    pub error_thermal_brake: u16,
    pub error_command_powerstep: u16,
    pub error_uvlo_powerstep: u16,
    pub error_stall_powerstep: u16,
    pub error_work_program: u16,
}

/// Error statistics: starts (4) + sixteen u16 counters.
pub const ERROR_STATISTICS_LEN: usize = 36;

impl ErrorStatistics {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        check_len(payload, ERROR_STATISTICS_LEN)?;
        let counter = |i: usize| read_u16(payload, 4 + 2 * i);
        Ok(Self {
            starts: read_u32(payload, 0),
            error_xt: counter(0),
            error_time_out: counter(1),
            error_init_powerstep: counter(2),
            error_init_wiznet: counter(3),
            error_init_fram: counter(4),
            error_socket: counter(5),
            error_fram: counter(6),
            error_interrupt: counter(7),
            error_extern_5v: counter(8),
            error_extern_vdd: counter(9),
            error_thermal_powerstep: counter(10),
            error_thermal_brake: counter(11),
            error_command_powerstep: counter(12),
            error_uvlo_powerstep: counter(13),
            error_stall_powerstep: counter(14),
            error_work_program: counter(15),
        })
    }
}

/// One stored program instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramEntry {
    pub command: MotorCommand,
    pub data: i32,
}

impl ProgramEntry {
    /// The padding instruction for unused bank slots.
    pub const END: Self = Self {
        command: MotorCommand::End,
        data: 0,
    };
}

/// A program-memory bank: a fixed-size array of stored instructions.
///
/// Writing always transmits the whole bank; unused slots are padded with
/// `END` instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramBank {
    entries: Vec<ProgramEntry>,
}

impl ProgramBank {
    /// Build a bank from the meaningful leading entries.
    pub fn new(entries: impl Into<Vec<ProgramEntry>>) -> Result<Self> {
        let entries = entries.into();
        if entries.len() > PROGRAM_BANK_CAPACITY {
            return Err(ProtoError::ProgramTooLong {
                len: entries.len(),
                max: PROGRAM_BANK_CAPACITY,
            });
        }
        Ok(Self { entries })
    }

    /// The entries, without trailing padding stripped.
    pub fn entries(&self) -> &[ProgramEntry] {
        &self.entries
    }

    /// Encode the full fixed-size bank payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PROGRAM_BANK_LEN);
        for entry in self
            .entries
            .iter()
            .chain(std::iter::repeat(&ProgramEntry::END))
            .take(PROGRAM_BANK_CAPACITY)
        {
            buf.extend_from_slice(&encode_motor_command(entry.command, entry.data));
        }
        buf
    }

    /// Decode a full bank payload read back from the controller.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        check_len(payload, PROGRAM_BANK_LEN)?;
        let mut entries = Vec::with_capacity(PROGRAM_BANK_CAPACITY);
        for chunk in payload[..PROGRAM_BANK_LEN].chunks_exact(MOTOR_COMMAND_LEN) {
            let command = MotorCommand::from_code(chunk[0])
                .ok_or(ProtoError::UnknownCommandCode(chunk[0]))?;
            let data = i32::from_le_bytes([chunk[1], chunk[2], chunk[3], chunk[4]]);
            entries.push(ProgramEntry { command, data });
        }
        Ok(Self { entries })
    }
}

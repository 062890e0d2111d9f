//! Bit-packed status and mode records.
//!
//! The controller packs several replies into shifted bitfields. Each is
//! modeled as a plain record with explicit pack/unpack functions using
//! the documented bit offsets and widths; nothing relies on integer
//! representation beyond the shifts written here.

use crate::error::{ProtoError, Result};

/// Motor drive configuration.
///
/// Packed layout (LSB first):
/// `current_or_voltage` (1 bit) | `motor_type` (6) | `microstepping` (3) |
/// `work_current` (7) | `stop_current` (2) | `program_n` (2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotorMode {
    /// Current (true) or voltage (false) control mode.
    pub current_or_voltage: bool,
    /// Motor type selector, 0–63.
    pub motor_type: u8,
    /// Microstepping divisor selector, 0–7.
    pub microstepping: u8,
    /// Work current selector, 0–127.
    pub work_current: u8,
    /// Stop (hold) current selector, 0–3.
    pub stop_current: u8,
    /// Active program number, 0–3. Reported by the controller; ignored
    /// when writing the mode.
    pub program_n: u8,
}

impl MotorMode {
    /// Pack into the wire representation, validating field widths.
    pub fn pack(&self) -> Result<u32> {
        check_width("motor_type", u32::from(self.motor_type), 63)?;
        check_width("microstepping", u32::from(self.microstepping), 7)?;
        check_width("work_current", u32::from(self.work_current), 127)?;
        check_width("stop_current", u32::from(self.stop_current), 3)?;
        check_width("program_n", u32::from(self.program_n), 3)?;

        Ok(u32::from(self.current_or_voltage)
            | u32::from(self.motor_type) << 1
            | u32::from(self.microstepping) << 7
            | u32::from(self.work_current) << 10
            | u32::from(self.stop_current) << 17
            | u32::from(self.program_n) << 19)
    }

    /// Unpack from the wire representation.
    pub fn unpack(value: u32) -> Self {
        Self {
            current_or_voltage: value & 0x1 != 0,
            motor_type: (value >> 1 & 0x3F) as u8,
            microstepping: (value >> 7 & 0x7) as u8,
            work_current: (value >> 10 & 0x7F) as u8,
            stop_current: (value >> 17 & 0x3) as u8,
            program_n: (value >> 19 & 0x3) as u8,
        }
    }
}

fn check_width(field: &'static str, value: u32, max: u32) -> Result<()> {
    if value > max {
        return Err(ProtoError::ModeFieldRange { field, value, max });
    }
    Ok(())
}

/// Rotation direction reported in the status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Reverse,
    Forward,
}

/// Motor movement state reported in the status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotorState {
    #[default]
    Stopped,
    Acceleration,
    Deceleration,
    ConstantSpeed,
}

/// Snapshot of the POWERSTEP01 status register.
///
/// A best-effort cache of the controller's last reported hardware state:
/// refreshed after every motor-command exchange (even on error replies),
/// never a live value.
///
/// Bit layout: HIZ (0) | BUSY (1) | SW_F (2) | SW_EVN (3) | DIR (4) |
/// MOT_STATUS (5–6) | CMD_ERROR (7) | reserved (8–15).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerstepStatus {
    /// Bridges in high-impedance state.
    pub hi_z: bool,
    /// A command is being executed.
    pub busy: bool,
    /// SW input level.
    pub sw_f: bool,
    /// SW input falling-edge event latched.
    pub sw_evn: bool,
    pub direction: Direction,
    pub motor_state: MotorState,
    /// Last command was not executed.
    pub cmd_error: bool,
    /// Undocumented upper bits, kept verbatim.
    pub reserved: u8,
}

impl PowerstepStatus {
    pub fn from_bits(bits: u16) -> Self {
        Self {
            hi_z: bits & 0x0001 != 0,
            busy: bits & 0x0002 != 0,
            sw_f: bits & 0x0004 != 0,
            sw_evn: bits & 0x0008 != 0,
            direction: if bits & 0x0010 != 0 {
                Direction::Forward
            } else {
                Direction::Reverse
            },
            motor_state: match bits >> 5 & 0x3 {
                0 => MotorState::Stopped,
                1 => MotorState::Acceleration,
                2 => MotorState::Deceleration,
                _ => MotorState::ConstantSpeed,
            },
            cmd_error: bits & 0x0080 != 0,
            reserved: (bits >> 8) as u8,
        }
    }

    pub fn bits(&self) -> u16 {
        u16::from(self.hi_z)
            | u16::from(self.busy) << 1
            | u16::from(self.sw_f) << 2
            | u16::from(self.sw_evn) << 3
            | u16::from(matches!(self.direction, Direction::Forward)) << 4
            | (self.motor_state as u16) << 5
            | u16::from(self.cmd_error) << 7
            | u16::from(self.reserved) << 8
    }
}

/// Input signal snapshot from `get_status_in_event`.
///
/// Three 8-bit groups in one u32: live input bits (0–7), event mask
/// bits (8–15), wait flags (16–23).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputStatus {
    /// Live input signal levels.
    pub inputs: u8,
    /// Masked (ignored) event bits.
    pub mask: u8,
    /// Inputs the running program is waiting on.
    pub wait: u8,
}

impl InputStatus {
    pub fn from_bits(bits: u32) -> Self {
        Self {
            inputs: (bits & 0xFF) as u8,
            mask: (bits >> 8 & 0xFF) as u8,
            wait: (bits >> 16 & 0xFF) as u8,
        }
    }

    /// Level of one input line (0–7).
    pub fn input(&self, line: u8) -> bool {
        self.inputs >> (line & 0x7) & 1 != 0
    }
}

/// Position of the program currently executing on the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackState {
    /// Index of the executing command within its program.
    pub command: u8,
    /// Program (bank) number, 0–3.
    pub program: u8,
}

impl StackState {
    pub fn from_return_data(value: i32) -> Self {
        let value = value as u32;
        Self {
            command: (value & 0xFF) as u8,
            program: (value >> 8 & 0x3) as u8,
        }
    }
}

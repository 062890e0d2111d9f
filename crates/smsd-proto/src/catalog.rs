//! Static command and outcome tables.
//!
//! Pure lookups with no side effects. An unknown numeric code never
//! defaults silently: `from_code` returns `None` and callers surface it
//! as a typed error.

/// Outer frame command-type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    /// Authorization request (also the handshake carrier).
    AuthRequest = 0x00,
    /// Controller reply.
    Response = 0x01,
    /// POWERSTEP01 motor command.
    Motor = 0x02,
    WriteProgram0 = 0x03,
    WriteProgram1 = 0x04,
    WriteProgram2 = 0x05,
    WriteProgram3 = 0x06,
    ReadProgram0 = 0x07,
    ReadProgram1 = 0x08,
    ReadProgram2 = 0x09,
    ReadProgram3 = 0x0A,
    SetLanConfig = 0x0B,
    GetLanConfig = 0x0C,
    SetPassword = 0x0D,
    GetErrorStats = 0x0E,
}

impl CommandType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// One of the four program-memory banks on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryBank {
    Bank0,
    Bank1,
    Bank2,
    Bank3,
}

impl MemoryBank {
    /// Command type that overwrites this bank.
    pub fn write_type(self) -> CommandType {
        match self {
            MemoryBank::Bank0 => CommandType::WriteProgram0,
            MemoryBank::Bank1 => CommandType::WriteProgram1,
            MemoryBank::Bank2 => CommandType::WriteProgram2,
            MemoryBank::Bank3 => CommandType::WriteProgram3,
        }
    }

    /// Command type that reads this bank back.
    pub fn read_type(self) -> CommandType {
        match self {
            MemoryBank::Bank0 => CommandType::ReadProgram0,
            MemoryBank::Bank1 => CommandType::ReadProgram1,
            MemoryBank::Bank2 => CommandType::ReadProgram2,
            MemoryBank::Bank3 => CommandType::ReadProgram3,
        }
    }

    /// Motor command that starts the stored program in this bank.
    pub fn start_command(self) -> MotorCommand {
        match self {
            MemoryBank::Bank0 => MotorCommand::StartProgramMem0,
            MemoryBank::Bank1 => MotorCommand::StartProgramMem1,
            MemoryBank::Bank2 => MotorCommand::StartProgramMem2,
            MemoryBank::Bank3 => MotorCommand::StartProgramMem3,
        }
    }
}

/// POWERSTEP01 motor sub-command codes.
///
/// These are the per-command codes multiplexed inside a
/// [`CommandType::Motor`] frame, and the instruction set stored in
/// program-memory banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MotorCommand {
    End = 0x00,
    GetSpeed = 0x01,
    StatusInEvent = 0x02,
    SetMode = 0x03,
    GetMode = 0x04,
    SetMinSpeed = 0x05,
    SetMaxSpeed = 0x06,
    SetAcc = 0x07,
    SetDec = 0x08,
    SetFsSpeed = 0x09,
    SetMaskEvent = 0x0A,
    GetAbsPos = 0x0B,
    GetElPos = 0x0C,
    GetStatusAndClr = 0x0D,
    GetMinSpeed = 0x0E,
    GetMaxSpeed = 0x0F,
    GetStack = 0x10,
    GoZero = 0x11,
    GoLabel = 0x12,
    MoveF = 0x13,
    MoveR = 0x14,
    GoToF = 0x15,
    GoToR = 0x16,
    GoUntilF = 0x17,
    GoUntilR = 0x18,
    ScanZeroF = 0x19,
    ScanZeroR = 0x1A,
    ScanLabelF = 0x1B,
    ScanLabelR = 0x1C,
    GoTo = 0x1D,
    ResetPos = 0x1E,
    ResetPowerstep = 0x1F,
    SoftStop = 0x20,
    HardStop = 0x21,
    SoftHiZ = 0x22,
    HardHiZ = 0x23,
    SetWait = 0x24,
    SetRele = 0x25,
    ClrRele = 0x26,
    GetRele = 0x27,
    WaitIn0 = 0x28,
    WaitIn1 = 0x29,
    RunF = 0x2A,
    RunR = 0x2B,
    StepClock = 0x2C,
    StopUsb = 0x2D,
    SetWait2 = 0x2E,
    ScanMark2F = 0x2F,
    ScanMark2R = 0x30,
    GotoProgram = 0x31,
    GotoProgramIfIn0 = 0x32,
    GotoProgramIfIn1 = 0x33,
    LoopProgram = 0x34,
    CallProgram = 0x35,
    ReturnProgram = 0x36,
    StartProgramMem0 = 0x37,
    StartProgramMem1 = 0x38,
    StartProgramMem2 = 0x39,
    StartProgramMem3 = 0x3A,
    StopProgramMem = 0x3B,
    GotoProgramIfZero = 0x3C,
    GotoProgramIfInZero = 0x3D,
    WaitContinue = 0x3E,
}

impl MotorCommand {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a command by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        use MotorCommand::*;
        Some(match code {
            0x00 => End,
            0x01 => GetSpeed,
            0x02 => StatusInEvent,
            0x03 => SetMode,
            0x04 => GetMode,
            0x05 => SetMinSpeed,
            0x06 => SetMaxSpeed,
            0x07 => SetAcc,
            0x08 => SetDec,
            0x09 => SetFsSpeed,
            0x0A => SetMaskEvent,
            0x0B => GetAbsPos,
            0x0C => GetElPos,
            0x0D => GetStatusAndClr,
            0x0E => GetMinSpeed,
            0x0F => GetMaxSpeed,
            0x10 => GetStack,
            0x11 => GoZero,
            0x12 => GoLabel,
            0x13 => MoveF,
            0x14 => MoveR,
            0x15 => GoToF,
            0x16 => GoToR,
            0x17 => GoUntilF,
            0x18 => GoUntilR,
            0x19 => ScanZeroF,
            0x1A => ScanZeroR,
            0x1B => ScanLabelF,
            0x1C => ScanLabelR,
            0x1D => GoTo,
            0x1E => ResetPos,
            0x1F => ResetPowerstep,
            0x20 => SoftStop,
            0x21 => HardStop,
            0x22 => SoftHiZ,
            0x23 => HardHiZ,
            0x24 => SetWait,
            0x25 => SetRele,
            0x26 => ClrRele,
            0x27 => GetRele,
            0x28 => WaitIn0,
            0x29 => WaitIn1,
            0x2A => RunF,
            0x2B => RunR,
            0x2C => StepClock,
            0x2D => StopUsb,
            0x2E => SetWait2,
            0x2F => ScanMark2F,
            0x30 => ScanMark2R,
            0x31 => GotoProgram,
            0x32 => GotoProgramIfIn0,
            0x33 => GotoProgramIfIn1,
            0x34 => LoopProgram,
            0x35 => CallProgram,
            0x36 => ReturnProgram,
            0x37 => StartProgramMem0,
            0x38 => StartProgramMem1,
            0x39 => StartProgramMem2,
            0x3A => StartProgramMem3,
            0x3B => StopProgramMem,
            0x3C => GotoProgramIfZero,
            0x3D => GotoProgramIfInZero,
            0x3E => WaitContinue,
            _ => return None,
        })
    }
}

/// Reply outcome codes.
///
/// The controller reuses one numeric field either as an error identifier
/// or as a command-specific success sentinel (the `COMMAND_GET_*` codes
/// echo which getter succeeded). Each dispatcher operation checks the
/// reply against its expected member of this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Outcome {
    Ok = 0x0000,
    OkAccess = 0x0001,
    ErrorAuth = 0x0002,
    ErrorCommand = 0x0003,
    ErrorData = 0x0004,
    ErrorAccessTimeout = 0x0005,
    ErrorWriteSetup = 0x0006,
    ErrorReadSetup = 0x0007,
    ErrorWritePassword = 0x0008,
    ErrorReadPassword = 0x0009,
    ErrorWriteProgram = 0x000A,
    ErrorReadProgram = 0x000B,
    StatusReleSet = 0x000C,
    StatusReleClr = 0x000D,
    EndPrograms = 0x000E,
    CommandGetSpeed = 0x000F,
    CommandGetMode = 0x0010,
    CommandGetMinSpeed = 0x0011,
    CommandGetMaxSpeed = 0x0012,
    CommandGetAbsPos = 0x0013,
    CommandGetElPos = 0x0014,
    CommandGetStatusInEvent = 0x0015,
    CommandGetStack = 0x0016,
}

impl Outcome {
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up an outcome by its numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        use Outcome::*;
        Some(match code {
            0x0000 => Ok,
            0x0001 => OkAccess,
            0x0002 => ErrorAuth,
            0x0003 => ErrorCommand,
            0x0004 => ErrorData,
            0x0005 => ErrorAccessTimeout,
            0x0006 => ErrorWriteSetup,
            0x0007 => ErrorReadSetup,
            0x0008 => ErrorWritePassword,
            0x0009 => ErrorReadPassword,
            0x000A => ErrorWriteProgram,
            0x000B => ErrorReadProgram,
            0x000C => StatusReleSet,
            0x000D => StatusReleClr,
            0x000E => EndPrograms,
            0x000F => CommandGetSpeed,
            0x0010 => CommandGetMode,
            0x0011 => CommandGetMinSpeed,
            0x0012 => CommandGetMaxSpeed,
            0x0013 => CommandGetAbsPos,
            0x0014 => CommandGetElPos,
            0x0015 => CommandGetStatusInEvent,
            0x0016 => CommandGetStack,
            _ => return None,
        })
    }

    /// Symbolic name, as used in the controller documentation and in
    /// outcome-mismatch error messages.
    pub fn name(self) -> &'static str {
        use Outcome::*;
        match self {
            Ok => "OK",
            OkAccess => "OK_ACCESS",
            ErrorAuth => "ERROR_AUTH",
            ErrorCommand => "ERROR_COMMAND",
            ErrorData => "ERROR_DATA",
            ErrorAccessTimeout => "ERROR_ACCESS_TIMEOUT",
            ErrorWriteSetup => "ERROR_WRITE_SETUP",
            ErrorReadSetup => "ERROR_READ_SETUP",
            ErrorWritePassword => "ERROR_WRITE_PASSWORD",
            ErrorReadPassword => "ERROR_READ_PASSWORD",
            ErrorWriteProgram => "ERROR_WRITE_PROGRAM",
            ErrorReadProgram => "ERROR_READ_PROGRAM",
            StatusReleSet => "STATUS_RELE_SET",
            StatusReleClr => "STATUS_RELE_CLR",
            EndPrograms => "END_PROGRAMS",
            CommandGetSpeed => "COMMAND_GET_SPEED",
            CommandGetMode => "COMMAND_GET_MODE",
            CommandGetMinSpeed => "COMMAND_GET_MIN_SPEED",
            CommandGetMaxSpeed => "COMMAND_GET_MAX_SPEED",
            CommandGetAbsPos => "COMMAND_GET_ABS_POS",
            CommandGetElPos => "COMMAND_GET_EL_POS",
            CommandGetStatusInEvent => "COMMAND_GET_STATUS_IN_EVENT",
            CommandGetStack => "COMMAND_GET_STACK",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_command_codes_roundtrip() {
        for code in 0x00..=0x3E {
            let command = MotorCommand::from_code(code).unwrap();
            assert_eq!(command.code(), code);
        }
        assert!(MotorCommand::from_code(0x3F).is_none());
        assert!(MotorCommand::from_code(0xFF).is_none());
    }

    #[test]
    fn outcome_codes_roundtrip() {
        for code in 0x0000..=0x0016 {
            let outcome = Outcome::from_code(code).unwrap();
            assert_eq!(outcome.code(), code);
        }
        assert!(Outcome::from_code(0x0017).is_none());
        assert!(Outcome::from_code(0xFFFF).is_none());
    }

    #[test]
    fn outcome_names_match_device_docs() {
        assert_eq!(Outcome::Ok.name(), "OK");
        assert_eq!(Outcome::OkAccess.name(), "OK_ACCESS");
        assert_eq!(Outcome::StatusReleSet.name(), "STATUS_RELE_SET");
        assert_eq!(Outcome::StatusReleClr.name(), "STATUS_RELE_CLR");
        assert_eq!(Outcome::StatusReleSet.to_string(), "STATUS_RELE_SET");
    }

    #[test]
    fn bank_lookup_tables() {
        assert_eq!(MemoryBank::Bank0.write_type().code(), 0x03);
        assert_eq!(MemoryBank::Bank3.write_type().code(), 0x06);
        assert_eq!(MemoryBank::Bank0.read_type().code(), 0x07);
        assert_eq!(MemoryBank::Bank3.read_type().code(), 0x0A);
        assert_eq!(
            MemoryBank::Bank2.start_command(),
            MotorCommand::StartProgramMem2
        );
    }
}

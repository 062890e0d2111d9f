use bytes::{Bytes, BytesMut};
use tracing::{debug, info};

use smsd_frame::{decode_frame, encode_frame};
use smsd_proto::{
    encode_motor_command, encode_password, CommandType, ErrorStatistics, InputStatus, LanConfig,
    MemoryBank, MotorCommand, MotorMode, Outcome, PowerstepStatus, ProgramBank, ReplyEnvelope,
    StackState,
};
use smsd_transport::{Exchange, SerialConfig, SerialTransport, TcpConfig, TcpTransport};

use crate::error::{ClientError, Result};

/// Offset of the protocol version byte in the raw handshake reply.
const VERSION_REPLY_OFFSET: usize = 1;

/// One connection to an SMSD-LAN controller.
///
/// Owns the transport, the rolling sequence id, the negotiated protocol
/// version and the cached [`PowerstepStatus`]. Strictly synchronous:
/// one request in flight at a time, no retries. A multi-threaded host
/// must serialize access externally (e.g. a mutex around the session);
/// the protocol carries no correlation to disambiguate interleaved
/// exchanges.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    version: u8,
    sequence_id: u8,
    status: PowerstepStatus,
}

impl Session<TcpTransport> {
    /// Connect over TCP and negotiate the protocol version.
    pub fn connect_tcp(config: &TcpConfig) -> Result<Self> {
        Session::connect(TcpTransport::connect(config)?)
    }
}

impl Session<SerialTransport> {
    /// Open the serial port and negotiate the protocol version.
    pub fn connect_serial(config: &SerialConfig) -> Result<Self> {
        Session::connect(SerialTransport::open(config)?)
    }
}

impl<T: Exchange> Session<T> {
    /// Negotiate the protocol version over an already-open transport.
    ///
    /// The handshake is a zero-payload exchange; the version is read
    /// from a fixed offset of the raw reply. Receiving nothing usable
    /// is fatal for connection setup, with no retry.
    pub fn connect(mut transport: T) -> Result<Self> {
        let reply = transport.exchange(&[])?;
        if reply.len() <= VERSION_REPLY_OFFSET {
            return Err(ClientError::VersionNegotiationFailed);
        }
        let version = reply[VERSION_REPLY_OFFSET];
        info!(version, "protocol version negotiated");

        Ok(Self {
            transport,
            version,
            sequence_id: 0,
            status: PowerstepStatus::default(),
        })
    }

    /// The protocol version learned during the handshake.
    pub fn protocol_version(&self) -> u8 {
        self.version
    }

    /// The cached POWERSTEP01 status from the most recent motor-command
    /// reply. A best-effort snapshot, not a live value.
    pub fn powerstep_status(&self) -> PowerstepStatus {
        self.status
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the session and return the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn next_sequence_id(&mut self) -> u8 {
        let id = self.sequence_id;
        self.sequence_id = self.sequence_id.wrapping_add(1);
        id
    }

    /// Build a frame, run one exchange, parse and checksum-validate the
    /// reply frame, and return its payload.
    fn execute(&mut self, command_type: CommandType, payload: &[u8]) -> Result<Bytes> {
        let id = self.next_sequence_id();
        let mut wire = BytesMut::new();
        encode_frame(self.version, command_type.code(), id, payload, &mut wire)?;
        debug!(?command_type, id, len = payload.len(), "request");

        let reply = self.transport.exchange(&wire)?;
        let frame = decode_frame(&reply)?;
        debug!(id = frame.sequence_id, len = frame.payload.len(), "reply");
        Ok(frame.payload)
    }

    fn check_outcome(&self, expected: Outcome, code: u16) -> Result<()> {
        match Outcome::from_code(code) {
            None => Err(ClientError::UnknownOutcomeCode(code)),
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(ClientError::OutcomeMismatch { expected, actual }),
        }
    }

    /// Run a non-motor command whose reply carries the common envelope.
    fn checked_exchange(
        &mut self,
        command_type: CommandType,
        payload: &[u8],
        expected: Outcome,
    ) -> Result<ReplyEnvelope> {
        let reply = self.execute(command_type, payload)?;
        let envelope = ReplyEnvelope::decode(&reply)?;
        self.check_outcome(expected, envelope.outcome_code)?;
        Ok(envelope)
    }

    /// Run one POWERSTEP01 motor command.
    ///
    /// The status cache is refreshed from the reply before the outcome
    /// is checked, so it is updated even when the command failed.
    fn motor_exchange(
        &mut self,
        command: MotorCommand,
        value: i32,
        expected: Outcome,
    ) -> Result<ReplyEnvelope> {
        let payload = encode_motor_command(command, value);
        let reply = self.execute(CommandType::Motor, &payload)?;
        let envelope = ReplyEnvelope::decode(&reply)?;
        self.status = PowerstepStatus::from_bits(envelope.status_bits);
        self.check_outcome(expected, envelope.outcome_code)?;
        Ok(envelope)
    }

    fn get_param(&mut self, command: MotorCommand, expected: Outcome) -> Result<i32> {
        Ok(self.motor_exchange(command, 0, expected)?.return_data)
    }

    fn set_param(&mut self, command: MotorCommand, expected: Outcome, value: i32) -> Result<()> {
        self.motor_exchange(command, value, expected)?;
        Ok(())
    }

    // Access control

    /// Authorize with a password; `None` uses the factory default.
    pub fn authorization(&mut self, password: Option<&str>) -> Result<()> {
        let payload = encode_password(password);
        self.checked_exchange(CommandType::AuthRequest, &payload, Outcome::OkAccess)?;
        Ok(())
    }

    /// Store a new authorization password; `None` restores the default.
    pub fn set_password(&mut self, password: Option<&str>) -> Result<()> {
        let payload = encode_password(password);
        self.checked_exchange(CommandType::SetPassword, &payload, Outcome::Ok)?;
        Ok(())
    }

    // Controller configuration

    /// Read the current network configuration.
    pub fn get_lan_config(&mut self) -> Result<LanConfig> {
        let reply = self.execute(CommandType::GetLanConfig, &[])?;
        Ok(LanConfig::decode(&reply)?)
    }

    /// Write a new network configuration.
    pub fn set_lan_config(&mut self, config: &LanConfig) -> Result<()> {
        self.checked_exchange(CommandType::SetLanConfig, &config.encode(), Outcome::Ok)?;
        Ok(())
    }

    /// Read the power-on and fault counters from controller memory.
    pub fn get_error_statistics(&mut self) -> Result<ErrorStatistics> {
        let reply = self.execute(CommandType::GetErrorStats, &[])?;
        Ok(ErrorStatistics::decode(&reply)?)
    }

    // Speed and drive parameters

    /// Read the configured maximum speed.
    pub fn get_max_speed(&mut self) -> Result<i32> {
        self.get_param(MotorCommand::GetMaxSpeed, Outcome::CommandGetMaxSpeed)
    }

    /// Set the maximum speed.
    pub fn set_max_speed(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::SetMaxSpeed, Outcome::Ok, speed as i32)
    }

    /// Read the configured minimum speed.
    pub fn get_min_speed(&mut self) -> Result<i32> {
        self.get_param(MotorCommand::GetMinSpeed, Outcome::CommandGetMinSpeed)
    }

    /// Set the minimum speed.
    pub fn set_min_speed(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::SetMinSpeed, Outcome::Ok, speed as i32)
    }

    /// Read the current rotation speed.
    pub fn get_speed(&mut self) -> Result<i32> {
        self.get_param(MotorCommand::GetSpeed, Outcome::CommandGetSpeed)
    }

    /// Set the acceleration ramp.
    pub fn set_acc(&mut self, acceleration: u32) -> Result<()> {
        self.set_param(MotorCommand::SetAcc, Outcome::Ok, acceleration as i32)
    }

    /// Set the deceleration ramp.
    pub fn set_dec(&mut self, deceleration: u32) -> Result<()> {
        self.set_param(MotorCommand::SetDec, Outcome::Ok, deceleration as i32)
    }

    /// Set the full-step crossover speed.
    pub fn set_fs_speed(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::SetFsSpeed, Outcome::Ok, speed as i32)
    }

    /// Read the drive mode configuration.
    pub fn get_mode(&mut self) -> Result<MotorMode> {
        let value = self.get_param(MotorCommand::GetMode, Outcome::CommandGetMode)?;
        Ok(MotorMode::unpack(value as u32))
    }

    /// Write the drive mode configuration. The `program_n` field is
    /// reported by the controller and ignored here.
    pub fn set_mode(&mut self, mode: &MotorMode) -> Result<()> {
        let settable = MotorMode {
            program_n: 0,
            ..*mode
        };
        self.set_param(MotorCommand::SetMode, Outcome::Ok, settable.pack()? as i32)
    }

    // Motion

    /// Run continuously forward at the given speed.
    pub fn run_f(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::RunF, Outcome::Ok, speed as i32)
    }

    /// Run continuously in reverse at the given speed.
    pub fn run_r(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::RunR, Outcome::Ok, speed as i32)
    }

    /// Move forward by a number of steps.
    pub fn move_f(&mut self, steps: u32) -> Result<()> {
        self.set_param(MotorCommand::MoveF, Outcome::Ok, steps as i32)
    }

    /// Move in reverse by a number of steps.
    pub fn move_r(&mut self, steps: u32) -> Result<()> {
        self.set_param(MotorCommand::MoveR, Outcome::Ok, steps as i32)
    }

    /// Go to a position, moving forward.
    pub fn go_to_f(&mut self, position: i32) -> Result<()> {
        self.set_param(MotorCommand::GoToF, Outcome::Ok, position)
    }

    /// Go to a position, moving in reverse.
    pub fn go_to_r(&mut self, position: i32) -> Result<()> {
        self.set_param(MotorCommand::GoToR, Outcome::Ok, position)
    }

    /// Go to a position by the shortest path.
    pub fn go_to(&mut self, position: i32) -> Result<()> {
        self.set_param(MotorCommand::GoTo, Outcome::Ok, position)
    }

    /// Run forward at maximum speed until an input signal arrives.
    pub fn go_until_f(&mut self, signal: u8) -> Result<()> {
        self.set_param(MotorCommand::GoUntilF, Outcome::Ok, i32::from(signal))
    }

    /// Run in reverse at maximum speed until an input signal arrives.
    pub fn go_until_r(&mut self, signal: u8) -> Result<()> {
        self.set_param(MotorCommand::GoUntilR, Outcome::Ok, i32::from(signal))
    }

    /// Search for the zero position, moving forward.
    pub fn scan_zero_f(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::ScanZeroF, Outcome::Ok, speed as i32)
    }

    /// Search for the zero position, moving in reverse.
    pub fn scan_zero_r(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::ScanZeroR, Outcome::Ok, speed as i32)
    }

    /// Search for the position label, moving forward.
    pub fn scan_label_f(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::ScanLabelF, Outcome::Ok, speed as i32)
    }

    /// Search for the position label, moving in reverse.
    pub fn scan_label_r(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::ScanLabelR, Outcome::Ok, speed as i32)
    }

    /// Search for the second position mark, moving forward.
    pub fn scan_mark2_f(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::ScanMark2F, Outcome::Ok, speed as i32)
    }

    /// Search for the second position mark, moving in reverse.
    pub fn scan_mark2_r(&mut self, speed: u32) -> Result<()> {
        self.set_param(MotorCommand::ScanMark2R, Outcome::Ok, speed as i32)
    }

    /// Move to the zero position.
    pub fn go_zero(&mut self) -> Result<()> {
        self.set_param(MotorCommand::GoZero, Outcome::Ok, 0)
    }

    /// Move to the labeled position.
    pub fn go_label(&mut self) -> Result<()> {
        self.set_param(MotorCommand::GoLabel, Outcome::Ok, 0)
    }

    /// Zero the position counter.
    pub fn reset_pos(&mut self) -> Result<()> {
        self.set_param(MotorCommand::ResetPos, Outcome::Ok, 0)
    }

    /// Hardware and software reset of the stepper module (not the whole
    /// controller).
    pub fn reset_powerstep(&mut self) -> Result<()> {
        self.set_param(MotorCommand::ResetPowerstep, Outcome::Ok, 0)
    }

    /// Stop smoothly using the configured deceleration.
    pub fn soft_stop(&mut self) -> Result<()> {
        self.set_param(MotorCommand::SoftStop, Outcome::Ok, 0)
    }

    /// Stop immediately.
    pub fn hard_stop(&mut self) -> Result<()> {
        self.set_param(MotorCommand::HardStop, Outcome::Ok, 0)
    }

    /// Stop smoothly, then release the windings.
    pub fn soft_hi_z(&mut self) -> Result<()> {
        self.set_param(MotorCommand::SoftHiZ, Outcome::Ok, 0)
    }

    /// Stop immediately and release the windings.
    pub fn hard_hi_z(&mut self) -> Result<()> {
        self.set_param(MotorCommand::HardHiZ, Outcome::Ok, 0)
    }

    /// Switch control over to the EN/STEP/DIR hardware inputs.
    pub fn step_clock(&mut self) -> Result<()> {
        self.set_param(MotorCommand::StepClock, Outcome::Ok, 0)
    }

    // Position and status readout

    /// Read the absolute motor position.
    pub fn get_abs_pos(&mut self) -> Result<i32> {
        self.get_param(MotorCommand::GetAbsPos, Outcome::CommandGetAbsPos)
    }

    /// Read the electrical position of the rotor.
    pub fn get_el_pos(&mut self) -> Result<i32> {
        self.get_param(MotorCommand::GetElPos, Outcome::CommandGetElPos)
    }

    /// Read the status register and clear all latched error flags. Also
    /// refreshes the cached status.
    pub fn get_status_and_clr(&mut self) -> Result<PowerstepStatus> {
        let value = self.get_param(MotorCommand::GetStatusAndClr, Outcome::Ok)?;
        Ok(PowerstepStatus::from_bits(value as u16))
    }

    /// Read the input signal levels, event masks and wait flags.
    pub fn get_status_in_event(&mut self) -> Result<InputStatus> {
        let value = self.get_param(
            MotorCommand::StatusInEvent,
            Outcome::CommandGetStatusInEvent,
        )?;
        Ok(InputStatus::from_bits(value as u32))
    }

    /// Mask input signal events.
    pub fn set_mask_event(&mut self, mask: u8) -> Result<()> {
        self.set_param(MotorCommand::SetMaskEvent, Outcome::Ok, i32::from(mask))
    }

    // Relay

    /// Energize the controller relay.
    pub fn set_rele(&mut self) -> Result<()> {
        self.set_param(MotorCommand::SetRele, Outcome::StatusReleSet, 0)
    }

    /// De-energize the controller relay.
    pub fn clr_rele(&mut self) -> Result<()> {
        self.set_param(MotorCommand::ClrRele, Outcome::StatusReleClr, 0)
    }

    /// Query the relay state.
    ///
    /// Protocol quirk, preserved as explicit policy: the controller
    /// answers this query with one of two status codes that the generic
    /// path treats as mismatches. Both are remapped to a boolean here;
    /// any other code stays a genuine error.
    pub fn get_rele(&mut self) -> Result<bool> {
        match self.motor_exchange(MotorCommand::GetRele, 0, Outcome::StatusReleSet) {
            Ok(_) => Ok(true),
            Err(ClientError::OutcomeMismatch {
                actual: Outcome::StatusReleClr,
                ..
            }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    // Wait primitives

    /// Pause the executing program.
    pub fn set_wait(&mut self, time: u32) -> Result<()> {
        self.set_param(MotorCommand::SetWait, Outcome::Ok, time as i32)
    }

    /// Pause the executing program; the pause can be cut short by a
    /// signal on IN0, IN1 or SET_ZERO.
    pub fn set_wait_2(&mut self, time: u32) -> Result<()> {
        self.set_param(MotorCommand::SetWait2, Outcome::Ok, time as i32)
    }

    /// Wait for a signal on input IN0.
    pub fn wait_in0(&mut self) -> Result<()> {
        self.set_param(MotorCommand::WaitIn0, Outcome::Ok, 0)
    }

    /// Wait for a signal on input IN1.
    pub fn wait_in1(&mut self) -> Result<()> {
        self.set_param(MotorCommand::WaitIn1, Outcome::Ok, 0)
    }

    /// Wait for a synchronization signal on the CONTINUE input.
    pub fn wait_continue(&mut self) -> Result<()> {
        self.set_param(MotorCommand::WaitContinue, Outcome::Ok, 0)
    }

    // Stored programs

    /// Mark the end of a stored program.
    pub fn end(&mut self) -> Result<()> {
        self.set_param(MotorCommand::End, Outcome::EndPrograms, 0)
    }

    /// Shut down the controller's USB interface.
    pub fn stop_usb(&mut self) -> Result<()> {
        self.set_param(MotorCommand::StopUsb, Outcome::EndPrograms, 0)
    }

    /// Write a whole program-memory bank. The full fixed-size array is
    /// transmitted regardless of how many entries are meaningful.
    pub fn write_program(&mut self, bank: MemoryBank, program: &ProgramBank) -> Result<()> {
        self.checked_exchange(bank.write_type(), &program.encode(), Outcome::Ok)?;
        Ok(())
    }

    /// Read a whole program-memory bank back.
    pub fn read_program(&mut self, bank: MemoryBank) -> Result<ProgramBank> {
        let reply = self.execute(bank.read_type(), &[])?;
        Ok(ProgramBank::decode(&reply)?)
    }

    /// Start the stored program in the given bank.
    pub fn start_program(&mut self, bank: MemoryBank) -> Result<()> {
        self.set_param(bank.start_command(), Outcome::Ok, 0)
    }

    /// Stop the executing stored program.
    pub fn stop_program(&mut self) -> Result<()> {
        self.set_param(MotorCommand::StopProgramMem, Outcome::Ok, 0)
    }

    /// Read which program and command the controller is executing.
    pub fn get_stack(&mut self) -> Result<StackState> {
        let value = self.get_param(MotorCommand::GetStack, Outcome::CommandGetStack)?;
        Ok(StackState::from_return_data(value))
    }

    // Program flow control

    fn program_target(program: u8, command: u8) -> i32 {
        i32::from(program) << 8 | i32::from(command)
    }

    /// Unconditional jump to a command of a stored program.
    pub fn goto_program(&mut self, program: u8, command: u8) -> Result<()> {
        self.set_param(
            MotorCommand::GotoProgram,
            Outcome::Ok,
            Self::program_target(program, command),
        )
    }

    /// Jump if a signal is present on input IN0.
    pub fn goto_program_if_in0(&mut self, program: u8, command: u8) -> Result<()> {
        self.set_param(
            MotorCommand::GotoProgramIfIn0,
            Outcome::Ok,
            Self::program_target(program, command),
        )
    }

    /// Jump if a signal is present on input IN1.
    pub fn goto_program_if_in1(&mut self, program: u8, command: u8) -> Result<()> {
        self.set_param(
            MotorCommand::GotoProgramIfIn1,
            Outcome::Ok,
            Self::program_target(program, command),
        )
    }

    /// Jump if the current position is zero.
    pub fn goto_program_if_zero(&mut self, program: u8, command: u8) -> Result<()> {
        self.set_param(
            MotorCommand::GotoProgramIfZero,
            Outcome::Ok,
            Self::program_target(program, command),
        )
    }

    /// Jump if a signal is present on the SET_ZERO input.
    pub fn goto_program_if_in_zero(&mut self, program: u8, command: u8) -> Result<()> {
        self.set_param(
            MotorCommand::GotoProgramIfInZero,
            Outcome::Ok,
            Self::program_target(program, command),
        )
    }

    /// Call a subprogram.
    pub fn call_program(&mut self, program: u8, command: u8) -> Result<()> {
        self.set_param(
            MotorCommand::CallProgram,
            Outcome::Ok,
            Self::program_target(program, command),
        )
    }

    /// Return from a subprogram.
    pub fn return_program(&mut self) -> Result<()> {
        self.set_param(MotorCommand::ReturnProgram, Outcome::Ok, 0)
    }

    /// Repeat the previous `commands` commands `cycles` times.
    pub fn loop_program(&mut self, cycles: u16, commands: u16) -> Result<()> {
        self.set_param(
            MotorCommand::LoopProgram,
            Outcome::Ok,
            i32::from(cycles) << 10 | i32::from(commands),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use smsd_frame::FrameError;
    use smsd_proto::{ProgramEntry, DEFAULT_PASSWORD, MOTOR_COMMAND_LEN};

    use super::*;

    /// Transport double that records requests and plays back canned
    /// replies.
    #[derive(Debug)]
    struct ScriptedTransport {
        requests: Vec<Vec<u8>>,
        replies: VecDeque<Vec<u8>>,
    }

    impl ScriptedTransport {
        fn new(replies: impl IntoIterator<Item = Vec<u8>>) -> Self {
            Self {
                requests: Vec::new(),
                replies: replies.into_iter().collect(),
            }
        }
    }

    impl Exchange for ScriptedTransport {
        fn exchange(&mut self, request: &[u8]) -> smsd_transport::Result<Vec<u8>> {
            self.requests.push(request.to_vec());
            Ok(self.replies.pop_front().expect("unscripted exchange"))
        }
    }

    const VERSION: u8 = 7;

    /// Raw handshake reply carrying protocol version 7 at offset 1.
    fn handshake_reply() -> Vec<u8> {
        vec![0x00, VERSION, 0x00]
    }

    fn reply_frame(payload: &[u8]) -> Vec<u8> {
        let mut wire = BytesMut::new();
        encode_frame(VERSION, CommandType::Response.code(), 0, payload, &mut wire).unwrap();
        wire.to_vec()
    }

    fn envelope_reply(outcome: Outcome, return_data: i32, status_bits: u16) -> Vec<u8> {
        let envelope = ReplyEnvelope {
            outcome_code: outcome.code(),
            return_data,
            status_bits,
        };
        reply_frame(&envelope.encode())
    }

    fn session_with(replies: Vec<Vec<u8>>) -> Session<ScriptedTransport> {
        let mut scripted = vec![handshake_reply()];
        scripted.extend(replies);
        Session::connect(ScriptedTransport::new(scripted)).unwrap()
    }

    #[test]
    fn handshake_negotiates_version() {
        let session = session_with(vec![]);
        assert_eq!(session.protocol_version(), VERSION);
        // The handshake itself is a zero-byte exchange.
        assert!(session.transport().requests[0].is_empty());
    }

    #[test]
    fn handshake_empty_reply_is_fatal() {
        let err = Session::connect(ScriptedTransport::new(vec![vec![]])).unwrap_err();
        assert!(matches!(err, ClientError::VersionNegotiationFailed));

        // A one-byte reply has no version byte at offset 1 either.
        let err = Session::connect(ScriptedTransport::new(vec![vec![0x00]])).unwrap_err();
        assert!(matches!(err, ClientError::VersionNegotiationFailed));
    }

    #[test]
    fn requests_stamp_negotiated_version() {
        let mut session = session_with(vec![envelope_reply(Outcome::Ok, 0, 0)]);
        session.set_max_speed(200).unwrap();

        let request = &session.transport().requests[1];
        assert_eq!(request[0], VERSION);
        assert_eq!(request[1], CommandType::Motor.code());
    }

    #[test]
    fn sequence_id_wraps_after_256_requests() {
        let replies = (0..257)
            .map(|_| envelope_reply(Outcome::Ok, 0, 0))
            .collect();
        let mut session = session_with(replies);

        for _ in 0..257 {
            session.soft_stop().unwrap();
        }

        let requests = &session.transport().requests;
        // Request 0 is the raw handshake; framed requests follow.
        assert_eq!(requests[1][2], 0);
        assert_eq!(requests[2][2], 1);
        assert_eq!(requests[256][2], 255);
        assert_eq!(requests[257][2], 0);
    }

    #[test]
    fn authorization_without_password_sends_default() {
        let mut session = session_with(vec![envelope_reply(Outcome::OkAccess, 0, 0)]);
        session.authorization(None).unwrap();

        let frame = decode_frame(&session.transport().requests[1]).unwrap();
        assert_eq!(frame.command_type, CommandType::AuthRequest.code());
        assert_eq!(frame.payload.as_ref(), DEFAULT_PASSWORD);
    }

    #[test]
    fn authorization_with_password_sends_ascii_bytes() {
        let mut session = session_with(vec![envelope_reply(Outcome::OkAccess, 0, 0)]);
        session.authorization(Some("12345678")).unwrap();

        let frame = decode_frame(&session.transport().requests[1]).unwrap();
        assert_eq!(frame.payload.as_ref(), b"12345678");
    }

    #[test]
    fn authorization_failure_carries_symbolic_name() {
        let mut session = session_with(vec![envelope_reply(Outcome::ErrorAuth, 0, 0)]);
        let err = session.authorization(None).unwrap_err();
        assert!(err.to_string().contains("ERROR_AUTH"));
    }

    #[test]
    fn set_max_speed_accepts_expected_outcome() {
        let mut session = session_with(vec![envelope_reply(Outcome::Ok, 0, 0)]);
        session.set_max_speed(200).unwrap();

        let frame = decode_frame(&session.transport().requests[1]).unwrap();
        assert_eq!(frame.payload.as_ref(), &[0x06, 0xC8, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn outcome_mismatch_carries_actual_name() {
        let mut session = session_with(vec![envelope_reply(Outcome::ErrorData, 0, 0)]);
        let err = session.set_max_speed(200).unwrap_err();

        match err {
            ClientError::OutcomeMismatch { expected, actual } => {
                assert_eq!(expected, Outcome::Ok);
                assert_eq!(actual, Outcome::ErrorData);
                assert_eq!(actual.name(), "ERROR_DATA");
            }
            other => panic!("expected OutcomeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn unknown_outcome_code_is_not_defaulted() {
        let envelope = ReplyEnvelope {
            outcome_code: 0x4242,
            return_data: 0,
            status_bits: 0,
        };
        let mut session = session_with(vec![reply_frame(&envelope.encode())]);

        let err = session.soft_stop().unwrap_err();
        assert!(matches!(err, ClientError::UnknownOutcomeCode(0x4242)));
    }

    #[test]
    fn get_param_returns_reply_data() {
        let mut session = session_with(vec![envelope_reply(
            Outcome::CommandGetMaxSpeed,
            200,
            0,
        )]);
        assert_eq!(session.get_max_speed().unwrap(), 200);
    }

    #[test]
    fn get_rele_remaps_both_status_codes() {
        let mut session = session_with(vec![
            envelope_reply(Outcome::StatusReleSet, 0, 0),
            envelope_reply(Outcome::StatusReleClr, 0, 0),
            envelope_reply(Outcome::ErrorCommand, 0, 0),
        ]);

        assert!(session.get_rele().unwrap());
        assert!(!session.get_rele().unwrap());

        let err = session.get_rele().unwrap_err();
        assert!(matches!(
            err,
            ClientError::OutcomeMismatch {
                actual: Outcome::ErrorCommand,
                ..
            }
        ));
    }

    #[test]
    fn status_cache_refreshed_even_on_error_reply() {
        let mut session = session_with(vec![envelope_reply(Outcome::ErrorData, 0, 0x0002)]);

        assert!(session.move_f(100).is_err());
        assert!(session.powerstep_status().busy);
    }

    #[test]
    fn status_cache_tracks_latest_motor_reply() {
        let mut session = session_with(vec![
            envelope_reply(Outcome::Ok, 0, 0x0001),
            envelope_reply(Outcome::Ok, 0, 0x0000),
        ]);

        session.soft_stop().unwrap();
        assert!(session.powerstep_status().hi_z);
        session.soft_stop().unwrap();
        assert!(!session.powerstep_status().hi_z);
    }

    #[test]
    fn get_status_and_clr_decodes_bits() {
        let mut session = session_with(vec![envelope_reply(Outcome::Ok, 0x0003, 0x0003)]);
        let status = session.get_status_and_clr().unwrap();
        assert!(status.hi_z);
        assert!(status.busy);
    }

    #[test]
    fn corrupted_reply_frame_is_a_checksum_error() {
        let mut reply = envelope_reply(Outcome::Ok, 0, 0);
        let mid = reply.len() / 2;
        reply[mid] ^= 0xFF;

        let mut session = session_with(vec![reply]);
        let err = session.soft_stop().unwrap_err();
        assert!(matches!(
            err,
            ClientError::Frame(FrameError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn get_lan_config_decodes_reply() {
        let config = LanConfig {
            mac: [0, 1, 2, 3, 4, 5],
            ip: [192, 168, 1, 2],
            subnet: [255, 255, 255, 0],
            gateway: [192, 168, 1, 1],
            dns: [8, 8, 4, 4],
            port: 5000,
            dhcp: true,
        };
        let mut session = session_with(vec![reply_frame(&config.encode())]);
        assert_eq!(session.get_lan_config().unwrap(), config);
    }

    #[test]
    fn write_program_transmits_whole_bank() {
        let bank = ProgramBank::new(vec![ProgramEntry {
            command: MotorCommand::MoveF,
            data: 5000,
        }])
        .unwrap();

        let mut session = session_with(vec![envelope_reply(Outcome::Ok, 0, 0)]);
        session.write_program(MemoryBank::Bank1, &bank).unwrap();

        let frame = decode_frame(&session.transport().requests[1]).unwrap();
        assert_eq!(frame.command_type, 0x04);
        assert_eq!(
            frame.payload.len(),
            smsd_proto::PROGRAM_BANK_CAPACITY * MOTOR_COMMAND_LEN
        );
    }

    #[test]
    fn read_program_decodes_bank() {
        let bank = ProgramBank::new(vec![ProgramEntry {
            command: MotorCommand::SetWait,
            data: 1000,
        }])
        .unwrap();
        let mut session = session_with(vec![reply_frame(&bank.encode())]);

        let read_back = session.read_program(MemoryBank::Bank2).unwrap();
        assert_eq!(read_back.entries()[0].command, MotorCommand::SetWait);
        assert_eq!(read_back.entries()[0].data, 1000);

        let frame = decode_frame(&session.transport().requests[1]).unwrap();
        assert_eq!(frame.command_type, 0x09);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn get_stack_unpacks_program_and_command() {
        let mut session = session_with(vec![envelope_reply(
            Outcome::CommandGetStack,
            0x0000_0215,
            0,
        )]);
        let stack = session.get_stack().unwrap();
        assert_eq!(stack.command, 0x15);
        assert_eq!(stack.program, 2);
    }

    #[test]
    fn program_flow_arguments_are_packed() {
        let mut session = session_with(vec![
            envelope_reply(Outcome::Ok, 0, 0),
            envelope_reply(Outcome::Ok, 0, 0),
        ]);

        session.goto_program(2, 0x15).unwrap();
        let frame = decode_frame(&session.transport().requests[1]).unwrap();
        assert_eq!(&frame.payload[1..5], &(0x0215i32).to_le_bytes());

        session.loop_program(3, 2).unwrap();
        let frame = decode_frame(&session.transport().requests[2]).unwrap();
        assert_eq!(&frame.payload[1..5], &((3i32 << 10) | 2).to_le_bytes());
    }

    #[test]
    fn short_reply_payload_is_typed() {
        let mut session = session_with(vec![reply_frame(&[0x00, 0x00])]);
        let err = session.soft_stop().unwrap_err();
        assert!(matches!(
            err,
            ClientError::Proto(smsd_proto::ProtoError::ShortPayload { .. })
        ));
    }
}

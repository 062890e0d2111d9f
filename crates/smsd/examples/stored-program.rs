//! Write a small looping program to bank 0 and start it.
//!
//! Run with:
//!   cargo run --example stored-program -- 192.168.1.2

use smsd::{MemoryBank, MotorCommand, ProgramBank, ProgramEntry, Session, TcpConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = std::env::args().nth(1).unwrap_or_else(|| "192.168.1.2".into());

    let mut session = Session::connect_tcp(&TcpConfig::new(host))?;
    session.authorization(None)?;

    // Shuttle back and forth ten times: move, pause, return, pause, loop.
    let entry = |command, data| ProgramEntry { command, data };
    let program = ProgramBank::new(vec![
        entry(MotorCommand::SetMaxSpeed, 400),
        entry(MotorCommand::MoveF, 5_000),
        entry(MotorCommand::SetWait, 500),
        entry(MotorCommand::MoveR, 5_000),
        entry(MotorCommand::SetWait, 500),
        entry(MotorCommand::LoopProgram, (10 << 10) | 4),
        entry(MotorCommand::End, 0),
    ])?;

    session.write_program(MemoryBank::Bank0, &program)?;

    let read_back = session.read_program(MemoryBank::Bank0)?;
    eprintln!(
        "bank 0 starts with {:?}",
        &read_back.entries()[..program.entries().len()]
    );

    session.start_program(MemoryBank::Bank0)?;
    let stack = session.get_stack()?;
    eprintln!(
        "running program {} at command {}",
        stack.program, stack.command
    );

    Ok(())
}

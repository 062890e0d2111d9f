//! Connect over TCP, authorize, and run a few motions.
//!
//! Run with:
//!   cargo run --example motor-basics -- 192.168.1.2
//!
//! Set RUST_LOG=debug to see every frame on the wire.

use std::thread;
use std::time::Duration;

use smsd::{MotorMode, Session, TcpConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = std::env::args().nth(1).unwrap_or_else(|| "192.168.1.2".into());

    let mut session = Session::connect_tcp(&TcpConfig::new(host))?;
    eprintln!("protocol version {}", session.protocol_version());

    session.authorization(None)?;

    let lan = session.get_lan_config()?;
    eprintln!("controller at {:?} port {}", lan.ip, lan.port);

    let stats = session.get_error_statistics()?;
    eprintln!("{} power-ons recorded", stats.starts);

    session.set_mode(&MotorMode {
        current_or_voltage: true,
        motor_type: 30,
        microstepping: 4,
        work_current: 15,
        stop_current: 0,
        program_n: 0,
    })?;
    session.set_acc(100)?;
    session.set_dec(100)?;
    session.set_min_speed(0)?;
    session.set_max_speed(400)?;

    session.move_f(10_000)?;
    while session.get_status_and_clr()?.busy {
        thread::sleep(Duration::from_millis(100));
    }
    eprintln!("absolute position: {}", session.get_abs_pos()?);

    session.set_rele()?;
    eprintln!("relay on: {}", session.get_rele()?);
    session.clr_rele()?;

    session.soft_hi_z()?;
    Ok(())
}

#![cfg(feature = "usb")]

//! Push an NDEF text record to a phone over LLCP with a SNEP PUT, or wait
//! as a target and print whatever the peer sends.
//!
//! Usage:
//!   cargo run -p libpafe-p2p --example llcp_snep_put --features usb -- [target] [text]

use anyhow::Context;
use libpafe_p2p::prelude::*;

/// SNEP 1.0 PUT request header
const SNEP_VERSION: u8 = 0x10;
const SNEP_PUT: u8 = 0x02;

/// Short well-known Text record, language "en".
fn ndef_text(text: &str) -> Vec<u8> {
    let mut payload = vec![0x02, b'e', b'n'];
    payload.extend_from_slice(text.as_bytes());
    let mut record = vec![0xD1, 0x01, payload.len() as u8, b'T'];
    record.extend(payload);
    record
}

fn snep_put(ndef: &[u8]) -> Vec<u8> {
    let mut msg = vec![SNEP_VERSION, SNEP_PUT];
    msg.extend_from_slice(&(ndef.len() as u32).to_be_bytes());
    msg.extend_from_slice(ndef);
    msg
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1).peekable();
    let as_target = args.peek().map(String::as_str) == Some("target");
    if as_target {
        args.next();
    }
    let text = args.next().unwrap_or_else(|| "hello from libpafe-p2p".to_string());

    let device = DeviceBuilder::new()
        .usb()
        .context("no RC-S956 reader on the usb bus")?
        .timeout_ms(500)
        .target_timeout_ms(5000)
        .build_uninitialized()?
        .initialize()
        .context("reader initialization failed")?;
    println!("opened {:?}", device.device_type());

    let mut session = LlcpSession::builder(device)
        .on_receive(|data| println!("received [{}]", bytes_to_hex_spaced(data)))
        .build()?;

    if as_target {
        if !session.start_as_target()? {
            println!("initiator released the link before activation");
            return Ok(());
        }
    } else {
        session
            .start_as_initiator(DepMode::Act424k)
            .context("no peer answered InJumpForDEP")?;
        let msg = snep_put(&ndef_text(&text));
        println!("snep put [{}]", bytes_to_hex_spaced(&msg));
        session.set_send_data(&msg)?;
    }
    println!(
        "{:?} at {:?}, lto {} ms",
        session.role(),
        session.dep_mode(),
        session.link_timeout_ms()
    );

    let mut turns = 0u32;
    while session.poll() {
        turns += 1;
        // a SNEP server answers the PUT; hang up once it had time to
        if !as_target && turns == 200 {
            session.stop_request();
        }
    }
    match session.close_reason() {
        Some(reason) => println!("link closed after {} turns: {}", turns, reason),
        None => println!("link closed after {} turns", turns),
    }
    Ok(())
}

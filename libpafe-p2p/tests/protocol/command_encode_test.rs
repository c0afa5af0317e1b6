#[path = "../common/mod.rs"]
mod common;

use libpafe_p2p::constants::{REG_106K_TARGET, TARGET_SYSTEM_CODE};
use libpafe_p2p::protocol::codec::encode_command_frame;
use libpafe_p2p::protocol::{Command, Frame};
use libpafe_p2p::{ActPass, BaudRate, DepMode, NfcId3};

#[test]
fn jump_for_dep_carries_general_bytes() {
    let gb = common::fixtures::initiator_general_bytes();
    let mode = DepMode::Act424k;
    let cmd = Command::InJumpForDep {
        act_pass: mode.act_pass(),
        baud_rate: mode.baud_rate(),
        nfcid3: None,
        general_bytes: gb.clone(),
    };
    let payload = Frame::decode(&encode_command_frame(&cmd).unwrap()).unwrap();
    assert_eq!(payload[..5], [0xD4, 0x56, 0x01, 0x02, 0x04]);
    assert_eq!(payload[5..], gb[..]);
}

#[test]
fn passive_jump_carries_initiator_data() {
    let cmd = Command::InJumpForDep {
        act_pass: ActPass::Passive,
        baud_rate: BaudRate::Br212k,
        nfcid3: None,
        general_bytes: vec![],
    };
    // FeliCa polling request at 212k
    assert_eq!(
        cmd.encode(),
        vec![0xD4, 0x56, 0x00, 0x01, 0x01, 0x00, 0xFF, 0xFF, 0x01, 0x00]
    );
}

#[test]
fn tg_init_as_target_is_framed() {
    let id = NfcId3::from_id2([1, 2, 3, 4, 5, 6, 7, 8]);
    let cmd = Command::TgInitAsTarget {
        nfcid3: id,
        system_code: TARGET_SYSTEM_CODE,
        general_bytes: vec![],
    };
    let frame = encode_command_frame(&cmd).unwrap();
    let payload = Frame::decode(&frame).unwrap();
    assert_eq!(payload.len(), 39);
    assert_eq!(payload[25..27], [0xFF, 0xFF]);
    assert_eq!(payload[27..37], id.as_bytes()[..]);
}

#[test]
fn write_register_lists_address_value_triples() {
    let cmd = Command::WriteRegister {
        registers: REG_106K_TARGET.to_vec(),
    };
    assert_eq!(
        cmd.encode(),
        vec![0xD4, 0x08, 0x63, 0x16, 0xFF, 0x63, 0x17, 0x3F, 0x63, 0x18, 0x11]
    );
}

#[test]
fn data_exchange_addresses_target_one() {
    let cmd = Command::InDataExchange {
        data: vec![0x11, 0x20, 0x05, 0x01, 0x01],
    };
    assert_eq!(cmd.encode()[..3], [0xD4, 0x40, 0x01]);
    assert_eq!(Command::InRelease.encode(), vec![0xD4, 0x52, 0x01]);
}

#[path = "../common/mod.rs"]
mod common;

use libpafe_p2p::config::LlcpConfig;
use libpafe_p2p::constants::{REG_106K_DEFAULT, REG_106K_TARGET};
use libpafe_p2p::dep::{self, atr::general_bytes};
use libpafe_p2p::protocol::commands::{encode_tg_response_to_initiator, encode_write_register};
use libpafe_p2p::test_support::chip_reply;
use libpafe_p2p::{ActivationError, DepMode, Error, Role};

/// Replies up to and including TgInitAsTarget.
fn until_activation(body: &[u8]) -> Vec<Vec<u8>> {
    let mut replies = chip_reply(0x12, &[]);
    replies.extend(chip_reply(0x08, &[]));
    replies.extend(chip_reply(0x8C, body));
    replies
}

#[test]
fn passive_424k_activation_commits_general_bytes() {
    let mut replies = until_activation(&common::fixtures::init_as_target_body(0x26));
    replies.extend(chip_reply(0x08, &[]));
    replies.extend(chip_reply(0x92, &[0x00]));
    replies.extend(chip_reply(0x04, &[0x00, 0x01, 0x00, 0x00, 0x03]));
    let (mock, mut dev) = common::helpers::initialized_device(replies);
    let config = LlcpConfig::default();

    let act = dep::start_as_target(&mut dev, &config).unwrap().unwrap();
    assert_eq!(act.role, Role::Target);
    assert_eq!(act.mode, DepMode::Psv424k);
    assert_eq!(act.remote.version, Some((1, 1)));
    assert_eq!(act.remote.lto_ms, 150);

    let cmds = common::helpers::commands_after_init(&mock);
    assert_eq!(cmds.len(), 6);
    assert_eq!(cmds[0], vec![0xD4, 0x12, 0x00]);
    assert_eq!(cmds[1], encode_write_register(&REG_106K_TARGET));
    assert_eq!(cmds[2][..2], [0xD4, 0x8C]);
    assert_eq!(cmds[3], encode_write_register(&REG_106K_DEFAULT));
    assert_eq!(cmds[4][2..], general_bytes(&config)[..]);
    assert_eq!(cmds[5], vec![0xD4, 0x04]);
}

#[test]
fn release_before_activation_is_answered() {
    // LEN D4 0A DID
    let (mock, mut dev) = common::helpers::initialized_device({
        let mut replies = until_activation(&[0x04, 0x04, 0xD4, 0x0A, 0x00]);
        replies.extend(chip_reply(0x90, &[0x00]));
        replies.extend(chip_reply(0x08, &[]));
        replies
    });

    assert!(dep::start_as_target(&mut dev, &LlcpConfig::default()).unwrap().is_none());
    let cmds = common::helpers::commands_after_init(&mock);
    assert_eq!(
        cmds[3],
        encode_tg_response_to_initiator(&[0x04, 0xD5, 0x0B, 0x00])
    );
    assert_eq!(cmds[4], encode_write_register(&REG_106K_DEFAULT));
}

#[test]
fn non_dep_activation_is_refused() {
    let (_mock, mut dev) =
        common::helpers::initialized_device(until_activation(&common::fixtures::init_as_target_body(0x22)));
    assert!(matches!(
        dep::start_as_target(&mut dev, &LlcpConfig::default()),
        Err(Error::Activation(ActivationError::TargetMode(0x22)))
    ));
}

#[test]
fn chip_outside_dep_mode_is_refused() {
    let mut replies = until_activation(&common::fixtures::init_as_target_body(0x04));
    replies.extend(chip_reply(0x92, &[0x00]));
    replies.extend(chip_reply(0x04, &[0x00, 0x01, 0x00, 0x00, 0x05]));
    let (_mock, mut dev) = common::helpers::initialized_device(replies);

    assert!(matches!(
        dep::start_as_target(&mut dev, &LlcpConfig::default()),
        Err(Error::Activation(ActivationError::TxMode(0x05)))
    ));
}

#[path = "../common/mod.rs"]
mod common;

use libpafe_p2p::config::LlcpConfig;
use libpafe_p2p::dep::{self, atr::general_bytes};
use libpafe_p2p::test_support::{atr_res_with, chip_reply};
use libpafe_p2p::{ActivationError, DepMode, Error, Role};

#[test]
fn jump_for_dep_activates_with_remote_params() {
    let (mock, mut dev) =
        common::helpers::initialized_device(chip_reply(0x56, &common::fixtures::jump_for_dep_body()));
    let config = LlcpConfig::default();

    let act = dep::start_as_initiator(&mut dev, &config, DepMode::Act424k).unwrap();
    assert_eq!(act.role, Role::Initiator);
    assert_eq!(act.mode, DepMode::Act424k);
    assert_eq!(act.remote.version, Some((1, 0)));
    assert_eq!(act.remote.wks, 0x0011);
    assert_eq!(act.remote.lto_ms, 100);

    let cmds = common::helpers::commands_after_init(&mock);
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0][..5], [0xD4, 0x56, 0x01, 0x02, 0x06]);
    assert_eq!(cmds[0][5..15], config.nfcid3.as_bytes()[..]);
    assert_eq!(cmds[0][15..], general_bytes(&config)[..]);
}

#[test]
fn general_bytes_without_version_are_refused() {
    let mut body = vec![0x00];
    body.extend(atr_res_with(&hex::decode("46666d0302001104010a").unwrap()));
    let (_mock, mut dev) = common::helpers::initialized_device(chip_reply(0x56, &body));

    match dep::start_as_initiator(&mut dev, &LlcpConfig::default(), DepMode::Psv212k) {
        Err(Error::Activation(ActivationError::MissingVersion)) => {}
        other => panic!("expected MissingVersion, got {:?}", other),
    }
}

#[test]
fn foreign_general_bytes_are_refused() {
    let mut body = vec![0x00];
    body.extend(atr_res_with(&[0x00, 0x01, 0x02, 0x01, 0x01, 0x10]));
    let (_mock, mut dev) = common::helpers::initialized_device(chip_reply(0x56, &body));

    assert!(matches!(
        dep::start_as_initiator(&mut dev, &LlcpConfig::default(), DepMode::Act106k),
        Err(Error::Activation(ActivationError::MagicNumber))
    ));
}

#[test]
fn no_target_in_range_times_out() {
    let (_mock, mut dev) = common::helpers::initialized_device(chip_reply(0x56, &[0x01]));
    assert!(matches!(
        dep::start_as_initiator(&mut dev, &LlcpConfig::default(), DepMode::Act424k),
        Err(Error::Timeout)
    ));
}

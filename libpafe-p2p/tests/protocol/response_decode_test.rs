#[path = "../common/mod.rs"]
mod common;

use libpafe_p2p::Error;
use libpafe_p2p::protocol::codec::decode_response_frame;
use libpafe_p2p::protocol::{Frame, Response, TargetActivation};

fn frame(payload: &[u8]) -> Vec<u8> {
    Frame::encode(payload).unwrap()
}

#[test]
fn jump_for_dep_returns_atr_res() {
    let mut payload = vec![0xD5, 0x57];
    payload.extend(common::fixtures::jump_for_dep_body());
    match decode_response_frame(0x56, &frame(&payload)).unwrap() {
        Response::JumpForDep { atr_res } => {
            assert_eq!(atr_res[0], 0x01);
            assert_eq!(atr_res[16..19], [0x46, 0x66, 0x6D]);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn init_as_target_splits_mode_and_atr_req() {
    let mut payload = vec![0xD5, 0x8D];
    payload.extend(common::fixtures::init_as_target_body(0x26));
    match decode_response_frame(0x8C, &frame(&payload)).unwrap() {
        Response::TargetActivated(TargetActivation {
            mode,
            initiator_command,
        }) => {
            assert_eq!(mode, 0x26);
            assert_eq!(initiator_command[0] as usize, initiator_command.len());
            assert_eq!(initiator_command[1..3], [0xD4, 0x00]);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn data_exchange_status_is_checked() {
    assert!(matches!(
        decode_response_frame(0x40, &frame(&[0xD5, 0x41, 0x01])),
        Err(Error::Timeout)
    ));
    assert!(matches!(
        decode_response_frame(0x40, &frame(&[0xD5, 0x41, 0x13])),
        Err(Error::ChipStatus {
            command: 0x40,
            status: 0x13
        })
    ));
    assert_eq!(
        decode_response_frame(0x40, &common::fixtures::symm_exchange_frame()).unwrap(),
        Response::Data(vec![0x00, 0x00])
    );
}

#[test]
fn general_status_reports_tx_mode() {
    match decode_response_frame(0x04, &frame(&[0xD5, 0x05, 0x00, 0x01, 0x00, 0x00, 0x05])).unwrap() {
        Response::GeneralStatus(st) => {
            assert!(!st.is_dep());
            assert_eq!(st.tx_mode, 0x05);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn response_for_another_command_is_rejected() {
    assert!(matches!(
        decode_response_frame(0x86, &common::fixtures::symm_exchange_frame()),
        Err(Error::UnexpectedResponse {
            expected: 0x87,
            actual: 0x41
        })
    ));
}

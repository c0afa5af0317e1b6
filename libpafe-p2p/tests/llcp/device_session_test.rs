// Whole stack: LlcpSession over a Device over a MockTransport.

#[path = "../common/mod.rs"]
mod common;

use std::cell::RefCell;
use std::rc::Rc;

use libpafe_p2p::constants::llcp::MAX_INFO_LEN;
use libpafe_p2p::dep::atr::encode_general_bytes;
use libpafe_p2p::llcp::{Param, Sequence, pdu};
use libpafe_p2p::test_support::{ManualClock, atr_res_with, chip_reply};
use libpafe_p2p::{CloseReason, DepMode, LlcpSession, Role, Sap};

use common::fixtures::{init_as_target_body, jump_for_dep_body, ok_with};

const LOCAL: Sap = Sap::new(0x20);
const PEER: Sap = Sap::new(0x21);

#[test]
fn initiator_connects_and_is_disconnected() {
    let mut replies = chip_reply(0x56, &jump_for_dep_body());
    replies.extend(chip_reply(0x40, &ok_with(&pdu::dm(LOCAL, Sap::SNEP, 0x02))));
    replies.extend(chip_reply(0x52, &[0x00]));
    replies.extend(chip_reply(0x18, &[]));
    let (mock, dev) = common::helpers::initialized_device(replies);

    let mut s = LlcpSession::builder(dev)
        .clock(Box::new(ManualClock::new()))
        .build()
        .unwrap();
    s.start_as_initiator(DepMode::Act424k).unwrap();
    s.set_send_data(b"snep").unwrap();
    assert!(!s.poll());
    assert_eq!(s.close_reason(), Some(&CloseReason::PeerDisconnect { reason: 0x02 }));

    let cmds = common::helpers::commands_after_init(&mock);
    assert_eq!(cmds.len(), 4);
    assert_eq!(cmds[0][..2], [0xD4, 0x56]);
    assert_eq!(
        cmds[1],
        vec![0xD4, 0x40, 0x01, 0x11, 0x20, 0x05, 0x01, 0x01]
    );
    assert_eq!(cmds[2], vec![0xD4, 0x52, 0x01]);
    assert_eq!(cmds[3], vec![0xD4, 0x18, 0x01]);
}

#[test]
fn large_peer_miu_still_fits_the_chip_frame() {
    let peer_gb = encode_general_bytes(&[
        Param::Version { major: 1, minor: 0 },
        Param::Miux(0x80),
        Param::Wks(0x0011),
    ]);
    let mut jump = vec![0x00];
    jump.extend(atr_res_with(&peer_gb));
    let mut replies = chip_reply(0x56, &jump);
    replies.extend(chip_reply(0x40, &ok_with(&pdu::cc(LOCAL, Sap::SNEP, &[]))));
    replies.extend(chip_reply(0x40, &ok_with(&pdu::rr(LOCAL, Sap::SNEP, 1))));
    replies.extend(chip_reply(0x40, &ok_with(&pdu::rr(LOCAL, Sap::SNEP, 2))));
    replies.extend(chip_reply(0x40, &ok_with(&pdu::dm(LOCAL, Sap::SNEP, 0x00))));
    replies.extend(chip_reply(0x52, &[0x00]));
    replies.extend(chip_reply(0x18, &[]));
    let (mock, dev) = common::helpers::initialized_device(replies);

    let mut s = LlcpSession::builder(dev)
        .clock(Box::new(ManualClock::new()))
        .build()
        .unwrap();
    s.start_as_initiator(DepMode::Act424k).unwrap();
    s.set_send_data(&[0x55; 300]).unwrap();
    for _ in 0..3 {
        assert!(s.poll());
    }
    assert!(!s.poll());
    assert_eq!(s.close_reason(), Some(&CloseReason::PeerDisconnect { reason: 0 }));

    let cmds = common::helpers::commands_after_init(&mock);
    assert_eq!(cmds.len(), 7);
    // D4 40 Tg, I-PDU header, sequence, information
    assert_eq!(cmds[2].len(), 255);
    assert_eq!(cmds[2][3..6], [0x13, 0x20, 0x00]);
    assert_eq!(cmds[2].len() - 6, MAX_INFO_LEN);
    assert_eq!(cmds[3][3..6], [0x13, 0x20, 0x10]);
    assert_eq!(cmds[3].len() - 6, 300 - MAX_INFO_LEN);
    assert!(cmds[2][6..].iter().chain(&cmds[3][6..]).all(|&b| b == 0x55));
}

#[test]
fn chip_error_during_exchange_skips_release() {
    let mut replies = chip_reply(0x56, &jump_for_dep_body());
    replies.extend(chip_reply(0x40, &[0x13]));
    replies.extend(chip_reply(0x18, &[]));
    let (mock, dev) = common::helpers::initialized_device(replies);

    let mut s = LlcpSession::builder(dev)
        .clock(Box::new(ManualClock::new()))
        .build()
        .unwrap();
    s.start_as_initiator(DepMode::Psv424k).unwrap();
    assert!(!s.poll());
    assert!(matches!(
        s.close_reason(),
        Some(CloseReason::TransportFailure(_))
    ));

    let cmds = common::helpers::commands_after_init(&mock);
    assert_eq!(cmds.len(), 3);
    assert_eq!(cmds[2], vec![0xD4, 0x18, 0x01]);
}

#[test]
fn target_accepts_connection_and_answers_disc() {
    let mut replies = chip_reply(0x12, &[]);
    replies.extend(chip_reply(0x08, &[]));
    replies.extend(chip_reply(0x8C, &init_as_target_body(0x26)));
    replies.extend(chip_reply(0x08, &[]));
    replies.extend(chip_reply(0x92, &[0x00]));
    replies.extend(chip_reply(0x04, &[0x00, 0x01, 0x00, 0x00, 0x03]));
    let turns = [
        pdu::connect(Sap::SNEP, PEER, &[Param::Rw(1)]),
        pdu::i(Sap::SNEP, PEER, Sequence::new(0, 0), b"ndef"),
        pdu::disc(Sap::SNEP, PEER),
    ];
    for t in &turns {
        replies.extend(chip_reply(0x86, &ok_with(t)));
        replies.extend(chip_reply(0x8E, &[0x00]));
    }
    replies.extend(chip_reply(0x18, &[]));
    let (mock, dev) = common::helpers::initialized_device(replies);

    let got = Rc::new(RefCell::new(Vec::new()));
    let sink = got.clone();
    let mut s = LlcpSession::builder(dev)
        .clock(Box::new(ManualClock::new()))
        .on_receive(move |data| sink.borrow_mut().push(data.to_vec()))
        .build()
        .unwrap();
    assert!(s.start_as_target().unwrap());
    assert_eq!(s.role(), Some(Role::Target));
    assert_eq!(s.link_timeout_ms(), 150);

    for _ in 0..5 {
        assert!(s.poll());
    }
    assert!(!s.poll());
    assert_eq!(*got.borrow(), vec![b"ndef".to_vec()]);
    assert_eq!(s.close_reason(), Some(&CloseReason::PeerDisconnect { reason: 0 }));

    let cmds = common::helpers::commands_after_init(&mock);
    assert_eq!(cmds.len(), 13);
    let answers: Vec<&[u8]> = cmds[6..12]
        .iter()
        .skip(1)
        .step_by(2)
        .map(|c| &c[2..])
        .collect();
    assert_eq!(
        answers,
        vec![
            &pdu::cc(PEER, Sap::SNEP, &[Param::Rw(1)])[..],
            &pdu::rr(PEER, Sap::SNEP, 1)[..],
            &pdu::dm(PEER, Sap::SNEP, 0)[..],
        ]
    );
    assert_eq!(cmds[12], vec![0xD4, 0x18, 0x01]);
}

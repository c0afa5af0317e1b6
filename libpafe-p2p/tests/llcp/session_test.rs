// Session behaviour over a scripted reader.

#[path = "../common/mod.rs"]
mod common;

use std::cell::RefCell;
use std::rc::Rc;

use libpafe_p2p::config::LlcpConfig;
use libpafe_p2p::constants::llcp::MAGIC;
use libpafe_p2p::llcp::{Param, PduType, pdu};
use libpafe_p2p::test_support::{
    Call, ManualClock, Reply, ScriptedPcd, atr_req_with, atr_res_with, peer_general_bytes,
};
use libpafe_p2p::{CloseReason, ConnState, DepMode, LlcpSession, Role, Sap};
use proptest::prelude::*;

const LOCAL: Sap = Sap::new(0x20);
const PEER: Sap = Sap::new(0x21);

fn session(pcd: ScriptedPcd, clock: &ManualClock) -> LlcpSession<ScriptedPcd> {
    common::helpers::init_logger();
    LlcpSession::builder(pcd.with_clock(clock.clone()))
        .clock(Box::new(clock.clone()))
        .build()
        .unwrap()
}

fn initiator(clock: &ManualClock) -> LlcpSession<ScriptedPcd> {
    let pcd = ScriptedPcd::new().with_atr_res(atr_res_with(&peer_general_bytes()));
    let mut s = session(pcd, clock);
    s.start_as_initiator(DepMode::Act424k).unwrap();
    s
}

fn target(clock: &ManualClock) -> LlcpSession<ScriptedPcd> {
    let pcd = ScriptedPcd::new().with_activation(0x26, atr_req_with(&peer_general_bytes()));
    let mut s = session(pcd, clock);
    assert!(s.start_as_target().unwrap());
    s
}

#[test]
fn atr_res_without_version_leaves_session_idle() {
    let clock = ManualClock::new();
    let atr_res = atr_res_with(&MAGIC);
    assert_eq!(atr_res.len(), 19);
    let mut s = session(ScriptedPcd::new().with_atr_res(atr_res), &clock);

    assert!(s.start_as_initiator(DepMode::Act106k).is_err());
    assert_eq!(s.dep_mode(), None);
    assert_eq!(s.state(), ConnState::None);
    assert!(!s.poll());
}

#[test]
fn passive_424k_target_uses_default_link_timeout() {
    let clock = ManualClock::new();
    let s = target(&clock);
    assert_eq!(s.role(), Some(Role::Target));
    assert_eq!(s.dep_mode(), Some(DepMode::Psv424k));
    assert_eq!(s.link_timeout_ms(), 100);
    assert!(!s.is_sending());
}

#[test]
fn set_send_data_connects_to_snep() {
    let clock = ManualClock::new();
    let mut s = initiator(&clock);
    assert_eq!(s.state(), ConnState::NotConnected);

    s.set_send_data(&[0xC1, 0x00, 0x00, 0x00, 0x00, 0x02, 0xD0, 0x00]).unwrap();
    assert_eq!(s.state(), ConnState::Connecting);
    s.pcd_mut().push_data(pdu::symm());
    assert!(s.poll());
    let connect = &s.pcd().sent()[0];
    let header = pdu::PduHeader::decode(connect).unwrap();
    assert_eq!(header.ptype, PduType::Connect);
    assert_eq!(header.dsap, Sap::SNEP);
    assert_eq!(header.ssap, LOCAL);
}

#[test]
fn connect_with_lto_and_rw_updates_link_timeout() {
    let clock = ManualClock::new();
    let mut s = target(&clock);
    s.pcd_mut()
        .push_data(pdu::connect(Sap::SNEP, PEER, &[Param::Lto(50), Param::Rw(3)]));
    assert!(s.poll());
    assert_eq!(s.link_timeout_ms(), 500);
    assert!(s.is_active());

    // the CC goes out on the next turn
    assert!(s.poll());
    assert_eq!(s.state(), ConnState::Normal);
    assert_eq!(
        *s.pcd().sent().last().unwrap(),
        pdu::cc(PEER, Sap::SNEP, &[Param::Rw(1)])
    );
}

#[test]
fn dm_in_any_state_closes_the_session() {
    let clock = ManualClock::new();

    let mut idle = initiator(&clock);
    let mut connecting = initiator(&clock);
    connecting.set_send_data(b"x").unwrap();
    let mut connected = initiator(&clock);
    connected.send_request(b"y").unwrap();
    connected.pcd_mut().push_data(pdu::cc(LOCAL, Sap::SNEP, &[]));
    assert!(connected.poll());
    assert_eq!(connected.state(), ConnState::Normal);

    for s in [&mut idle, &mut connecting, &mut connected] {
        s.pcd_mut().push_data(pdu::dm(LOCAL, Sap::SNEP, 0x01));
        assert!(!s.poll());
        assert_eq!(s.state(), ConnState::None);
        assert_eq!(s.close_reason(), Some(&CloseReason::PeerDisconnect { reason: 0x01 }));
        assert_eq!(s.pcd().count(&Call::Reset), 1);

        let calls = s.pcd().calls.len();
        assert!(!s.poll());
        assert!(!s.poll());
        assert_eq!(s.pcd().calls.len(), calls);
    }
}

#[test]
fn initiator_timeout_disconnects_connection() {
    let clock = ManualClock::new();
    let mut s = initiator(&clock);
    s.send_request(b"payload").unwrap();
    s.pcd_mut().push_data(pdu::cc(LOCAL, Sap::SNEP, &[]));
    assert!(s.poll());

    s.pcd_mut().push_reply(Reply::Late {
        after_ms: 150,
        data: pdu::rr(LOCAL, Sap::SNEP, 1),
    });
    assert!(s.poll());
    assert_eq!(s.state(), ConnState::Term);

    s.pcd_mut().push_data(pdu::dm(LOCAL, Sap::SNEP, 0x00));
    assert!(!s.poll());
    assert_eq!(*s.pcd().sent().last().unwrap(), pdu::disc(Sap::SNEP, LOCAL));
    assert_eq!(s.close_reason(), Some(&CloseReason::LinkTimeout));
    assert_eq!(s.pcd().count(&Call::InRelease), 1);
}

#[test]
fn target_payloads_reach_the_callback() {
    let clock = ManualClock::new();
    let got = Rc::new(RefCell::new(Vec::new()));
    let sink = got.clone();
    let pcd = ScriptedPcd::new()
        .with_activation(0x15, atr_req_with(&peer_general_bytes()))
        .with_clock(clock.clone());
    let mut s = LlcpSession::builder(pcd)
        .clock(Box::new(clock.clone()))
        .on_receive(move |data| sink.borrow_mut().push(data.to_vec()))
        .build()
        .unwrap();
    assert!(s.start_as_target().unwrap());
    assert_eq!(s.dep_mode(), Some(DepMode::Act212k));

    s.pcd_mut()
        .push_data(pdu::build(LOCAL, PduType::Ui, PEER, b"first"));
    s.pcd_mut()
        .push_data(pdu::build(LOCAL, PduType::Ui, PEER, b"second"));
    for _ in 0..4 {
        assert!(s.poll());
    }
    assert_eq!(*got.borrow(), vec![b"first".to_vec(), b"second".to_vec()]);
}

#[test]
fn stop_request_is_always_accepted() {
    let clock = ManualClock::new();
    let mut idle = session(ScriptedPcd::new(), &clock);
    assert!(idle.stop_request());

    let mut s = initiator(&clock);
    assert!(s.stop_request());
    assert!(s.stop_request());
    s.pcd_mut().push_data(pdu::symm());
    assert!(!s.poll());
    assert_eq!(
        s.pcd().sent(),
        vec![pdu::disc(Sap::LINK_MANAGEMENT, Sap::LINK_MANAGEMENT)]
    );
    assert_eq!(s.close_reason(), Some(&CloseReason::LocalRequest));
}

#[test]
fn session_can_restart_after_close() {
    let clock = ManualClock::new();
    let mut s = initiator(&clock);
    s.pcd_mut().push_data(pdu::dm(LOCAL, Sap::SNEP, 0x00));
    assert!(!s.poll());

    s.start_as_initiator(DepMode::Psv106k).unwrap();
    assert_eq!(s.dep_mode(), Some(DepMode::Psv106k));
    assert_eq!(s.state(), ConnState::NotConnected);
    assert_eq!(s.close_reason(), None);
}

#[test]
fn config_miux_reaches_the_general_bytes() {
    let clock = ManualClock::new();
    let config = LlcpConfig {
        miux: 0x40,
        ..LlcpConfig::default()
    };
    let pcd = ScriptedPcd::new()
        .with_atr_res(atr_res_with(&peer_general_bytes()))
        .with_clock(clock.clone());
    let mut s = LlcpSession::builder(pcd).config(config).build().unwrap();
    s.start_as_initiator(DepMode::Act424k).unwrap();
    match &s.pcd().calls[0] {
        Call::InJumpForDep { general_bytes, .. } => {
            assert!(general_bytes.windows(4).any(|w| w == [0x02, 0x02, 0x00, 0x40]));
        }
        other => panic!("unexpected call {:?}", other),
    }
}

fn arb_reply() -> impl Strategy<Value = Reply> {
    prop_oneof![
        4 => Just(Reply::Data(pdu::symm())),
        2 => Just(Reply::Data(pdu::build(LOCAL, PduType::Ui, PEER, b"ui"))),
        1 => Just(Reply::Timeout),
        1 => Just(Reply::Late { after_ms: 200, data: pdu::symm() }),
        1 => Just(Reply::Data(pdu::dm(LOCAL, PEER, 0x00))),
    ]
}

proptest! {
    #[test]
    fn target_turns_alternate_until_close(replies in prop::collection::vec(arb_reply(), 0..24)) {
        let clock = ManualClock::new();
        let mut s = target(&clock);
        s.pcd_mut().replies.extend(replies);

        let mut previous = None;
        for _ in 0..64 {
            let sending = s.is_sending();
            if let Some(p) = previous {
                prop_assert_ne!(p, sending);
            }
            previous = Some(sending);
            if !s.poll() {
                break;
            }
        }
        // an empty script times out, and every timeout leads to a close
        prop_assert!(!s.is_active());
        prop_assert!(!s.is_sending());
        prop_assert_eq!(s.pcd().count(&Call::Reset), 1);
    }

    #[test]
    fn remote_version_policy(major in 0u8..16, minor in 0u8..16) {
        let clock = ManualClock::new();
        let mut s = initiator(&clock);
        s.pcd_mut().push_data(pdu::pax(&[Param::Version { major, minor }]));
        let alive = s.poll();
        prop_assert_eq!(alive, major >= 1);
    }
}

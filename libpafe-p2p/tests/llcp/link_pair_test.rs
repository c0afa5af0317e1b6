// Two links wired back to back: every PDU one side transmits is the next
// PDU the other side receives.

#[path = "../common/mod.rs"]
mod common;

use libpafe_p2p::config::LlcpConfig;
use libpafe_p2p::llcp::{CloseReason, ConnState, Event, Link, LinkParams, Step};
use libpafe_p2p::Sap;
use proptest::prelude::*;

/// One turn: `from` transmits, `to` receives. Returns both steps.
fn turn(from: &mut Link, to: &mut Link) -> (Step, Step) {
    let pdu = from
        .step(Event::Transmit)
        .send
        .expect("live link always transmits");
    let sent = from.step(Event::Transmitted);
    (sent, to.step(Event::Received(&pdu)))
}

fn pair() -> (Link, Link) {
    let config = LlcpConfig::default();
    (
        Link::new(&config, LinkParams::default()),
        Link::new(&config, LinkParams::default()),
    )
}

/// CONNECT from `a`, CC from `b`.
fn connect(a: &mut Link, b: &mut Link, data: &[u8]) {
    a.set_send_data(data).unwrap();
    turn(a, b);
    turn(b, a);
    assert_eq!(a.state(), ConnState::Normal);
    assert_eq!(b.state(), ConnState::Normal);
}

#[test]
fn connect_exchange_and_disconnect() {
    common::helpers::init_logger();
    let (mut a, mut b) = pair();
    connect(&mut a, &mut b, b"hello world");
    assert_eq!(b.local_sap(), Sap::SNEP);
    assert_eq!(b.remote_sap(), a.local_sap());

    let (_, at_b) = turn(&mut a, &mut b);
    assert_eq!(at_b.delivered, vec![b"hello world".to_vec()]);
    // RR acknowledges the I-PDU
    turn(&mut b, &mut a);
    assert_eq!(a.sequence().ns, 1);

    b.add_send_data(b"ok").unwrap();
    b.send_request().unwrap();
    turn(&mut a, &mut b);
    let (_, at_a) = turn(&mut b, &mut a);
    assert_eq!(at_a.delivered, vec![b"ok".to_vec()]);

    a.stop_request();
    let (sent, _) = turn(&mut a, &mut b);
    assert!(sent.close.is_none());
    assert_eq!(a.state(), ConnState::WaitDm);
    assert_eq!(b.state(), ConnState::Dm);

    let (sent, at_a) = turn(&mut b, &mut a);
    assert_eq!(sent.close, Some(CloseReason::PeerDisconnect { reason: 0 }));
    assert_eq!(at_a.close, Some(CloseReason::LocalRequest));
    assert_eq!(a.state(), ConnState::None);
    assert_eq!(b.state(), ConnState::None);
}

#[test]
fn window_of_one_holds_second_fragment() {
    let (mut a, mut b) = pair();
    connect(&mut a, &mut b, &[0x5A; 200]);

    let (_, at_b) = turn(&mut a, &mut b);
    assert_eq!(at_b.delivered[0].len(), 128);
    // b has not acknowledged yet; a may only send RR
    let rr = a.step(Event::Transmit).send.unwrap();
    assert_eq!(rr.len(), 3);
    assert_eq!(a.pending_send_len(), 72);
}

#[test]
fn idle_links_keep_exchanging_symm() {
    let (mut a, mut b) = pair();
    for _ in 0..10 {
        let (_, at_b) = turn(&mut a, &mut b);
        let (_, at_a) = turn(&mut b, &mut a);
        assert_eq!(at_a, Step::default());
        assert_eq!(at_b, Step::default());
    }
    assert_eq!(a.state(), ConnState::NotConnected);
    assert_eq!(b.state(), ConnState::NotConnected);
}

proptest! {
    #[test]
    fn payload_arrives_intact(payload in prop::collection::vec(any::<u8>(), 1..=1024)) {
        let (mut a, mut b) = pair();
        connect(&mut a, &mut b, &payload);

        let mut received = Vec::new();
        for _ in 0..16 {
            let (_, at_b) = turn(&mut a, &mut b);
            prop_assert!(at_b.close.is_none());
            for d in at_b.delivered {
                prop_assert!(d.len() <= 128);
                received.extend(d);
            }
            turn(&mut b, &mut a);
            if a.pending_send_len() == 0 && received.len() == payload.len() {
                break;
            }
        }
        prop_assert_eq!(received, payload);
        prop_assert_eq!(a.sequence().ns, b.sequence().nr);
    }
}

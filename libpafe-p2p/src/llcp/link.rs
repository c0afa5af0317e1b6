// libpafe-p2p/src/llcp/link.rs
//! Connection state machine.
//!
//! `Link` does no I/O. The session feeds it one `Event` per turn and carries
//! out the returned `Step`: transmit `send`, hand `delivered` payloads to the
//! receive callback and close the session once `close` is set.
//!
//! ```text
//! NOT_CONNECTED -> CONNECTING -> NORMAL <-> BUSY
//! NORMAL/BUSY -> TERM -(DISC sent)-> WAIT_DM -(DM)-> NONE
//! DISC received -> DM -(DM sent)-> NONE
//! ```

use derive_more::Display;

use crate::Error;
use crate::Result;
use crate::config::LlcpConfig;
use crate::constants::llcp::{MAX_INFO_LEN, PDU_HEADER_LEN, PDU_SEQUENCE_INFO_POS};
use crate::error::Violation;
use crate::llcp::negotiate::LinkParams;
use crate::llcp::param::Param;
use crate::llcp::pdu::{self, PduHeader, PduType, Sequence};
use crate::types::Sap;
use crate::utils::HexDump;

/// DM reason answering a DISC
const DM_REASON_DISC_RECEIVED: u8 = 0x00;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    #[display(fmt = "NONE")]
    None,
    #[display(fmt = "NOT_CONNECTED")]
    NotConnected,
    #[display(fmt = "CONNECTING")]
    Connecting,
    #[display(fmt = "NORMAL")]
    Normal,
    #[display(fmt = "BUSY")]
    Busy,
    #[display(fmt = "TERM")]
    Term,
    #[display(fmt = "WAIT_DM")]
    WaitDm,
    #[display(fmt = "DM")]
    Dm,
}

impl ConnState {
    /// DISC or DM is pending or already sent.
    pub fn is_tearing_down(&self) -> bool {
        matches!(self, Self::Term | Self::WaitDm | Self::Dm)
    }
}

/// Why a link reached `NONE`.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum CloseReason {
    #[display(fmt = "local request")]
    LocalRequest,
    #[display(fmt = "peer disconnect (reason {:#04x})", reason)]
    PeerDisconnect { reason: u8 },
    #[display(fmt = "protocol violation: {}", _0)]
    ProtocolViolation(Violation),
    #[display(fmt = "transport failure: {}", _0)]
    TransportFailure(String),
    #[display(fmt = "link timeout")]
    LinkTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    /// It is our turn to send one PDU
    Transmit,
    /// The PDU produced by the last `Transmit` went out
    Transmitted,
    Received(&'a [u8]),
    /// No reply within the negotiated LTO
    LinkTimeout,
    TransportFailed(String),
}

/// Outcome of one `step`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Step {
    pub send: Option<Vec<u8>>,
    pub delivered: Vec<Vec<u8>>,
    pub close: Option<CloseReason>,
}

/// Where analysis of a PDU left the read position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Offset just past this PDU
    Next(usize),
    /// The rest of the buffer belongs to this PDU
    Sdu,
}

pub struct Link {
    state: ConnState,
    local_sap: Sap,
    remote_sap: Sap,
    service_sap: Sap,
    connection_params: Vec<Param>,
    remote: LinkParams,
    send_buf: Vec<u8>,
    send_capacity: usize,
    send_ready: bool,
    vs: u8,
    vr: u8,
    awaiting_ack: bool,
    connect_sent: bool,
    reply_cc: bool,
    disc_addr: (Sap, Sap),
    dm_addr: (Sap, Sap),
    dm_reason: u8,
    pending_close: Option<CloseReason>,
    close_reason: Option<CloseReason>,
}

impl Link {
    /// A link in `NOT_CONNECTED`, with `remote` holding what activation
    /// learnt from the peer's general bytes.
    pub fn new(config: &LlcpConfig, remote: LinkParams) -> Self {
        let lm = Sap::LINK_MANAGEMENT;
        Self {
            state: ConnState::NotConnected,
            local_sap: config.local_sap(),
            remote_sap: config.service_sap(),
            service_sap: config.service_sap(),
            connection_params: config.connection_params(),
            remote,
            send_buf: Vec::with_capacity(config.max_send_len),
            send_capacity: config.max_send_len,
            send_ready: false,
            vs: 0,
            vr: 0,
            awaiting_ack: false,
            connect_sent: false,
            reply_cc: false,
            disc_addr: (lm, lm),
            dm_addr: (lm, lm),
            dm_reason: DM_REASON_DISC_RECEIVED,
            pending_close: None,
            close_reason: None,
        }
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    pub fn remote_params(&self) -> &LinkParams {
        &self.remote
    }

    pub fn link_timeout_ms(&self) -> u16 {
        self.remote.lto_ms
    }

    pub fn close_reason(&self) -> Option<&CloseReason> {
        self.close_reason.as_ref()
    }

    pub fn local_sap(&self) -> Sap {
        self.local_sap
    }

    pub fn remote_sap(&self) -> Sap {
        self.remote_sap
    }

    /// Current V(S)/V(R)
    pub fn sequence(&self) -> Sequence {
        Sequence::new(self.vs, self.vr)
    }

    /// Bytes queued and not yet sent.
    pub fn pending_send_len(&self) -> usize {
        self.send_buf.len()
    }

    /// Replace the send buffer and request a connection to the service SAP.
    pub fn set_send_data(&mut self, data: &[u8]) -> Result<()> {
        if self.state != ConnState::NotConnected || self.reply_cc {
            return Err(Error::InvalidState("a connection is already pending"));
        }
        if data.len() > self.send_capacity {
            return Err(Error::SendBufferFull {
                capacity: self.send_capacity,
                requested: data.len(),
            });
        }
        self.send_buf.clear();
        self.send_buf.extend_from_slice(data);
        self.send_ready = true;
        self.enter(ConnState::Connecting);
        Ok(())
    }

    /// Append to the send buffer without marking it ready.
    pub fn add_send_data(&mut self, data: &[u8]) -> Result<()> {
        if !self.accepts_data() {
            return Err(Error::InvalidState("link is not accepting data"));
        }
        let requested = self.send_buf.len() + data.len();
        if requested > self.send_capacity {
            return Err(Error::SendBufferFull {
                capacity: self.send_capacity,
                requested,
            });
        }
        self.send_buf.extend_from_slice(data);
        Ok(())
    }

    /// Mark the send buffer ready, connecting first if needed.
    pub fn send_request(&mut self) -> Result<()> {
        if !self.accepts_data() {
            return Err(Error::InvalidState("link is not accepting data"));
        }
        self.send_ready = true;
        if self.state == ConnState::NotConnected && !self.reply_cc {
            self.enter(ConnState::Connecting);
        }
        Ok(())
    }

    /// Start a graceful DISC -> DM teardown on the next turn. No-op once the
    /// link is already closing.
    pub fn stop_request(&mut self) {
        if self.begin_teardown(CloseReason::LocalRequest) {
            log::info!("llcp stop requested");
        }
    }

    pub fn step(&mut self, event: Event<'_>) -> Step {
        let mut step = Step::default();
        if self.state == ConnState::None {
            return step;
        }
        match event {
            Event::Transmit => step.send = self.next_pdu(),
            Event::Transmitted => self.on_transmitted(&mut step),
            Event::Received(data) => {
                self.analyze(data, &mut step);
            }
            Event::LinkTimeout => self.on_link_timeout(&mut step),
            Event::TransportFailed(msg) => {
                self.kill(CloseReason::TransportFailure(msg), &mut step)
            }
        }
        step
    }

    /// Decode the PTYPE of one PDU and run its handler.
    ///
    /// AGF sub-PDUs carry a 2-byte length prefix and are analyzed here in
    /// turn; the `Dispatch` returned for the AGF itself covers the whole
    /// frame.
    pub fn analyze(&mut self, data: &[u8], step: &mut Step) -> Dispatch {
        let header = match PduHeader::decode(data) {
            Ok(h) => h,
            Err(_) => {
                self.kill(CloseReason::ProtocolViolation(Violation::MalformedPdu), step);
                return Dispatch::Sdu;
            }
        };
        log::debug!(
            "llcp recv {:?} {} -> {} [{}]",
            header.ptype,
            header.ssap,
            header.dsap,
            HexDump::spaced(data)
        );
        if self.state == ConnState::None {
            return Dispatch::Sdu;
        }
        if self.state.is_tearing_down() && header.ptype != PduType::Dm {
            log::warn!("ignoring {:?} while in {}", header.ptype, self.state);
            return Dispatch::Sdu;
        }

        let info = &data[PDU_HEADER_LEN..];
        let next = Dispatch::Next(data.len());
        match header.ptype {
            PduType::Symm => Dispatch::Next(PDU_HEADER_LEN),
            PduType::Pax => {
                self.negotiate(info, step);
                next
            }
            PduType::Agf => {
                self.analyze_agf(info, step);
                next
            }
            PduType::Ui => {
                step.delivered.push(info.to_vec());
                Dispatch::Sdu
            }
            PduType::Connect => {
                self.on_connect(header, info, step);
                next
            }
            PduType::Disc => {
                self.on_disc(header, step);
                Dispatch::Next(PDU_HEADER_LEN)
            }
            PduType::Cc => {
                self.on_cc(header, info, step);
                next
            }
            PduType::Dm => {
                let reason = info.first().copied().unwrap_or(DM_REASON_DISC_RECEIVED);
                let close = self
                    .pending_close
                    .take()
                    .unwrap_or(CloseReason::PeerDisconnect { reason });
                self.kill(close, step);
                next
            }
            PduType::Frmr => {
                let flags = info.first().copied().unwrap_or(0);
                self.kill(
                    CloseReason::ProtocolViolation(Violation::FrameReject(flags)),
                    step,
                );
                next
            }
            PduType::I => {
                self.on_information(header, info, step);
                Dispatch::Sdu
            }
            PduType::Rr | PduType::Rnr => {
                if self.on_receiver_status(header, info, step) {
                    Dispatch::Next(PDU_SEQUENCE_INFO_POS)
                } else {
                    Dispatch::Sdu
                }
            }
            PduType::Reserved9 | PduType::Reserved10 | PduType::Reserved11 | PduType::Reserved15 => {
                log::warn!("reserved ptype {:#x} skipped", header.ptype as u8);
                Dispatch::Sdu
            }
        }
    }

    fn next_pdu(&mut self) -> Option<Vec<u8>> {
        let pdu = match self.state {
            ConnState::None => return None,
            ConnState::NotConnected if self.reply_cc => {
                self.reply_cc = false;
                self.vs = 0;
                self.vr = 0;
                self.enter(ConnState::Normal);
                pdu::cc(self.remote_sap, self.local_sap, &self.connection_params)
            }
            ConnState::NotConnected | ConnState::WaitDm => pdu::symm(),
            ConnState::Connecting if !self.connect_sent => {
                self.connect_sent = true;
                self.remote_sap = self.service_sap;
                pdu::connect(self.service_sap, self.local_sap, &self.connection_params)
            }
            ConnState::Connecting => pdu::symm(),
            ConnState::Normal if self.send_ready && !self.awaiting_ack && !self.send_buf.is_empty() => {
                let n = self.send_buf.len().min(self.remote.miu).min(MAX_INFO_LEN);
                let chunk: Vec<u8> = self.send_buf.drain(..n).collect();
                let seq = Sequence::new(self.vs, self.vr);
                self.vs = (self.vs + 1) & 0x0f;
                self.awaiting_ack = true;
                if self.send_buf.is_empty() {
                    self.send_ready = false;
                }
                pdu::i(self.remote_sap, self.local_sap, seq, &chunk)
            }
            ConnState::Normal | ConnState::Busy => {
                pdu::rr(self.remote_sap, self.local_sap, self.vr)
            }
            ConnState::Term => pdu::disc(self.disc_addr.0, self.disc_addr.1),
            ConnState::Dm => pdu::dm(self.dm_addr.0, self.dm_addr.1, self.dm_reason),
        };
        log::debug!("llcp send [{}] in {}", HexDump::spaced(&pdu), self.state);
        Some(pdu)
    }

    fn on_transmitted(&mut self, step: &mut Step) {
        match self.state {
            ConnState::Term => {
                let (dsap, ssap) = self.disc_addr;
                if dsap.is_link_management() && ssap.is_link_management() {
                    let reason = self
                        .pending_close
                        .take()
                        .unwrap_or(CloseReason::LocalRequest);
                    self.kill(reason, step);
                } else {
                    self.enter(ConnState::WaitDm);
                }
            }
            ConnState::Dm => {
                let reason = self
                    .pending_close
                    .take()
                    .unwrap_or(CloseReason::PeerDisconnect {
                        reason: self.dm_reason,
                    });
                self.kill(reason, step);
            }
            _ => {}
        }
    }

    fn on_link_timeout(&mut self, step: &mut Step) {
        if self.state.is_tearing_down() {
            self.kill(CloseReason::LinkTimeout, step);
            return;
        }
        log::warn!(
            "no reply within {} ms in {}",
            self.remote.lto_ms,
            self.state
        );
        self.begin_teardown(CloseReason::LinkTimeout);
    }

    fn begin_teardown(&mut self, reason: CloseReason) -> bool {
        let lm = Sap::LINK_MANAGEMENT;
        self.disc_addr = match self.state {
            ConnState::None | ConnState::Term | ConnState::WaitDm | ConnState::Dm => return false,
            ConnState::Normal | ConnState::Busy => (self.remote_sap, self.local_sap),
            ConnState::Connecting if self.connect_sent => (self.remote_sap, self.local_sap),
            ConnState::NotConnected | ConnState::Connecting => (lm, lm),
        };
        self.pending_close = Some(reason);
        self.send_ready = false;
        self.enter(ConnState::Term);
        true
    }

    fn on_connect(&mut self, header: PduHeader, info: &[u8], step: &mut Step) {
        if self.state != ConnState::NotConnected || self.reply_cc {
            log::warn!("CONNECT from {} ignored in {}", header.ssap, self.state);
            return;
        }
        if !self.negotiate(info, step) {
            return;
        }
        self.local_sap = header.dsap;
        self.remote_sap = header.ssap;
        self.reply_cc = true;
        log::debug!("connect request {} -> {}", header.ssap, header.dsap);
    }

    fn on_disc(&mut self, header: PduHeader, step: &mut Step) {
        if header.is_link_level() {
            self.kill(
                CloseReason::PeerDisconnect {
                    reason: DM_REASON_DISC_RECEIVED,
                },
                step,
            );
            return;
        }
        self.dm_addr = (header.ssap, header.dsap);
        self.dm_reason = DM_REASON_DISC_RECEIVED;
        self.send_ready = false;
        self.enter(ConnState::Dm);
    }

    fn on_cc(&mut self, header: PduHeader, info: &[u8], step: &mut Step) {
        if self.state != ConnState::Connecting || !self.connect_sent {
            log::warn!("CC from {} ignored in {}", header.ssap, self.state);
            return;
        }
        if !self.negotiate(info, step) {
            return;
        }
        self.remote_sap = header.ssap;
        self.vs = 0;
        self.vr = 0;
        self.enter(ConnState::Normal);
    }

    fn on_information(&mut self, header: PduHeader, info: &[u8], step: &mut Step) {
        if !self.is_connection(header) {
            log::warn!("I from {} outside the connection ignored", header.ssap);
            return;
        }
        let (seq, payload) = match info.split_first() {
            Some((&b, rest)) => (Sequence::from_byte(b), rest),
            None => {
                self.kill(CloseReason::ProtocolViolation(Violation::MalformedPdu), step);
                return;
            }
        };
        if seq.ns != self.vr {
            log::warn!("N(S)={} where V(R)={}, resyncing", seq.ns, self.vr);
        }
        self.vr = (seq.ns + 1) & 0x0f;
        self.acknowledge(seq.nr);
        step.delivered.push(payload.to_vec());
    }

    fn on_receiver_status(&mut self, header: PduHeader, info: &[u8], step: &mut Step) -> bool {
        let nr = match info.first() {
            Some(&b) => b & 0x0f,
            None => {
                self.kill(CloseReason::ProtocolViolation(Violation::MalformedPdu), step);
                return false;
            }
        };
        if !self.is_connection(header) {
            log::warn!("{:?} from {} outside the connection ignored", header.ptype, header.ssap);
            return true;
        }
        self.acknowledge(nr);
        match (header.ptype, self.state) {
            (PduType::Rr, ConnState::Busy) => self.enter(ConnState::Normal),
            (PduType::Rnr, ConnState::Normal) => self.enter(ConnState::Busy),
            _ => {}
        }
        true
    }

    fn acknowledge(&mut self, nr: u8) {
        if !self.awaiting_ack {
            return;
        }
        if nr == self.vs {
            self.awaiting_ack = false;
        } else {
            log::debug!("N(R)={} does not ack V(S)={}", nr, self.vs);
        }
    }

    fn analyze_agf(&mut self, info: &[u8], step: &mut Step) {
        let mut pos = 0;
        while pos < info.len() && self.state != ConnState::None {
            let len = match info.get(pos..pos + 2) {
                Some(b) => u16::from_be_bytes([b[0], b[1]]) as usize,
                None => {
                    self.kill(CloseReason::ProtocolViolation(Violation::MalformedPdu), step);
                    return;
                }
            };
            let start = pos + 2;
            let sub = match info.get(start..start + len) {
                Some(s) => s,
                None => {
                    self.kill(CloseReason::ProtocolViolation(Violation::MalformedPdu), step);
                    return;
                }
            };
            if matches!(PduHeader::decode(sub), Ok(h) if h.ptype == PduType::Agf) {
                self.kill(CloseReason::ProtocolViolation(Violation::MalformedPdu), step);
                return;
            }
            self.analyze(sub, step);
            pos = start + len;
        }
    }

    /// Apply a received parameter list; kills the link and returns false
    /// when it is malformed or breaks policy.
    fn negotiate(&mut self, list: &[u8], step: &mut Step) -> bool {
        match self.remote.apply(list) {
            Ok(_) => true,
            Err(Error::Violation(v)) => {
                self.kill(CloseReason::ProtocolViolation(v), step);
                false
            }
            Err(e) => {
                log::warn!("bad parameter list: {}", e);
                self.kill(CloseReason::ProtocolViolation(Violation::MalformedPdu), step);
                false
            }
        }
    }

    fn kill(&mut self, reason: CloseReason, step: &mut Step) {
        if self.state == ConnState::None {
            return;
        }
        match reason {
            CloseReason::LocalRequest | CloseReason::PeerDisconnect { .. } => {
                log::info!("llcp link closed: {}", reason)
            }
            _ => log::error!("llcp link killed: {}", reason),
        }
        self.enter(ConnState::None);
        self.send_buf.clear();
        self.send_ready = false;
        self.pending_close = None;
        self.close_reason = Some(reason.clone());
        step.close = Some(reason);
    }

    fn is_connection(&self, header: PduHeader) -> bool {
        matches!(self.state, ConnState::Normal | ConnState::Busy)
            && header.dsap == self.local_sap
            && header.ssap == self.remote_sap
    }

    fn accepts_data(&self) -> bool {
        matches!(
            self.state,
            ConnState::NotConnected | ConnState::Connecting | ConnState::Normal | ConnState::Busy
        )
    }

    fn enter(&mut self, next: ConnState) {
        if self.state != next {
            log::debug!("llcp state {} -> {}", self.state, next);
            self.state = next;
        }
    }
}

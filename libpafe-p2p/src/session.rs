// libpafe-p2p/src/session.rs
//! Application facade over DEP activation and the LLCP link.
//!
//! One `poll()` is one radio turn. The initiator sends a PDU and gets the
//! target's answer from the same InDataExchange. The target alternates:
//! one call blocks in TgGetData, the next answers with TgSetData.

use crate::config::{LlcpConfig, ReceiveCallback, SessionBuilder};
use crate::constants::REG_106K_DEFAULT;
use crate::constants::llcp::DEFAULT_LTO_MS;
use crate::dep::{self, Activation};
use crate::llcp::{CloseReason, ConnState, Event, Link};
use crate::pcd::Pcd;
use crate::types::{BaudRate, DepMode, Role};
use crate::utils::{Clock, LinkTimer};
use crate::{Error, Result};

pub struct LlcpSession<P: Pcd> {
    pcd: P,
    config: LlcpConfig,
    clock: Box<dyn Clock>,
    on_receive: Option<ReceiveCallback>,
    dep_mode: Option<DepMode>,
    role: Option<Role>,
    link: Option<Link>,
    sending: bool,
    timer: LinkTimer,
    close_reason: Option<CloseReason>,
}

impl<P: Pcd> LlcpSession<P> {
    pub(crate) fn new(
        pcd: P,
        config: LlcpConfig,
        clock: Box<dyn Clock>,
        on_receive: Option<ReceiveCallback>,
    ) -> Self {
        Self {
            pcd,
            config,
            clock,
            on_receive,
            dep_mode: None,
            role: None,
            link: None,
            sending: false,
            timer: LinkTimer::new(),
            close_reason: None,
        }
    }

    pub fn builder(pcd: P) -> SessionBuilder<P> {
        SessionBuilder::new(pcd)
    }

    /// Activate as initiator in `mode`. On failure the session stays
    /// inactive and the chip is reset.
    pub fn start_as_initiator(&mut self, mode: DepMode) -> Result<()> {
        self.ensure_idle()?;
        match dep::start_as_initiator(&mut self.pcd, &self.config, mode) {
            Ok(activation) => {
                self.activate(activation);
                self.sending = true;
                Ok(())
            }
            Err(e) => {
                log::error!("initiator activation failed: {}", e);
                self.reset_chip();
                Err(e)
            }
        }
    }

    /// Wait for an initiator and activate as target. `Ok(false)` means the
    /// initiator released the link before activation.
    pub fn start_as_target(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        match dep::start_as_target(&mut self.pcd, &self.config) {
            Ok(Some(activation)) => {
                self.activate(activation);
                self.sending = false;
                let lto = self.link_timeout_ms();
                self.timer.start(self.clock.as_ref(), lto);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                log::error!("target activation failed: {}", e);
                self.reset_chip();
                Err(e)
            }
        }
    }

    /// Queue `data` and connect to the configured service.
    pub fn set_send_data(&mut self, data: &[u8]) -> Result<()> {
        self.link_mut()?.set_send_data(data)
    }

    /// Append to the send buffer; nothing is sent until `send_request`.
    pub fn add_send_data(&mut self, data: &[u8]) -> Result<()> {
        self.link_mut()?.add_send_data(data)
    }

    /// Append `data` and mark the buffer ready to send.
    pub fn send_request(&mut self, data: &[u8]) -> Result<()> {
        let link = self.link_mut()?;
        link.add_send_data(data)?;
        link.send_request()
    }

    /// Request a graceful teardown. The DISC goes out on a later `poll()`.
    pub fn stop_request(&mut self) -> bool {
        if let Some(link) = self.link.as_mut() {
            link.stop_request();
        }
        true
    }

    /// Drive one turn. Returns false once the link is gone.
    pub fn poll(&mut self) -> bool {
        match (self.role, self.link.is_some()) {
            (Some(Role::Initiator), true) => self.poll_initiator(),
            (Some(Role::Target), true) => self.poll_target(),
            _ => return false,
        }
        self.is_active()
    }

    fn poll_initiator(&mut self) {
        let pdu = match self.drive(Event::Transmit) {
            Some(pdu) => pdu,
            None => return,
        };
        let lto = self.link_timeout_ms();
        self.timer.start(self.clock.as_ref(), lto);
        let result = self.pcd.in_data_exchange(&pdu);
        let expired = self.timer.is_expired(self.clock.as_ref());
        self.timer.stop();

        match result {
            Ok(reply) => {
                self.drive(Event::Transmitted);
                if expired {
                    self.drive(Event::LinkTimeout);
                } else {
                    self.drive(Event::Received(&reply));
                }
            }
            Err(Error::Timeout) => {
                self.drive(Event::LinkTimeout);
            }
            Err(e) => {
                log::error!("InDataExchange failed: {}", e);
                self.drive(Event::TransportFailed(e.to_string()));
            }
        }
    }

    fn poll_target(&mut self) {
        if self.sending {
            if let Some(pdu) = self.drive(Event::Transmit) {
                match self.pcd.tg_set_data(&pdu) {
                    Ok(()) => {
                        self.drive(Event::Transmitted);
                        if self.link.is_some() {
                            let lto = self.link_timeout_ms();
                            self.timer.start(self.clock.as_ref(), lto);
                        }
                    }
                    Err(e) => {
                        log::error!("TgSetData failed: {}", e);
                        self.drive(Event::TransportFailed(e.to_string()));
                    }
                }
            }
            self.sending = false;
        } else {
            let result = self.pcd.tg_get_data();
            let expired = self.timer.is_expired(self.clock.as_ref());
            self.timer.stop();
            match result {
                Ok(_) if expired => {
                    self.drive(Event::LinkTimeout);
                }
                Ok(data) => {
                    self.drive(Event::Received(&data));
                }
                Err(Error::Timeout) => {
                    self.drive(Event::LinkTimeout);
                }
                Err(e) => {
                    log::error!("TgGetData failed: {}", e);
                    self.drive(Event::TransportFailed(e.to_string()));
                }
            }
            self.sending = self.link.is_some();
        }
    }

    /// Step the link, deliver payloads and close on request. Returns the
    /// PDU to transmit, if any.
    fn drive(&mut self, event: Event<'_>) -> Option<Vec<u8>> {
        let step = self.link.as_mut()?.step(event);
        if !step.delivered.is_empty() {
            match self.on_receive.as_mut() {
                Some(callback) => {
                    for payload in &step.delivered {
                        callback(payload);
                    }
                }
                None => log::debug!("{} payload(s) dropped, no receive callback", step.delivered.len()),
            }
        }
        if let Some(reason) = step.close {
            self.close(reason);
            return None;
        }
        step.send
    }

    fn activate(&mut self, activation: Activation) {
        self.dep_mode = Some(activation.mode);
        self.role = Some(activation.role);
        self.link = Some(Link::new(&self.config, activation.remote));
        self.close_reason = None;
        self.timer.stop();
    }

    /// Release the DEP link, restore the chip and drop all link state.
    fn close(&mut self, reason: CloseReason) {
        log::info!("closing {:?} session: {}", self.role, reason);
        match self.role {
            Some(Role::Initiator) if !matches!(reason, CloseReason::TransportFailure(_)) => {
                if let Err(e) = self.pcd.in_release() {
                    log::warn!("InRelease failed: {}", e);
                }
            }
            Some(Role::Target)
                if self.dep_mode.map(|m| m.baud_rate()) == Some(BaudRate::Br106k) =>
            {
                if let Err(e) = self.pcd.write_register(&REG_106K_DEFAULT) {
                    log::warn!("restoring 106k registers failed: {}", e);
                }
            }
            _ => {}
        }
        self.reset_chip();
        self.link = None;
        self.dep_mode = None;
        self.role = None;
        self.sending = false;
        self.timer.stop();
        self.close_reason = Some(reason);
    }

    fn reset_chip(&mut self) {
        if let Err(e) = self.pcd.reset() {
            log::warn!("chip reset failed: {}", e);
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.link.is_some() {
            return Err(Error::InvalidState("session already started"));
        }
        Ok(())
    }

    fn link_mut(&mut self) -> Result<&mut Link> {
        self.link
            .as_mut()
            .ok_or(Error::InvalidState("llcp link is not active"))
    }

    pub fn dep_mode(&self) -> Option<DepMode> {
        self.dep_mode
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Negotiated link timeout; the default until a peer LTO is known.
    pub fn link_timeout_ms(&self) -> u16 {
        self.link
            .as_ref()
            .map_or(DEFAULT_LTO_MS, |l| l.link_timeout_ms())
    }

    pub fn state(&self) -> ConnState {
        self.link.as_ref().map_or(ConnState::None, |l| l.state())
    }

    pub fn is_active(&self) -> bool {
        self.link.is_some()
    }

    /// True when the next target `poll()` sends.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Why the last link closed.
    pub fn close_reason(&self) -> Option<&CloseReason> {
        self.close_reason.as_ref()
    }

    pub fn config(&self) -> &LlcpConfig {
        &self.config
    }

    pub fn pcd(&self) -> &P {
        &self.pcd
    }

    pub fn pcd_mut(&mut self) -> &mut P {
        &mut self.pcd
    }

    pub fn into_pcd(self) -> P {
        self.pcd
    }
}

//! Test support helpers intended for use by unit and integration tests.
//!
//! `ScriptedPcd` stands in for the reader so DEP activation and the LLCP
//! session can be exercised without hardware; the frame helpers seed a
//! `MockTransport` for `Device` tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::constants::dep::{ATR_REQ, CMD0_REQ, PP_LLCP};
use crate::constants::{ACK_FRAME, CMD_PREFIX_DEVICE, GGS_TXMODE_DEP, cmd};
use crate::dep::atr::encode_general_bytes;
use crate::llcp::param::Param;
use crate::pcd::Pcd;
use crate::protocol::{Frame, GeneralStatus, TargetActivation};
use crate::types::{ActPass, BaudRate, NfcId3};
use crate::utils::Clock;
use crate::{Error, Result};

/// Initialize `env_logger` once; later calls are ignored.
#[cfg(test)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// ACK followed by the response frame `D5 <cmd+1> body`.
#[doc(hidden)]
pub fn chip_reply(command: u8, body: &[u8]) -> Vec<Vec<u8>> {
    let mut payload = vec![CMD_PREFIX_DEVICE, command.wrapping_add(1)];
    payload.extend_from_slice(body);
    let frame = Frame::encode(&payload).unwrap_or_default();
    vec![ACK_FRAME.to_vec(), frame]
}

/// Replies consumed by `Device::initialize`: two RFConfiguration, Reset
/// and RF off.
#[doc(hidden)]
pub fn init_replies() -> Vec<Vec<u8>> {
    let mut replies = Vec::new();
    replies.extend(chip_reply(cmd::RF_CONFIGURATION, &[]));
    replies.extend(chip_reply(cmd::RF_CONFIGURATION, &[]));
    replies.extend(chip_reply(cmd::RESET, &[]));
    replies.extend(chip_reply(cmd::RF_CONFIGURATION, &[]));
    replies
}

/// Valid general bytes: VERSION 1.0 and WKS with link management + SNEP.
#[doc(hidden)]
pub fn peer_general_bytes() -> Vec<u8> {
    encode_general_bytes(&[Param::Version { major: 1, minor: 0 }, Param::Wks(0x0011)])
}

/// ATR_RES fields as returned by InJumpForDEP, carrying `general_bytes`.
#[doc(hidden)]
pub fn atr_res_with(general_bytes: &[u8]) -> Vec<u8> {
    let mut atr = vec![0x01];
    atr.extend_from_slice(NfcId3::default().as_bytes());
    // DIDt BSt BRt TO PPt
    atr.extend_from_slice(&[0x00, 0x00, 0x00, 0x0E, PP_LLCP]);
    atr.extend_from_slice(general_bytes);
    atr
}

/// ATR_REQ as delivered by TgInitAsTarget, carrying `general_bytes`.
#[doc(hidden)]
pub fn atr_req_with(general_bytes: &[u8]) -> Vec<u8> {
    let mut atr = vec![0x00, CMD0_REQ, ATR_REQ];
    atr.extend_from_slice(NfcId3::from_id2([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]).as_bytes());
    // DIDi BSi BRi PPi
    atr.extend_from_slice(&[0x00, 0x00, 0x00, PP_LLCP]);
    atr.extend_from_slice(general_bytes);
    atr[0] = atr.len() as u8;
    atr
}

/// Clock advanced by hand; clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Scripted answer to InDataExchange or TgGetData.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Data(Vec<u8>),
    /// Data that arrives `after_ms` later on the scripted clock
    Late { after_ms: u64, data: Vec<u8> },
    /// RF timeout reported by the chip
    Timeout,
    /// Broken frame from the transport
    Broken,
}

/// Every call a `ScriptedPcd` received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InJumpForDep {
        act_pass: ActPass,
        baud_rate: BaudRate,
        general_bytes: Vec<u8>,
    },
    InDataExchange(Vec<u8>),
    InRelease,
    TgInitAsTarget,
    TgResponseToInitiator(Vec<u8>),
    TgGetData,
    TgSetData(Vec<u8>),
    TgSetGeneralBytes(Vec<u8>),
    GetGeneralStatus,
    SetParameters(u8),
    WriteRegister(Vec<(u16, u8)>),
    Reset,
    RfOff,
}

/// `Pcd` replaying canned answers. Unscripted exchanges time out.
#[derive(Debug)]
pub struct ScriptedPcd {
    pub calls: Vec<Call>,
    pub replies: VecDeque<Reply>,
    pub atr_res: Option<Vec<u8>>,
    pub activation: Option<TargetActivation>,
    pub tx_mode: u8,
    pub clock: Option<ManualClock>,
}

impl Default for ScriptedPcd {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            replies: VecDeque::new(),
            atr_res: None,
            activation: None,
            tx_mode: GGS_TXMODE_DEP,
            clock: None,
        }
    }
}

impl ScriptedPcd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_atr_res(mut self, atr_res: Vec<u8>) -> Self {
        self.atr_res = Some(atr_res);
        self
    }

    pub fn with_activation(mut self, mode: u8, initiator_command: Vec<u8>) -> Self {
        self.activation = Some(TargetActivation {
            mode,
            initiator_command,
        });
        self
    }

    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn push_reply(&mut self, reply: Reply) {
        self.replies.push_back(reply);
    }

    pub fn push_data(&mut self, data: Vec<u8>) {
        self.replies.push_back(Reply::Data(data));
    }

    /// Payloads handed to InDataExchange and TgSetData.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::InDataExchange(d) | Call::TgSetData(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    fn next_reply(&mut self) -> Result<Vec<u8>> {
        match self.replies.pop_front() {
            Some(Reply::Data(d)) => Ok(d),
            Some(Reply::Late { after_ms, data }) => {
                if let Some(clock) = &self.clock {
                    clock.advance(after_ms);
                }
                Ok(data)
            }
            Some(Reply::Broken) => Err(Error::FrameFormat("scripted broken frame".into())),
            Some(Reply::Timeout) | None => Err(Error::Timeout),
        }
    }
}

impl Pcd for ScriptedPcd {
    fn in_jump_for_dep(
        &mut self,
        act_pass: ActPass,
        baud_rate: BaudRate,
        _nfcid3: Option<&NfcId3>,
        general_bytes: &[u8],
    ) -> Result<Vec<u8>> {
        self.calls.push(Call::InJumpForDep {
            act_pass,
            baud_rate,
            general_bytes: general_bytes.to_vec(),
        });
        self.atr_res.clone().ok_or(Error::Timeout)
    }

    fn in_data_exchange(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.calls.push(Call::InDataExchange(data.to_vec()));
        self.next_reply()
    }

    fn in_release(&mut self) -> Result<()> {
        self.calls.push(Call::InRelease);
        Ok(())
    }

    fn tg_init_as_target(&mut self, _nfcid3: &NfcId3, _general_bytes: &[u8]) -> Result<TargetActivation> {
        self.calls.push(Call::TgInitAsTarget);
        self.activation.clone().ok_or(Error::Timeout)
    }

    fn tg_response_to_initiator(&mut self, data: &[u8]) -> Result<()> {
        self.calls.push(Call::TgResponseToInitiator(data.to_vec()));
        Ok(())
    }

    fn tg_get_data(&mut self) -> Result<Vec<u8>> {
        self.calls.push(Call::TgGetData);
        self.next_reply()
    }

    fn tg_set_data(&mut self, data: &[u8]) -> Result<()> {
        self.calls.push(Call::TgSetData(data.to_vec()));
        Ok(())
    }

    fn tg_set_general_bytes(&mut self, general_bytes: &[u8]) -> Result<()> {
        self.calls.push(Call::TgSetGeneralBytes(general_bytes.to_vec()));
        Ok(())
    }

    fn get_general_status(&mut self) -> Result<GeneralStatus> {
        self.calls.push(Call::GetGeneralStatus);
        let raw = vec![0x00, 0x01, 0x00, 0x00, self.tx_mode];
        Ok(GeneralStatus {
            err: raw[0],
            field: raw[1],
            tx_mode: self.tx_mode,
            raw,
        })
    }

    fn set_parameters(&mut self, flags: u8) -> Result<()> {
        self.calls.push(Call::SetParameters(flags));
        Ok(())
    }

    fn write_register(&mut self, registers: &[(u16, u8)]) -> Result<()> {
        self.calls.push(Call::WriteRegister(registers.to_vec()));
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.calls.push(Call::Reset);
        Ok(())
    }

    fn rf_off(&mut self) -> Result<()> {
        self.calls.push(Call::RfOff);
        Ok(())
    }
}

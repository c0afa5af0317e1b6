// libpafe-p2p/src/pcd/mod.rs
//! Reader command layer consumed by DEP activation and the LLCP session.
//!
//! Every method is one blocking command/response exchange with the chip.
//! `Device<Initialized>` is the hardware implementation;
//! `test_support::ScriptedPcd` replays canned answers for tests.

use crate::Result;
use crate::protocol::{GeneralStatus, TargetActivation};
use crate::types::{ActPass, BaudRate, NfcId3};

pub trait Pcd {
    /// InJumpForDEP. Returns the ATR_RES fields after the status byte
    /// (Tg, NFCID3t, DIDt, BSt, BRt, TO, PPt, Gt).
    fn in_jump_for_dep(
        &mut self,
        act_pass: ActPass,
        baud_rate: BaudRate,
        nfcid3: Option<&NfcId3>,
        general_bytes: &[u8],
    ) -> Result<Vec<u8>>;

    /// InDataExchange: send one DEP payload and return the target's answer.
    fn in_data_exchange(&mut self, data: &[u8]) -> Result<Vec<u8>>;

    /// InRelease: release the target (RLS_REQ/RLS_RES).
    fn in_release(&mut self) -> Result<()>;

    /// TgInitAsTarget: wait for an initiator and return the activation mode
    /// and the initiator's first frame.
    fn tg_init_as_target(&mut self, nfcid3: &NfcId3, general_bytes: &[u8]) -> Result<TargetActivation>;

    /// TgResponseToInitiator: answer the initiator's first frame directly.
    fn tg_response_to_initiator(&mut self, data: &[u8]) -> Result<()>;

    /// TgGetData: block until the initiator sends a DEP payload.
    fn tg_get_data(&mut self) -> Result<Vec<u8>>;

    /// TgSetData: answer the last DEP payload.
    fn tg_set_data(&mut self, data: &[u8]) -> Result<()>;

    /// TgSetGeneralBytes: commit the general bytes of our ATR_RES.
    fn tg_set_general_bytes(&mut self, general_bytes: &[u8]) -> Result<()>;

    fn get_general_status(&mut self) -> Result<GeneralStatus>;

    fn set_parameters(&mut self, flags: u8) -> Result<()>;

    fn write_register(&mut self, registers: &[(u16, u8)]) -> Result<()>;

    /// Soft reset of the chip.
    fn reset(&mut self) -> Result<()>;

    /// Switch the RF field off.
    fn rf_off(&mut self) -> Result<()>;
}

impl<P: Pcd + ?Sized> Pcd for Box<P> {
    fn in_jump_for_dep(
        &mut self,
        act_pass: ActPass,
        baud_rate: BaudRate,
        nfcid3: Option<&NfcId3>,
        general_bytes: &[u8],
    ) -> Result<Vec<u8>> {
        (**self).in_jump_for_dep(act_pass, baud_rate, nfcid3, general_bytes)
    }
    fn in_data_exchange(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        (**self).in_data_exchange(data)
    }
    fn in_release(&mut self) -> Result<()> {
        (**self).in_release()
    }
    fn tg_init_as_target(&mut self, nfcid3: &NfcId3, general_bytes: &[u8]) -> Result<TargetActivation> {
        (**self).tg_init_as_target(nfcid3, general_bytes)
    }
    fn tg_response_to_initiator(&mut self, data: &[u8]) -> Result<()> {
        (**self).tg_response_to_initiator(data)
    }
    fn tg_get_data(&mut self) -> Result<Vec<u8>> {
        (**self).tg_get_data()
    }
    fn tg_set_data(&mut self, data: &[u8]) -> Result<()> {
        (**self).tg_set_data(data)
    }
    fn tg_set_general_bytes(&mut self, general_bytes: &[u8]) -> Result<()> {
        (**self).tg_set_general_bytes(general_bytes)
    }
    fn get_general_status(&mut self) -> Result<GeneralStatus> {
        (**self).get_general_status()
    }
    fn set_parameters(&mut self, flags: u8) -> Result<()> {
        (**self).set_parameters(flags)
    }
    fn write_register(&mut self, registers: &[(u16, u8)]) -> Result<()> {
        (**self).write_register(registers)
    }
    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
    fn rf_off(&mut self) -> Result<()> {
        (**self).rf_off()
    }
}

// libpafe-p2p/src/protocol/commands/mod.rs

pub mod initiator;
pub mod system;
pub mod target;

pub use initiator::{TARGET_NUMBER, encode_in_data_exchange, encode_in_jump_for_dep, encode_in_release};
pub use system::{
    encode_get_general_status, encode_reset, encode_rf_configuration, encode_set_parameters,
    encode_write_register,
};
pub use target::{
    encode_tg_get_data, encode_tg_init_as_target, encode_tg_response_to_initiator,
    encode_tg_set_data, encode_tg_set_general_bytes,
};

use crate::constants::cmd;
use crate::types::{ActPass, BaudRate, NfcId3};

/// RC-S956 chip commands used by the DEP and LLCP layers. New commands
/// should be added here and their encoder placed in
/// `protocol::commands::<group>.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Reset,
    SetParameters {
        flags: u8,
    },
    RfConfiguration {
        item: u8,
        data: Vec<u8>,
    },
    WriteRegister {
        registers: Vec<(u16, u8)>,
    },
    GetGeneralStatus,
    InJumpForDep {
        act_pass: ActPass,
        baud_rate: BaudRate,
        nfcid3: Option<NfcId3>,
        general_bytes: Vec<u8>,
    },
    InDataExchange {
        data: Vec<u8>,
    },
    InRelease,
    TgInitAsTarget {
        nfcid3: NfcId3,
        system_code: u16,
        general_bytes: Vec<u8>,
    },
    TgSetGeneralBytes {
        general_bytes: Vec<u8>,
    },
    TgResponseToInitiator {
        data: Vec<u8>,
    },
    TgGetData,
    TgSetData {
        data: Vec<u8>,
    },
}

impl Command {
    /// Chip command code; the response carries `code + 1`.
    pub fn command_code(&self) -> u8 {
        match self {
            Self::Reset => cmd::RESET,
            Self::SetParameters { .. } => cmd::SET_PARAMETERS,
            Self::RfConfiguration { .. } => cmd::RF_CONFIGURATION,
            Self::WriteRegister { .. } => cmd::WRITE_REGISTER,
            Self::GetGeneralStatus => cmd::GET_GENERAL_STATUS,
            Self::InJumpForDep { .. } => cmd::IN_JUMP_FOR_DEP,
            Self::InDataExchange { .. } => cmd::IN_DATA_EXCHANGE,
            Self::InRelease => cmd::IN_RELEASE,
            Self::TgInitAsTarget { .. } => cmd::TG_INIT_AS_TARGET,
            Self::TgSetGeneralBytes { .. } => cmd::TG_SET_GENERAL_BYTES,
            Self::TgResponseToInitiator { .. } => cmd::TG_RESPONSE_TO_INITIATOR,
            Self::TgGetData => cmd::TG_GET_DATA,
            Self::TgSetData { .. } => cmd::TG_SET_DATA,
        }
    }

    /// Encode the command into the frame payload (TFI + code + params).
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Reset => encode_reset(),
            Self::SetParameters { flags } => encode_set_parameters(*flags),
            Self::RfConfiguration { item, data } => encode_rf_configuration(*item, data),
            Self::WriteRegister { registers } => encode_write_register(registers),
            Self::GetGeneralStatus => encode_get_general_status(),
            Self::InJumpForDep {
                act_pass,
                baud_rate,
                nfcid3,
                general_bytes,
            } => encode_in_jump_for_dep(*act_pass, *baud_rate, nfcid3.as_ref(), general_bytes),
            Self::InDataExchange { data } => encode_in_data_exchange(TARGET_NUMBER, data),
            Self::InRelease => encode_in_release(TARGET_NUMBER),
            Self::TgInitAsTarget {
                nfcid3,
                system_code,
                general_bytes,
            } => encode_tg_init_as_target(nfcid3, *system_code, general_bytes),
            Self::TgSetGeneralBytes { general_bytes } => encode_tg_set_general_bytes(general_bytes),
            Self::TgResponseToInitiator { data } => encode_tg_response_to_initiator(data),
            Self::TgGetData => encode_tg_get_data(),
            Self::TgSetData { data } => encode_tg_set_data(data),
        }
    }
}

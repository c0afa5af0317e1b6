// libpafe-p2p/src/protocol/responses/mod.rs

pub mod initiator;
pub mod system;
pub mod target;

pub use initiator::{decode_data_exchange, decode_jump_for_dep, decode_status_and_data};
pub use system::{GeneralStatus, decode_completion, decode_general_status};
pub use target::{TargetActivation, decode_tg_get_data, decode_tg_init_as_target};

use crate::constants::cmd;

/// Chip response, dispatched on the command it answers. Per-command
/// decoders live in `protocol::responses::<group>.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Command completed without payload
    Done,
    /// ATR_RES fields returned by InJumpForDEP
    JumpForDep { atr_res: Vec<u8> },
    /// Data returned by InDataExchange or TgGetData
    Data(Vec<u8>),
    TargetActivated(TargetActivation),
    GeneralStatus(GeneralStatus),
}

impl Response {
    /// Decode a response payload (starting with D5) for the given command code.
    pub fn decode(expected_cmd: u8, data: &[u8]) -> crate::Result<Self> {
        crate::protocol::parser::expect_response_header(data, expected_cmd)?;

        match expected_cmd {
            cmd::IN_JUMP_FOR_DEP => Ok(Self::JumpForDep {
                atr_res: decode_jump_for_dep(data)?,
            }),
            cmd::IN_DATA_EXCHANGE => Ok(Self::Data(decode_data_exchange(data)?)),
            cmd::TG_GET_DATA => Ok(Self::Data(decode_tg_get_data(data)?)),
            cmd::TG_INIT_AS_TARGET => Ok(Self::TargetActivated(decode_tg_init_as_target(data)?)),
            cmd::GET_GENERAL_STATUS => Ok(Self::GeneralStatus(decode_general_status(data)?)),
            cmd::IN_RELEASE
            | cmd::TG_SET_DATA
            | cmd::TG_SET_GENERAL_BYTES
            | cmd::TG_RESPONSE_TO_INITIATOR => {
                decode_status_and_data(expected_cmd, data)?;
                Ok(Self::Done)
            }
            cmd::RESET | cmd::SET_PARAMETERS | cmd::RF_CONFIGURATION | cmd::WRITE_REGISTER => {
                decode_completion(expected_cmd, data)?;
                Ok(Self::Done)
            }
            _ => Err(crate::Error::UnexpectedResponse {
                expected: expected_cmd.wrapping_add(1),
                actual: data.get(1).copied().unwrap_or(0),
            }),
        }
    }
}

// libpafe-p2p/src/protocol/responses/target.rs

use crate::constants::cmd;
use crate::protocol::parser;
use crate::Result;

/// Result of TgInitAsTarget: the activation mode byte and the first frame
/// received from the initiator (ATR_REQ for NFC-DEP, starting with LEN).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetActivation {
    pub mode: u8,
    pub initiator_command: Vec<u8>,
}

/// Decode TgInitAsTarget response payload
/// Layout: D5 8D Mode(1) InitiatorCommand(N)
pub fn decode_tg_init_as_target(data: &[u8]) -> Result<TargetActivation> {
    parser::ensure_len(data, 3)?;
    parser::expect_response_header(data, cmd::TG_INIT_AS_TARGET)?;
    Ok(TargetActivation {
        mode: data[2],
        initiator_command: data[3..].to_vec(),
    })
}

/// Decode TgGetData response payload
/// Layout: D5 87 Status(1) DataIn(N)
pub fn decode_tg_get_data(data: &[u8]) -> Result<Vec<u8>> {
    super::initiator::decode_status_and_data(cmd::TG_GET_DATA, data)
}

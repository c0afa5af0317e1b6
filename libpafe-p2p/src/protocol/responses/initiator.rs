// libpafe-p2p/src/protocol/responses/initiator.rs

use crate::constants::cmd;
use crate::protocol::parser;
use crate::Result;

/// Decode InJumpForDEP response payload and return the ATR_RES fields
/// following the status byte.
/// Layout: D5 57 Status(1) Tg(1) NFCID3t(10) DIDt BSt BRt TO PPt [Gt(N)]
pub fn decode_jump_for_dep(data: &[u8]) -> Result<Vec<u8>> {
    decode_status_and_data(cmd::IN_JUMP_FOR_DEP, data)
}

/// Decode InDataExchange response payload
/// Layout: D5 41 Status(1) DataIn(N)
pub fn decode_data_exchange(data: &[u8]) -> Result<Vec<u8>> {
    decode_status_and_data(cmd::IN_DATA_EXCHANGE, data)
}

/// Shared layout `D5 <cmd+1> Status(1) Data(N)`. A non-zero status is
/// mapped by `parser::check_status`.
pub fn decode_status_and_data(command: u8, data: &[u8]) -> Result<Vec<u8>> {
    parser::ensure_len(data, 3)?;
    parser::expect_response_header(data, command)?;
    parser::check_status(command, data[2])?;
    Ok(data[3..].to_vec())
}

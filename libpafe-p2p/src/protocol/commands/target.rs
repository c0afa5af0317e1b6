// libpafe-p2p/src/protocol/commands/target.rs

use crate::constants::{CMD_PREFIX_HOST, cmd};
use crate::types::NfcId3;

/// ISO/IEC 14443-A parameters answered while waiting as a target:
/// SENS_RES(2) NFCID1 tail(3) SEL_RES(1). SEL_RES 0x40 announces NFC-DEP.
const MIFARE_PARAMS: [u8; 6] = [0x00, 0x04, 0x00, 0x00, 0x00, 0x40];

/// Encode TgInitAsTarget (0x8C)
/// Layout: D4 8C Mode(1) MifareParams(6) FeliCaParams(18) NFCID3t(10)
///         LEN_Gt(1) Gt(N) LEN_Tk(1)
///
/// FeliCaParams are IDm(8, the head of NFCID3t) PMm(8, zero) SystemCode(2, BE).
pub fn encode_tg_init_as_target(nfcid3: &NfcId3, system_code: u16, general_bytes: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(3 + 6 + 18 + 10 + 2 + general_bytes.len());
    buf.push(CMD_PREFIX_HOST);
    buf.push(cmd::TG_INIT_AS_TARGET);
    buf.push(0x00);
    buf.extend_from_slice(&MIFARE_PARAMS);
    buf.extend_from_slice(&nfcid3.as_bytes()[..8]);
    buf.extend_from_slice(&[0u8; 8]);
    buf.extend_from_slice(&system_code.to_be_bytes());
    buf.extend_from_slice(nfcid3.as_bytes());
    buf.push(general_bytes.len() as u8);
    buf.extend_from_slice(general_bytes);
    buf.push(0x00);
    buf
}

/// Encode TgSetGeneralBytes (0x92). The chip answers ATR_REQ with these.
pub fn encode_tg_set_general_bytes(general_bytes: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + general_bytes.len());
    buf.push(CMD_PREFIX_HOST);
    buf.push(cmd::TG_SET_GENERAL_BYTES);
    buf.extend_from_slice(general_bytes);
    buf
}

/// Encode TgResponseToInitiator (0x90) carrying a raw DEP frame
pub fn encode_tg_response_to_initiator(data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + data.len());
    buf.push(CMD_PREFIX_HOST);
    buf.push(cmd::TG_RESPONSE_TO_INITIATOR);
    buf.extend_from_slice(data);
    buf
}

/// Encode TgGetData (0x86)
pub fn encode_tg_get_data() -> Vec<u8> {
    vec![CMD_PREFIX_HOST, cmd::TG_GET_DATA]
}

/// Encode TgSetData (0x8E)
pub fn encode_tg_set_data(data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + data.len());
    buf.push(CMD_PREFIX_HOST);
    buf.push(cmd::TG_SET_DATA);
    buf.extend_from_slice(data);
    buf
}

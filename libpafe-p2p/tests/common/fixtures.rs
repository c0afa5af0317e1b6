// fixtures.rs: payloads and frames shared by the integration tests

use libpafe_p2p::dep::atr::encode_general_bytes;
use libpafe_p2p::llcp::Param;
use libpafe_p2p::protocol::Frame;
use libpafe_p2p::test_support::{atr_req_with, atr_res_with};

/// Initiator side general bytes: magic, VERSION 1.1, WKS LM+SNEP, LTO 150ms
pub fn initiator_general_bytes() -> Vec<u8> {
    hex::decode("46666d0101110302001304010f").unwrap()
}

/// Target side general bytes: magic, VERSION 1.0, WKS LM+SNEP
pub fn target_general_bytes() -> Vec<u8> {
    encode_general_bytes(&[Param::Version { major: 1, minor: 0 }, Param::Wks(0x0011)])
}

/// InJumpForDEP response body: status + ATR_RES
pub fn jump_for_dep_body() -> Vec<u8> {
    let mut body = vec![0x00];
    body.extend(atr_res_with(&target_general_bytes()));
    body
}

/// TgInitAsTarget response body for `mode`: mode byte + ATR_REQ
pub fn init_as_target_body(mode: u8) -> Vec<u8> {
    let mut body = vec![mode];
    body.extend(atr_req_with(&initiator_general_bytes()));
    body
}

/// Status byte followed by `data`, as returned by the data commands
pub fn ok_with(data: &[u8]) -> Vec<u8> {
    let mut body = vec![0x00];
    body.extend_from_slice(data);
    body
}

/// InDataExchange answer carrying a SYMM PDU
pub fn symm_exchange_frame() -> Vec<u8> {
    Frame::encode(&[0xD5, 0x41, 0x00, 0x00, 0x00]).unwrap()
}

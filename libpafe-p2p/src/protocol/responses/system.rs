// libpafe-p2p/src/protocol/responses/system.rs

use crate::constants::{GGS_TXMODE, GGS_TXMODE_DEP, cmd};
use crate::protocol::parser;
use crate::Result;

/// Payload of GetGeneralStatus following the response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralStatus {
    /// Last error code reported by the chip
    pub err: u8,
    /// External RF field present
    pub field: u8,
    /// Transmission mode (0x03 = NFC-DEP)
    pub tx_mode: u8,
    pub raw: Vec<u8>,
}

impl GeneralStatus {
    pub fn is_dep(&self) -> bool {
        self.tx_mode == GGS_TXMODE_DEP
    }
}

/// Decode GetGeneralStatus response payload
/// Layout: D5 05 Err(1) Field(1) ... TxMode(@4) ...
pub fn decode_general_status(data: &[u8]) -> Result<GeneralStatus> {
    const MIN_LEN: usize = 2 + GGS_TXMODE + 1;
    parser::ensure_len(data, MIN_LEN)?;
    parser::expect_response_header(data, cmd::GET_GENERAL_STATUS)?;

    let body = &data[2..];
    Ok(GeneralStatus {
        err: parser::byte_at(body, 0)?,
        field: parser::byte_at(body, 1)?,
        tx_mode: parser::byte_at(body, GGS_TXMODE)?,
        raw: body.to_vec(),
    })
}

/// Decode the response of a command that only reports completion, with an
/// optional status byte (Reset, SetParameters, RFConfiguration,
/// WriteRegister).
pub fn decode_completion(command: u8, data: &[u8]) -> Result<()> {
    parser::expect_response_header(data, command)?;
    if let Some(&status) = data.get(2) {
        parser::check_status(command, status)?;
    }
    Ok(())
}

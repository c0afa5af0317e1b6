// libpafe-p2p/src/protocol/commands/system.rs

use crate::constants::{CMD_PREFIX_HOST, RFCONFIG_FIELD, cmd};

/// Encode Reset (0x18). The single parameter selects a soft reset.
pub fn encode_reset() -> Vec<u8> {
    vec![CMD_PREFIX_HOST, cmd::RESET, 0x01]
}

/// Encode SetParameters (0x12)
pub fn encode_set_parameters(flags: u8) -> Vec<u8> {
    vec![CMD_PREFIX_HOST, cmd::SET_PARAMETERS, flags]
}

/// Encode RFConfiguration (0x32)
/// Layout: D4 32 item(1) + item data(N)
pub fn encode_rf_configuration(item: u8, data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(3 + data.len());
    buf.push(CMD_PREFIX_HOST);
    buf.push(cmd::RF_CONFIGURATION);
    buf.push(item);
    buf.extend_from_slice(data);
    buf
}

/// RF field off with auto RFCA disabled
pub fn encode_rf_off() -> Vec<u8> {
    encode_rf_configuration(RFCONFIG_FIELD, &[0x00])
}

/// Encode WriteRegister (0x08)
/// Layout: D4 08 (addr_hi addr_lo value) * N
pub fn encode_write_register(registers: &[(u16, u8)]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + registers.len() * 3);
    buf.push(CMD_PREFIX_HOST);
    buf.push(cmd::WRITE_REGISTER);
    for (addr, value) in registers {
        buf.extend_from_slice(&addr.to_be_bytes());
        buf.push(*value);
    }
    buf
}

/// Encode GetGeneralStatus (0x04)
pub fn encode_get_general_status() -> Vec<u8> {
    vec![CMD_PREFIX_HOST, cmd::GET_GENERAL_STATUS]
}

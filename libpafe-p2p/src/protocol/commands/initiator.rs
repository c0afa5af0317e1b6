// libpafe-p2p/src/protocol/commands/initiator.rs

use crate::constants::dep::{PASSIVE_106K_INITIATOR_ID, PASSIVE_FELICA_POLLING};
use crate::constants::{CMD_PREFIX_HOST, cmd};
use crate::types::{ActPass, BaudRate, NfcId3};

/// "Next" flags of InJumpForDEP
const NEXT_PASSIVE_INIT: u8 = 0x01;
const NEXT_NFCID3: u8 = 0x02;
const NEXT_GENERAL_BYTES: u8 = 0x04;

/// Logical number of the single target handled by the chip
pub const TARGET_NUMBER: u8 = 0x01;

/// Encode InJumpForDEP (0x56)
/// Layout: D4 56 ActPass(1) BR(1) Next(1) [PassiveInitiatorData] [NFCID3i(10)] [Gi(N)]
///
/// Passive activation at 106k carries a fixed initiator id; at 212k/424k it
/// carries a FeliCa polling request instead.
pub fn encode_in_jump_for_dep(
    act_pass: ActPass,
    baud_rate: BaudRate,
    nfcid3: Option<&NfcId3>,
    general_bytes: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(5 + 5 + 10 + general_bytes.len());
    buf.push(CMD_PREFIX_HOST);
    buf.push(cmd::IN_JUMP_FOR_DEP);
    buf.push(act_pass as u8);
    buf.push(baud_rate as u8);
    buf.push(0x00);

    let mut next = 0u8;
    if act_pass == ActPass::Passive {
        next |= NEXT_PASSIVE_INIT;
        if baud_rate == BaudRate::Br106k {
            buf.extend_from_slice(&PASSIVE_106K_INITIATOR_ID);
        } else {
            buf.extend_from_slice(&PASSIVE_FELICA_POLLING);
        }
    }
    if let Some(id) = nfcid3 {
        next |= NEXT_NFCID3;
        buf.extend_from_slice(id.as_bytes());
    }
    if !general_bytes.is_empty() {
        next |= NEXT_GENERAL_BYTES;
        buf.extend_from_slice(general_bytes);
    }
    buf[4] = next;
    buf
}

/// Encode InDataExchange (0x40)
/// Layout: D4 40 Tg(1) DataOut(N)
pub fn encode_in_data_exchange(target: u8, data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(3 + data.len());
    buf.push(CMD_PREFIX_HOST);
    buf.push(cmd::IN_DATA_EXCHANGE);
    buf.push(target);
    buf.extend_from_slice(data);
    buf
}

/// Encode InRelease (0x52). The chip sends RLS_REQ on our behalf.
pub fn encode_in_release(target: u8) -> Vec<u8> {
    vec![CMD_PREFIX_HOST, cmd::IN_RELEASE, target]
}

// libpafe-p2p/src/dep/atr.rs
//! General bytes and ATR_REQ/ATR_RES field checks.

use crate::config::LlcpConfig;
use crate::constants::dep::{
    ATR_REQ, ATR_RES_FIELDS_LEN, CMD0_REQ, CMD0_RES, PP_LLCP, RLS_REQ, RLS_RES,
};
use crate::constants::llcp::MAGIC;
use crate::error::{ActivationError, Error};
use crate::llcp::negotiate::LinkParams;
use crate::llcp::param::{Param, encode_list};
use crate::Result;

/// ATR_RES as returned by InJumpForDEP (status byte stripped):
/// Tg NFCID3t(10) DIDt BSt BRt TO PPt Gt
mod res {
    pub const TG: usize = 0;
    pub const DID: usize = 11;
    pub const BS: usize = 12;
    pub const BR: usize = 13;
    pub const PP: usize = 15;
    pub const GT: usize = 16;
}

/// ATR_REQ as delivered by TgInitAsTarget:
/// LEN D4 00 NFCID3i(10) DIDi BSi BRi PPi Gi
mod req {
    pub const CMD0: usize = 1;
    pub const CMD1: usize = 2;
    pub const DID: usize = 13;
    pub const BS: usize = 14;
    pub const BR: usize = 15;
    pub const PP: usize = 16;
    pub const GI: usize = 17;
}

/// Magic number followed by the parameter list.
pub fn encode_general_bytes(params: &[Param]) -> Vec<u8> {
    let mut gb = MAGIC.to_vec();
    gb.extend_from_slice(&encode_list(params));
    gb
}

/// General bytes advertising `config`.
pub fn general_bytes(config: &LlcpConfig) -> Vec<u8> {
    encode_general_bytes(&config.general_params())
}

fn ensure_zero(field: &'static str, value: u8) -> Result<()> {
    if value != 0 {
        return Err(ActivationError::NonZeroField { field, value }.into());
    }
    Ok(())
}

fn check_common(did: u8, bs: u8, br: u8, pp: u8) -> Result<()> {
    ensure_zero("DID", did)?;
    ensure_zero("BS", bs)?;
    ensure_zero("BR", br)?;
    if pp != PP_LLCP {
        return Err(ActivationError::PayloadParameter(pp).into());
    }
    Ok(())
}

/// Strip the magic number and return the parameter list.
fn strip_magic(gb: &[u8]) -> Result<&[u8]> {
    if gb.len() < MAGIC.len() || gb[..MAGIC.len()] != MAGIC {
        return Err(ActivationError::MagicNumber.into());
    }
    Ok(&gb[MAGIC.len()..])
}

/// Validate the fixed ATR_RES fields and return the peer's parameter list.
pub fn validate_atr_res(atr_res: &[u8]) -> Result<&[u8]> {
    let needed = ATR_RES_FIELDS_LEN + MAGIC.len();
    if atr_res.len() < needed {
        return Err(ActivationError::ShortResponse {
            needed,
            actual: atr_res.len(),
        }
        .into());
    }
    if atr_res[res::TG] != 0x01 {
        return Err(ActivationError::TargetCount(atr_res[res::TG]).into());
    }
    check_common(
        atr_res[res::DID],
        atr_res[res::BS],
        atr_res[res::BR],
        atr_res[res::PP],
    )?;
    strip_magic(&atr_res[res::GT..])
}

/// Validate the ATR_REQ fields and return the initiator's parameter list.
pub fn validate_atr_req(atr_req: &[u8]) -> Result<&[u8]> {
    let needed = req::GI + MAGIC.len();
    if atr_req.len() < needed {
        return Err(ActivationError::ShortResponse {
            needed,
            actual: atr_req.len(),
        }
        .into());
    }
    if atr_req[req::CMD0] != CMD0_REQ || atr_req[req::CMD1] != ATR_REQ {
        return Err(ActivationError::CommandCode(atr_req[req::CMD1]).into());
    }
    check_common(
        atr_req[req::DID],
        atr_req[req::BS],
        atr_req[req::BR],
        atr_req[req::PP],
    )?;
    strip_magic(&atr_req[req::GI..])
}

/// True when the initiator's first frame is RLS_REQ.
pub fn is_rls_req(frame: &[u8]) -> bool {
    frame.len() >= 3 && frame[req::CMD0] == CMD0_REQ && frame[req::CMD1] == RLS_REQ
}

/// RLS_RES echoing the DID of `rls_req` (0 when absent).
pub fn rls_res(rls_req: &[u8]) -> Vec<u8> {
    let did = rls_req.get(3).copied().unwrap_or(0);
    vec![0x04, CMD0_RES, RLS_RES, did]
}

/// Run the parameter list through the link policy. VERSION is mandatory.
pub fn apply_general_bytes(list: &[u8]) -> Result<LinkParams> {
    let mut remote = LinkParams::default();
    let saw_version = match remote.apply(list) {
        Ok(v) => v,
        Err(Error::Violation(v)) => return Err(ActivationError::Rejected(v).into()),
        Err(e) => return Err(e),
    };
    if !saw_version {
        return Err(ActivationError::MissingVersion.into());
    }
    Ok(remote)
}

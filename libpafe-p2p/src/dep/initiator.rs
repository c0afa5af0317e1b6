// libpafe-p2p/src/dep/initiator.rs

use crate::config::LlcpConfig;
use crate::dep::Activation;
use crate::dep::atr::{apply_general_bytes, general_bytes, validate_atr_res};
use crate::pcd::Pcd;
use crate::types::{DepMode, Role};
use crate::utils::HexDump;
use crate::Result;

/// Activate as initiator with InJumpForDEP and validate the target's
/// ATR_RES and general bytes.
pub fn start_as_initiator<P: Pcd + ?Sized>(
    pcd: &mut P,
    config: &LlcpConfig,
    mode: DepMode,
) -> Result<Activation> {
    let gb = general_bytes(config);
    log::debug!("InJumpForDEP {} gi=[{}]", mode, HexDump::spaced(&gb));

    let atr_res = pcd.in_jump_for_dep(mode.act_pass(), mode.baud_rate(), Some(&config.nfcid3), &gb)?;
    log::debug!("ATR_RES [{}]", HexDump::spaced(&atr_res));

    let list = validate_atr_res(&atr_res)?;
    let remote = apply_general_bytes(list)?;
    log::info!(
        "dep activated as initiator: {} lto={}ms miu={}",
        mode,
        remote.lto_ms,
        remote.miu
    );
    Ok(Activation {
        mode,
        role: Role::Initiator,
        remote,
    })
}

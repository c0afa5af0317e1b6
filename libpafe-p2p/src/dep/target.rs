// libpafe-p2p/src/dep/target.rs

use crate::config::LlcpConfig;
use crate::constants::{REG_106K_DEFAULT, REG_106K_TARGET, SETPARAM_TARGET};
use crate::dep::Activation;
use crate::dep::atr::{apply_general_bytes, general_bytes, is_rls_req, rls_res, validate_atr_req};
use crate::error::ActivationError;
use crate::pcd::Pcd;
use crate::types::{BaudRate, DepMode, Role};
use crate::utils::HexDump;
use crate::Result;

/// Wait for an initiator and activate as target.
///
/// Automatic ATR_RES stays off so the ATR_REQ general bytes are checked
/// before ours are committed. Returns `Ok(None)` when the initiator
/// released the link with RLS_REQ before activation.
pub fn start_as_target<P: Pcd + ?Sized>(pcd: &mut P, config: &LlcpConfig) -> Result<Option<Activation>> {
    pcd.set_parameters(SETPARAM_TARGET)?;
    pcd.write_register(&REG_106K_TARGET)?;

    let activated = pcd.tg_init_as_target(&config.nfcid3, &[])?;
    let frame = &activated.initiator_command;
    log::debug!(
        "TgInitAsTarget mode={:#04x} [{}]",
        activated.mode,
        HexDump::spaced(frame)
    );

    if is_rls_req(frame) {
        log::info!("initiator released before activation");
        pcd.tg_response_to_initiator(&rls_res(frame))?;
        pcd.write_register(&REG_106K_DEFAULT)?;
        return Ok(None);
    }

    let mode = DepMode::from_target_mode(activated.mode)
        .ok_or(ActivationError::TargetMode(activated.mode))?;
    let list = validate_atr_req(frame)?;
    let remote = apply_general_bytes(list)?;

    if mode.baud_rate() != BaudRate::Br106k {
        pcd.write_register(&REG_106K_DEFAULT)?;
    }

    pcd.tg_set_general_bytes(&general_bytes(config))?;
    let status = pcd.get_general_status()?;
    if !status.is_dep() {
        return Err(ActivationError::TxMode(status.tx_mode).into());
    }

    log::info!("dep activated as target: {} lto={}ms", mode, remote.lto_ms);
    Ok(Some(Activation {
        mode,
        role: Role::Target,
        remote,
    }))
}

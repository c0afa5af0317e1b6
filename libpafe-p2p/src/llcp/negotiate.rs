// libpafe-p2p/src/llcp/negotiate.rs
//! Applies a received parameter list to the remote link parameters.
//!
//! Policy: a remote major version below ours, a WKS bitmap without the link
//! management service, a zero receive window and a class-1-only link service
//! are violations that kill the link. Everything else is accepted.

use crate::constants::llcp::{
    DEFAULT_LTO_MS, DEFAULT_MIU, LTO_UNIT_MS, VERSION_MAJOR, WKS_LINK_MANAGEMENT, WKS_SNEP,
};
use crate::error::Violation;
use crate::llcp::param::{Param, ParamIter};
use crate::Result;

/// Link service class 1: connectionless transport only
const LSC_CLASS_1: u8 = 0x01;

/// What the peer has told us about itself so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkParams {
    pub version: Option<(u8, u8)>,
    /// Link timeout in milliseconds
    pub lto_ms: u16,
    pub miu: usize,
    pub wks: u16,
    pub rw: u8,
    pub lsc: Option<u8>,
    pub service_name: Option<String>,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            version: None,
            lto_ms: DEFAULT_LTO_MS,
            miu: DEFAULT_MIU,
            wks: WKS_LINK_MANAGEMENT,
            rw: 1,
            lsc: None,
            service_name: None,
        }
    }
}

impl LinkParams {
    /// Apply every TLV of `list` in order. Stops at the first malformed TLV
    /// or policy violation. Returns true when the list carried VERSION.
    pub fn apply(&mut self, list: &[u8]) -> Result<bool> {
        let mut saw_version = false;
        for param in ParamIter::new(list) {
            let param = param?;
            if let Param::Version { .. } = param {
                saw_version = true;
            }
            self.apply_one(param)?;
        }
        Ok(saw_version)
    }

    fn apply_one(&mut self, param: Param) -> std::result::Result<(), Violation> {
        match param {
            Param::Version { major, minor } => {
                if major < VERSION_MAJOR {
                    return Err(Violation::VersionTooLow { major, minor });
                }
                if major > VERSION_MAJOR {
                    log::debug!("remote llcp {}.{} is newer, keeping it", major, minor);
                }
                self.version = Some((major, minor));
            }
            Param::Miux(miux) => {
                self.miu = DEFAULT_MIU + miux as usize;
            }
            Param::Wks(wks) => {
                if wks & WKS_LINK_MANAGEMENT == 0 {
                    return Err(Violation::MissingLinkManagement);
                }
                if wks & WKS_SNEP != 0 {
                    log::debug!("remote offers snep");
                }
                self.wks = wks;
            }
            Param::Lto(lto) => {
                self.lto_ms = if lto == 0 {
                    DEFAULT_LTO_MS
                } else {
                    u16::from(lto) * LTO_UNIT_MS
                };
            }
            Param::Rw(rw) => {
                if rw == 0 {
                    return Err(Violation::ZeroReceiveWindow);
                }
                self.rw = rw;
            }
            Param::Sn(name) => {
                let name = String::from_utf8_lossy(&name).into_owned();
                log::debug!("service name {:?}", name);
                self.service_name = Some(name);
            }
            Param::Opt(opt) => {
                let lsc = opt & 0x03;
                if lsc == LSC_CLASS_1 {
                    return Err(Violation::LinkServiceClass);
                }
                self.lsc = Some(lsc);
            }
        }
        Ok(())
    }
}

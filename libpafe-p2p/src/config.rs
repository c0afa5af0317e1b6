// libpafe-p2p/src/config.rs
//! Local link parameters and the session builder.

use crate::constants::llcp::{
    DEFAULT_MIU, MAX_INFO_LEN, SAP_LOCAL_FIRST, SAP_SNEP, VERSION_MAJOR, VERSION_MINOR,
    WKS_LINK_MANAGEMENT, WKS_SNEP,
};
use crate::llcp::param::Param;
use crate::pcd::Pcd;
use crate::session::LlcpSession;
use crate::types::{NfcId3, Sap};
use crate::utils::{Clock, SystemClock};
use crate::{Error, Result};

/// Values this side advertises in the DEP general bytes and in
/// CONNECT/CC PDUs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LlcpConfig {
    pub version_major: u8,
    pub version_minor: u8,
    /// MIU extension; 0 keeps the default MIU of 128 bytes, at most 0x79
    pub miux: u16,
    /// Well-known services bitmap
    pub wks: u16,
    /// Link timeout in 10 ms units
    pub lto: u8,
    /// Receive window
    pub rw: u8,
    /// Link service class (bits 0-1 of OPT)
    pub lsc: u8,
    /// SAP used for our end of the connection
    pub local_sap: u8,
    /// Well-known SAP the connection is opened to
    pub service_sap: u8,
    pub nfcid3: NfcId3,
    /// Capacity of the owned send buffer
    pub max_send_len: usize,
}

impl Default for LlcpConfig {
    fn default() -> Self {
        Self {
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
            miux: 0,
            wks: WKS_LINK_MANAGEMENT | WKS_SNEP,
            lto: 10,
            rw: 1,
            lsc: 0x03,
            local_sap: SAP_LOCAL_FIRST,
            service_sap: SAP_SNEP,
            nfcid3: NfcId3::default(),
            max_send_len: 1024,
        }
    }
}

impl LlcpConfig {
    /// Parameters carried after the magic number in the general bytes.
    pub fn general_params(&self) -> Vec<Param> {
        let mut params = vec![Param::Version {
            major: self.version_major,
            minor: self.version_minor,
        }];
        if self.miux != 0 {
            params.push(Param::Miux(self.miux));
        }
        params.push(Param::Wks(self.wks));
        params.push(Param::Lto(self.lto));
        params.push(Param::Opt(self.lsc & 0x03));
        params
    }

    /// Parameters carried by CONNECT and CC.
    pub fn connection_params(&self) -> Vec<Param> {
        let mut params = vec![Param::Rw(self.rw)];
        if self.miux != 0 {
            params.push(Param::Miux(self.miux));
        }
        params
    }

    pub fn local_sap(&self) -> Sap {
        Sap::new(self.local_sap)
    }

    pub fn service_sap(&self) -> Sap {
        Sap::new(self.service_sap)
    }

    /// Reject values the peer would treat as fatal or that do not fit
    /// their fields.
    pub fn validate(&self) -> Result<()> {
        if self.version_major < VERSION_MAJOR || self.version_major > 0x0f || self.version_minor > 0x0f {
            return Err(Error::InvalidState("version must be 1.x with 4-bit fields"));
        }
        if self.rw == 0 || self.rw > 0x0f {
            return Err(Error::InvalidState("receive window must be 1..=15"));
        }
        if self.wks & WKS_LINK_MANAGEMENT == 0 {
            return Err(Error::InvalidState("wks must include link management"));
        }
        if DEFAULT_MIU + self.miux as usize > MAX_INFO_LEN {
            return Err(Error::InvalidState("miu does not fit a normal chip frame"));
        }
        if self.local_sap < SAP_LOCAL_FIRST || self.local_sap > 0x3f {
            return Err(Error::InvalidState("local sap must be in 0x20..=0x3f"));
        }
        if self.service_sap == 0 || self.service_sap > 0x3f {
            return Err(Error::InvalidState("service sap must be in 0x01..=0x3f"));
        }
        Ok(())
    }
}

/// Receive callback invoked from `poll()` for every UI/I payload.
pub type ReceiveCallback = Box<dyn FnMut(&[u8])>;

/// Helper to construct an `LlcpSession` with optional configuration.
pub struct SessionBuilder<P: Pcd> {
    pcd: P,
    config: LlcpConfig,
    clock: Option<Box<dyn Clock>>,
    on_receive: Option<ReceiveCallback>,
}

impl<P: Pcd> SessionBuilder<P> {
    pub fn new(pcd: P) -> Self {
        Self {
            pcd,
            config: LlcpConfig::default(),
            clock: None,
            on_receive: None,
        }
    }

    pub fn config(mut self, config: LlcpConfig) -> Self {
        self.config = config;
        self
    }

    /// Time source for the link timer; defaults to `SystemClock`.
    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn on_receive<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[u8]) + 'static,
    {
        self.on_receive = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<LlcpSession<P>> {
        self.config.validate()?;
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(SystemClock::new()));
        Ok(LlcpSession::new(self.pcd, self.config, clock, self.on_receive))
    }
}

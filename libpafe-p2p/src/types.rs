// libpafe-p2p/src/types.rs

use crate::Error;
use crate::constants::dep::NFCID3_LEN;
use derive_more::Display;
use std::convert::TryFrom;

/// Active / passive communication mode
#[repr(u8)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActPass {
    #[display(fmt = "passive")]
    Passive = 0x00,
    #[display(fmt = "active")]
    Active = 0x01,
}

/// Bit rate as encoded by InJumpForDEP
#[repr(u8)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaudRate {
    #[display(fmt = "106k")]
    Br106k = 0x00,
    #[display(fmt = "212k")]
    Br212k = 0x01,
    #[display(fmt = "424k")]
    Br424k = 0x02,
}

impl BaudRate {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x00 => Some(Self::Br106k),
            0x01 => Some(Self::Br212k),
            0x02 => Some(Self::Br424k),
            _ => None,
        }
    }
}

/// NFC-DEP mode: bit rate x activation type. A session that has not been
/// activated holds `None` in place of a `DepMode` (DEP_NONE).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DepMode {
    #[display(fmt = "ACT_106K")]
    Act106k,
    #[display(fmt = "PSV_106K")]
    Psv106k,
    #[display(fmt = "ACT_212K")]
    Act212k,
    #[display(fmt = "PSV_212K")]
    Psv212k,
    #[display(fmt = "ACT_424K")]
    Act424k,
    #[display(fmt = "PSV_424K")]
    Psv424k,
}

impl DepMode {
    pub fn new(ap: ActPass, br: BaudRate) -> Self {
        match (ap, br) {
            (ActPass::Active, BaudRate::Br106k) => Self::Act106k,
            (ActPass::Passive, BaudRate::Br106k) => Self::Psv106k,
            (ActPass::Active, BaudRate::Br212k) => Self::Act212k,
            (ActPass::Passive, BaudRate::Br212k) => Self::Psv212k,
            (ActPass::Active, BaudRate::Br424k) => Self::Act424k,
            (ActPass::Passive, BaudRate::Br424k) => Self::Psv424k,
        }
    }

    pub fn act_pass(&self) -> ActPass {
        match self {
            Self::Act106k | Self::Act212k | Self::Act424k => ActPass::Active,
            Self::Psv106k | Self::Psv212k | Self::Psv424k => ActPass::Passive,
        }
    }

    pub fn baud_rate(&self) -> BaudRate {
        match self {
            Self::Act106k | Self::Psv106k => BaudRate::Br106k,
            Self::Act212k | Self::Psv212k => BaudRate::Br212k,
            Self::Act424k | Self::Psv424k => BaudRate::Br424k,
        }
    }

    /// Decode the mode byte returned by TgInitAsTarget.
    ///
    /// Bits 0-1 carry the framing (01 = active), bit 2 the DEP flag and
    /// bits 4-6 the bit rate. Returns `None` when the DEP flag is clear or
    /// the bit rate is unknown.
    pub fn from_target_mode(mode: u8) -> Option<Self> {
        if mode & 0x04 == 0 {
            return None;
        }
        let ap = if mode & 0x03 == 0x01 {
            ActPass::Active
        } else {
            ActPass::Passive
        };
        let br = BaudRate::from_u8((mode >> 4) & 0x07)?;
        Some(Self::new(ap, br))
    }
}

/// Which side of the DEP link this session plays. Fixed once activation
/// succeeds.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Target,
}

/// LLCP service access point: a 6-bit address.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display(fmt = "{:#04x}", _0)]
pub struct Sap(u8);

impl Sap {
    pub const LINK_MANAGEMENT: Self = Self(crate::constants::llcp::SAP_LINK_MANAGEMENT);
    pub const SDP: Self = Self(crate::constants::llcp::SAP_SDP);
    pub const SNEP: Self = Self(crate::constants::llcp::SAP_SNEP);

    /// Build a SAP, masking the value to 6 bits.
    pub const fn new(v: u8) -> Self {
        Self(v & 0x3f)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn is_link_management(&self) -> bool {
        self.0 == 0
    }
}

/// NFCID3 - Newtype Pattern (10 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NfcId3([u8; NFCID3_LEN]);

impl NfcId3 {
    pub fn from_bytes(bytes: [u8; NFCID3_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an NFCID3 from an 8-byte NFCID2, zero filling the tail.
    pub fn from_id2(id2: [u8; 8]) -> Self {
        let mut arr = [0u8; NFCID3_LEN];
        arr[..8].copy_from_slice(&id2);
        Self(arr)
    }

    pub fn as_bytes(&self) -> &[u8; NFCID3_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl Default for NfcId3 {
    fn default() -> Self {
        Self::from_id2([0x01, 0xFE, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55])
    }
}

impl TryFrom<&[u8]> for NfcId3 {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != NFCID3_LEN {
            return Err(Error::InvalidLength {
                expected: NFCID3_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; NFCID3_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

/// DeviceType
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceType {
    /// USB readers built around the RC-S956 (RC-S330/S360/S370)
    #[default]
    S330,
}

impl DeviceType {
    pub fn from_product_id(pid: u16) -> Option<Self> {
        match pid {
            0x02e1 => Some(Self::S330),
            _ => None,
        }
    }
}

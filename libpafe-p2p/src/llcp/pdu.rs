// libpafe-p2p/src/llcp/pdu.rs
//! LLCP PDU header codec and builders.
//!
//! Header (2 bytes, big endian): DSAP(6) | PTYPE(4) | SSAP(6). I, RR and RNR
//! carry one sequence byte N(S)(4) | N(R)(4) after the header.

use crate::constants::llcp::PDU_HEADER_LEN;
use crate::llcp::param::{Param, encode_list};
use crate::types::Sap;
use crate::{Error, Result};

/// The 16 PTYPE values. Reserved codes are explicit variants so that every
/// nibble maps to exactly one type.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PduType {
    Symm = 0x0,
    Pax = 0x1,
    Agf = 0x2,
    Ui = 0x3,
    Connect = 0x4,
    Disc = 0x5,
    Cc = 0x6,
    Dm = 0x7,
    Frmr = 0x8,
    Reserved9 = 0x9,
    Reserved10 = 0xA,
    Reserved11 = 0xB,
    I = 0xC,
    Rr = 0xD,
    Rnr = 0xE,
    Reserved15 = 0xF,
}

impl PduType {
    /// Map the low nibble of `v` to its type.
    pub fn from_nibble(v: u8) -> Self {
        match v & 0x0f {
            0x0 => Self::Symm,
            0x1 => Self::Pax,
            0x2 => Self::Agf,
            0x3 => Self::Ui,
            0x4 => Self::Connect,
            0x5 => Self::Disc,
            0x6 => Self::Cc,
            0x7 => Self::Dm,
            0x8 => Self::Frmr,
            0x9 => Self::Reserved9,
            0xA => Self::Reserved10,
            0xB => Self::Reserved11,
            0xC => Self::I,
            0xD => Self::Rr,
            0xE => Self::Rnr,
            _ => Self::Reserved15,
        }
    }

    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::Reserved9 | Self::Reserved10 | Self::Reserved11 | Self::Reserved15
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PduHeader {
    pub dsap: Sap,
    pub ptype: PduType,
    pub ssap: Sap,
}

impl PduHeader {
    pub fn new(dsap: Sap, ptype: PduType, ssap: Sap) -> Self {
        Self { dsap, ptype, ssap }
    }

    pub fn encode(&self) -> [u8; PDU_HEADER_LEN] {
        let pt = self.ptype as u8;
        [
            (self.dsap.as_u8() << 2) | (pt >> 2),
            ((pt & 0x03) << 6) | self.ssap.as_u8(),
        ]
    }

    /// Decode the header; PTYPE is always known once two bytes are present.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < PDU_HEADER_LEN {
            return Err(Error::InvalidLength {
                expected: PDU_HEADER_LEN,
                actual: data.len(),
            });
        }
        Ok(Self {
            dsap: Sap::new(data[0] >> 2),
            ptype: PduType::from_nibble(((data[0] & 0x03) << 2) | (data[1] >> 6)),
            ssap: Sap::new(data[1]),
        })
    }

    /// True for the link management address pair (0, 0).
    pub fn is_link_level(&self) -> bool {
        self.dsap.is_link_management() && self.ssap.is_link_management()
    }
}

/// Sequence byte of I/RR/RNR PDUs, both counters modulo 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sequence {
    pub ns: u8,
    pub nr: u8,
}

impl Sequence {
    pub fn new(ns: u8, nr: u8) -> Self {
        Self {
            ns: ns & 0x0f,
            nr: nr & 0x0f,
        }
    }

    pub fn to_byte(self) -> u8 {
        (self.ns << 4) | self.nr
    }

    pub fn from_byte(b: u8) -> Self {
        Self::new(b >> 4, b & 0x0f)
    }
}

/// Build a PDU from its header fields and information field.
pub fn build(dsap: Sap, ptype: PduType, ssap: Sap, info: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(PDU_HEADER_LEN + info.len());
    out.extend_from_slice(&PduHeader::new(dsap, ptype, ssap).encode());
    out.extend_from_slice(info);
    out
}

pub fn symm() -> Vec<u8> {
    build(Sap::LINK_MANAGEMENT, PduType::Symm, Sap::LINK_MANAGEMENT, &[])
}

pub fn pax(params: &[Param]) -> Vec<u8> {
    build(
        Sap::LINK_MANAGEMENT,
        PduType::Pax,
        Sap::LINK_MANAGEMENT,
        &encode_list(params),
    )
}

pub fn connect(dsap: Sap, ssap: Sap, params: &[Param]) -> Vec<u8> {
    build(dsap, PduType::Connect, ssap, &encode_list(params))
}

pub fn cc(dsap: Sap, ssap: Sap, params: &[Param]) -> Vec<u8> {
    build(dsap, PduType::Cc, ssap, &encode_list(params))
}

pub fn disc(dsap: Sap, ssap: Sap) -> Vec<u8> {
    build(dsap, PduType::Disc, ssap, &[])
}

/// DM with its one-byte reason
pub fn dm(dsap: Sap, ssap: Sap, reason: u8) -> Vec<u8> {
    build(dsap, PduType::Dm, ssap, &[reason])
}

pub fn i(dsap: Sap, ssap: Sap, seq: Sequence, payload: &[u8]) -> Vec<u8> {
    let mut info = Vec::with_capacity(1 + payload.len());
    info.push(seq.to_byte());
    info.extend_from_slice(payload);
    build(dsap, PduType::I, ssap, &info)
}

pub fn rr(dsap: Sap, ssap: Sap, nr: u8) -> Vec<u8> {
    build(dsap, PduType::Rr, ssap, &[nr & 0x0f])
}

pub fn rnr(dsap: Sap, ssap: Sap, nr: u8) -> Vec<u8> {
    build(dsap, PduType::Rnr, ssap, &[nr & 0x0f])
}

/// Build an AGF from already encoded PDUs, each prefixed by its 2-byte length.
pub fn agf(pdus: &[Vec<u8>]) -> Vec<u8> {
    let mut info = Vec::new();
    for p in pdus {
        info.extend_from_slice(&(p.len() as u16).to_be_bytes());
        info.extend_from_slice(p);
    }
    build(Sap::LINK_MANAGEMENT, PduType::Agf, Sap::LINK_MANAGEMENT, &info)
}

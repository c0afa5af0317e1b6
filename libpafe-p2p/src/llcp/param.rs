// libpafe-p2p/src/llcp/param.rs
//! LLCP parameter TLVs carried by PAX, CONNECT and CC PDUs and by the DEP
//! general bytes after the magic number.

use crate::{Error, Result};

/// Parameter type codes
pub mod ptype {
    pub const VERSION: u8 = 0x01;
    pub const MIUX: u8 = 0x02;
    pub const WKS: u8 = 0x03;
    pub const LTO: u8 = 0x04;
    pub const RW: u8 = 0x05;
    pub const SN: u8 = 0x06;
    pub const OPT: u8 = 0x07;
}

/// One decoded parameter. The set is closed; any other type code is an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Version { major: u8, minor: u8 },
    /// MIU extension (11 bits)
    Miux(u16),
    /// Well-known services bitmap
    Wks(u16),
    /// Link timeout in 10 ms units
    Lto(u8),
    /// Receive window (4 bits)
    Rw(u8),
    /// Service name
    Sn(Vec<u8>),
    /// Option byte; bits 0-1 carry the link service class
    Opt(u8),
}

impl Param {
    pub fn ptype(&self) -> u8 {
        match self {
            Self::Version { .. } => ptype::VERSION,
            Self::Miux(_) => ptype::MIUX,
            Self::Wks(_) => ptype::WKS,
            Self::Lto(_) => ptype::LTO,
            Self::Rw(_) => ptype::RW,
            Self::Sn(_) => ptype::SN,
            Self::Opt(_) => ptype::OPT,
        }
    }

    /// Append the TLV encoding of this parameter to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.ptype());
        match self {
            Self::Version { major, minor } => {
                out.push(1);
                out.push((major << 4) | (minor & 0x0f));
            }
            Self::Miux(v) => {
                out.push(2);
                out.extend_from_slice(&(v & 0x07ff).to_be_bytes());
            }
            Self::Wks(v) => {
                out.push(2);
                out.extend_from_slice(&v.to_be_bytes());
            }
            Self::Lto(v) | Self::Opt(v) => {
                out.push(1);
                out.push(*v);
            }
            Self::Rw(v) => {
                out.push(1);
                out.push(v & 0x0f);
            }
            Self::Sn(name) => {
                let n = name.len().min(u8::MAX as usize);
                out.push(n as u8);
                out.extend_from_slice(&name[..n]);
            }
        }
    }

    /// Decode one value of type `ptype`.
    fn decode(ptype: u8, value: &[u8]) -> Result<Self> {
        let fixed = |len: usize| -> Result<()> {
            if value.len() != len {
                return Err(Error::InvalidLength {
                    expected: len,
                    actual: value.len(),
                });
            }
            Ok(())
        };
        match ptype {
            ptype::VERSION => {
                fixed(1)?;
                Ok(Self::Version {
                    major: value[0] >> 4,
                    minor: value[0] & 0x0f,
                })
            }
            ptype::MIUX => {
                fixed(2)?;
                Ok(Self::Miux(u16::from_be_bytes([value[0], value[1]]) & 0x07ff))
            }
            ptype::WKS => {
                fixed(2)?;
                Ok(Self::Wks(u16::from_be_bytes([value[0], value[1]])))
            }
            ptype::LTO => {
                fixed(1)?;
                Ok(Self::Lto(value[0]))
            }
            ptype::RW => {
                fixed(1)?;
                Ok(Self::Rw(value[0] & 0x0f))
            }
            ptype::SN => Ok(Self::Sn(value.to_vec())),
            ptype::OPT => {
                fixed(1)?;
                Ok(Self::Opt(value[0]))
            }
            other => Err(Error::UnknownParameter(other)),
        }
    }
}

/// Encode a parameter list.
pub fn encode_list(params: &[Param]) -> Vec<u8> {
    let mut out = Vec::new();
    for p in params {
        p.encode_into(&mut out);
    }
    out
}

/// Iterator over a parameter list. Yields `Err` once and then stops when a
/// TLV is truncated or of unknown type; the end of the list is `None`.
pub struct ParamIter<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> ParamIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }

    /// Offset of the next TLV within the list.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for ParamIter<'_> {
    type Item = Result<Param>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let item = if rest.len() < 2 {
            Err(Error::TruncatedParameter {
                ptype: rest[0],
                needed: 2,
                available: rest.len(),
            })
        } else {
            let (ptype, len) = (rest[0], rest[1] as usize);
            match rest.get(2..2 + len) {
                Some(value) => {
                    let param = Param::decode(ptype, value);
                    if param.is_ok() {
                        self.pos += 2 + len;
                    }
                    param
                }
                None => Err(Error::TruncatedParameter {
                    ptype,
                    needed: len,
                    available: rest.len() - 2,
                }),
            }
        };
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

/// Decode a whole parameter list.
pub fn decode_list(data: &[u8]) -> Result<Vec<Param>> {
    ParamIter::new(data).collect()
}

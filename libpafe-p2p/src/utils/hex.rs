//! Hexadecimal helpers used for logging PDUs and chip frames.

use std::fmt;

/// Convert a byte slice to a lowercase hex string without separators.
///
/// Example: `&[0xde, 0xad]` -> `"dead"`
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    HexDump::compact(bytes).to_string()
}

/// Convert a byte slice to a lowercase hex string with a single space between
/// each byte.
///
/// Example: `&[0xde, 0xad]` -> `"de ad"`
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    HexDump::spaced(bytes).to_string()
}

/// Lazily formatted hex view of a byte slice. Passing this to `log::debug!`
/// avoids building a `String` when the level is disabled.
pub struct HexDump<'a> {
    bytes: &'a [u8],
    separator: Option<char>,
}

impl<'a> HexDump<'a> {
    pub fn compact(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            separator: None,
        }
    }

    pub fn spaced(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            separator: Some(' '),
        }
    }
}

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i != 0 {
                if let Some(sep) = self.separator {
                    write!(f, "{}", sep)?;
                }
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

// libpafe-p2p/src/protocol/parser.rs

use crate::constants::CMD_PREFIX_DEVICE;
use crate::{Error, Result};

/// Ensure the slice has at least `min` bytes.
pub fn ensure_len(data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::InvalidLength {
            expected: min,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Read a single byte at `idx` with bounds checking.
pub fn byte_at(data: &[u8], idx: usize) -> Result<u8> {
    ensure_len(data, idx + 1)?;
    Ok(data[idx])
}

/// Ensure the byte at `idx` equals `expected`. Returns UnexpectedResponse
/// on mismatch.
pub fn expect_byte(data: &[u8], idx: usize, expected: u8) -> Result<()> {
    let actual = byte_at(data, idx)?;
    if actual != expected {
        return Err(Error::UnexpectedResponse { expected, actual });
    }
    Ok(())
}

/// Check the two-byte response header `D5 <cmd + 1>` of a chip response.
pub fn expect_response_header(data: &[u8], command: u8) -> Result<()> {
    expect_byte(data, 0, CMD_PREFIX_DEVICE)?;
    expect_byte(data, 1, command.wrapping_add(1))
}

/// Interpret the status byte following the response header. The low six
/// bits carry the error code; 0x01 is an RF timeout.
pub fn check_status(command: u8, status: u8) -> Result<()> {
    match status & 0x3f {
        0x00 => Ok(()),
        crate::constants::CHIP_STATUS_TIMEOUT => Err(Error::Timeout),
        _ => Err(Error::ChipStatus { command, status }),
    }
}

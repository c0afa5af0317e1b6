// libpafe-p2p/src/protocol/frame.rs

use crate::constants::{ACK_FRAME, FRAME_POSTAMBLE, FRAME_PREAMBLE, MAX_PAYLOAD_LEN, MIN_FRAME_LEN};
use crate::protocol::checksum::{dcs, lcs, length_checks};
use crate::{Error, Result};

/// Error frame reported by the chip for a syntax error in the last command.
const ERROR_FRAME: [u8; 8] = [0x00, 0x00, 0xFF, 0x01, 0xFF, 0x7F, 0x81, 0x00];

/// RC-S956 normal information frame.
///
/// Format: [Preamble(3)] [LEN(1)] [LCS(1)] [TFI + data (LEN)] [DCS(1)] [Postamble(1)]
/// Preamble: 0x00 0x00 0xFF
/// Postamble: 0x00
///
/// TFI is 0xD4 host -> chip and 0xD5 chip -> host; it is part of the payload
/// handed to `encode` and returned by `decode`.
pub struct Frame;

impl Frame {
    /// Wrap `payload` (TFI included) into a normal information frame.
    pub fn encode(payload: &[u8]) -> Result<Vec<u8>> {
        if payload.is_empty() || payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::InvalidLength {
                expected: MAX_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let len = payload.len() as u8;
        let mut out = Vec::with_capacity(MIN_FRAME_LEN + payload.len());
        out.extend_from_slice(&FRAME_PREAMBLE);
        out.push(len);
        out.push(lcs(len));
        out.extend_from_slice(payload);
        out.push(dcs(payload));
        out.push(FRAME_POSTAMBLE);
        Ok(out)
    }

    /// Unwrap a normal information frame and return its payload (TFI included).
    pub fn decode(frame: &[u8]) -> Result<Vec<u8>> {
        if frame.len() < MIN_FRAME_LEN {
            return Err(Error::InvalidLength {
                expected: MIN_FRAME_LEN,
                actual: frame.len(),
            });
        }

        if frame[..3] != FRAME_PREAMBLE {
            return Err(Error::FrameFormat("invalid preamble".into()));
        }
        if Self::is_ack(frame) {
            return Err(Error::FrameFormat("ack frame where a response was expected".into()));
        }
        if Self::is_error(frame) {
            return Err(Error::FrameFormat("chip reported a syntax error frame".into()));
        }

        let len = frame[3];
        let lcs_actual = frame[4];
        if !length_checks(len, lcs_actual) {
            return Err(Error::ChecksumMismatch {
                expected: lcs(len),
                actual: lcs_actual,
            });
        }

        let required_len = MIN_FRAME_LEN + len as usize;
        if frame.len() < required_len {
            return Err(Error::InvalidLength {
                expected: required_len,
                actual: frame.len(),
            });
        }

        let payload_end = 5 + len as usize;
        let payload = &frame[5..payload_end];

        let dcs_actual = frame[payload_end];
        let dcs_expected = dcs(payload);
        if dcs_actual != dcs_expected {
            return Err(Error::ChecksumMismatch {
                expected: dcs_expected,
                actual: dcs_actual,
            });
        }

        if frame[payload_end + 1] != FRAME_POSTAMBLE {
            return Err(Error::FrameFormat("invalid postamble".into()));
        }

        Ok(payload.to_vec())
    }

    /// True for the 6-byte ACK frame `00 00 FF 00 FF 00`.
    pub fn is_ack(frame: &[u8]) -> bool {
        frame.len() >= ACK_FRAME.len() && frame[..ACK_FRAME.len()] == ACK_FRAME
    }

    /// True for the chip's application-level error frame.
    pub fn is_error(frame: &[u8]) -> bool {
        frame.len() >= ERROR_FRAME.len() && frame[..ERROR_FRAME.len()] == ERROR_FRAME
    }
}

// libpafe-p2p/src/error.rs

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("device not found")]
    DeviceNotFound,

    // USB 実装を後から有効化できるように optional dependency にしている
    #[cfg(feature = "usb")]
    #[error("usb error: {0}")]
    Usb(#[from] rusb::Error),

    #[error("invalid packet length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },
    #[error("frame format error: {0}")]
    FrameFormat(String),

    #[error("unexpected response code: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedResponse { expected: u8, actual: u8 },

    #[error("chip error: command={command:#04x}, status={status:#04x}")]
    ChipStatus { command: u8, status: u8 },

    #[error("operation timed out")]
    Timeout,

    #[error("dep activation failed: {0}")]
    Activation(#[from] ActivationError),

    #[error("unknown llcp parameter type {0:#04x}")]
    UnknownParameter(u8),

    #[error("truncated llcp parameter: type {ptype:#04x} needs {needed} bytes, {available} left")]
    TruncatedParameter {
        ptype: u8,
        needed: usize,
        available: usize,
    },

    #[error("link policy violation: {0}")]
    Violation(#[from] Violation),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("send buffer full: capacity {capacity}, requested {requested}")]
    SendBufferFull { capacity: usize, requested: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons an NFC-DEP activation is refused. Every one of them aborts
/// `start()`; there is no partial acceptance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    #[error("response too short: need {needed} bytes, got {actual}")]
    ShortResponse { needed: usize, actual: usize },

    #[error("target count must be 1, got {0}")]
    TargetCount(u8),

    #[error("{field} must be zero, got {value:#04x}")]
    NonZeroField { field: &'static str, value: u8 },

    #[error("payload parameter must be 0x32, got {0:#04x}")]
    PayloadParameter(u8),

    #[error("llcp magic number mismatch")]
    MagicNumber,

    #[error("unexpected dep command {0:#04x}")]
    CommandCode(u8),

    #[error("general bytes carry no VERSION parameter")]
    MissingVersion,

    #[error("general bytes rejected: {0}")]
    Rejected(Violation),

    #[error("chip is not in dep tx mode (mode={0:#04x})")]
    TxMode(u8),

    #[error("target mode byte {0:#04x} does not describe a dep link")]
    TargetMode(u8),
}

/// Semantic or policy errors detected on received LLCP traffic. Each one
/// kills the link.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    #[error("remote llcp version {major}.{minor} is older than ours")]
    VersionTooLow { major: u8, minor: u8 },

    #[error("remote does not offer the link management service")]
    MissingLinkManagement,

    #[error("remote receive window is zero")]
    ZeroReceiveWindow,

    #[error("remote only supports link service class 1")]
    LinkServiceClass,

    #[error("remote rejected a pdu (FRMR flags={0:#04x})")]
    FrameReject(u8),

    #[error("malformed pdu")]
    MalformedPdu,
}

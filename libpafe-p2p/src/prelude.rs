// libpafe-p2p/src/prelude.rs

pub use crate::config::{LlcpConfig, SessionBuilder};
pub use crate::device::{Device, DeviceBuilder, Initialized, Uninitialized};
pub use crate::llcp::{CloseReason, ConnState};
pub use crate::pcd::Pcd;
pub use crate::protocol::{Command, Response};
pub use crate::session::LlcpSession;
pub use crate::transport::Transport;
pub use crate::{
    ActPass, ActivationError, BaudRate, DepMode, DeviceType, Error, NfcId3, Result, Role, Sap,
    Violation,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, default_read_timeout, ms};

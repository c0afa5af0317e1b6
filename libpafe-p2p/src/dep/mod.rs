// libpafe-p2p/src/dep/mod.rs
//! NFC-DEP activation for both roles.
//!
//! Activation succeeds only when the peer's general bytes start with the
//! LLCP magic number and carry a VERSION parameter that passes the link
//! policy. On success the caller receives the peer's link parameters and
//! may start LLCP.

pub mod atr;
pub mod initiator;
pub mod target;

pub use initiator::start_as_initiator;
pub use target::start_as_target;

use crate::llcp::LinkParams;
use crate::types::{DepMode, Role};

/// A completed NFC-DEP activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub mode: DepMode,
    pub role: Role,
    /// Parameters learnt from the peer's general bytes
    pub remote: LinkParams,
}

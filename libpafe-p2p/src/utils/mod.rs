//! Utilities for libpafe-p2p: hex dumps for logging and the link timer.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;

// libpafe-p2p/src/llcp/mod.rs
//! Logical Link Control Protocol engine.

pub mod link;
pub mod negotiate;
pub mod param;
pub mod pdu;

pub use link::{CloseReason, ConnState, Dispatch, Event, Link, Step};
pub use negotiate::LinkParams;
pub use param::Param;
pub use pdu::{PduHeader, PduType, Sequence};

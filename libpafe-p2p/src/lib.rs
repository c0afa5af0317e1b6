// libpafe-p2p/src/lib.rs

//! libpafe-p2p
//!
//! NFC peer-to-peer for Sony RC-S956 family readers: NFC-DEP activation in
//! both roles and an LLCP link with one connection on top of it.
//!
//! ```no_run
//! # #[cfg(feature = "usb")]
//! # fn demo() -> libpafe_p2p::Result<()> {
//! use libpafe_p2p::prelude::*;
//!
//! let device = DeviceBuilder::new().usb()?.build_uninitialized()?.initialize()?;
//! let mut session = LlcpSession::builder(device)
//!     .on_receive(|data| println!("{}", bytes_to_hex_spaced(data)))
//!     .build()?;
//! session.start_as_initiator(DepMode::Act424k)?;
//! session.set_send_data(b"hello")?;
//! while session.poll() {}
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod dep;
pub mod device;
pub mod error;
pub mod llcp;
pub mod pcd;
pub mod prelude;
pub mod protocol;
pub mod session;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;

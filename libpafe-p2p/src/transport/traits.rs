// libpafe-p2p/src/transport/traits.rs

use crate::Result;
use crate::types::DeviceType;

/// Transport trait abstracts byte I/O to the reader chip away from the
/// command and protocol layers. Every call is blocking.
pub trait Transport {
    /// Send one complete chip frame
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive one chip frame with a timeout in milliseconds
    fn receive(&mut self, timeout_ms: u64) -> Result<Vec<u8>>;

    /// Query the detected device type
    fn device_type(&self) -> Result<DeviceType>;

    /// Perform a transport-level reset
    fn reset(&mut self) -> Result<()>;

    /// Abort the command in flight by sending an ACK frame. The default
    /// implementation writes the ACK through `send`.
    fn cancel(&mut self) -> Result<()> {
        self.send(&crate::constants::ACK_FRAME)
    }
}

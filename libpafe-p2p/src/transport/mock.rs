// libpafe-p2p/src/transport/mock.rs

use crate::transport::traits::Transport;
use crate::types::DeviceType;
use crate::{Error, Result};

/// Mock transport for unit tests. It records sent frames and returns queued
/// responses in order.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub sent: Vec<Vec<u8>>,
    pub responses: Vec<Vec<u8>>,
    pub device_type: DeviceType,
    /// Testing hook: number of send calls that should fail with Timeout
    pub send_failures: usize,
    /// Number of reset calls observed
    pub resets: usize,
}

impl MockTransport {
    pub fn new(device_type: DeviceType) -> Self {
        Self {
            device_type,
            ..Self::default()
        }
    }

    /// Set how many subsequent send calls should fail (for tests).
    pub fn set_send_failures(&mut self, n: usize) {
        self.send_failures = n;
    }

    pub fn push_response(&mut self, resp: Vec<u8>) {
        self.responses.push(resp);
    }

    pub fn pop_sent(&mut self) -> Option<Vec<u8>> {
        self.sent.pop()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        if self.send_failures > 0 {
            self.send_failures -= 1;
            return Err(Error::Timeout);
        }
        self.sent.push(data.to_vec());
        Ok(())
    }

    fn receive(&mut self, _timeout_ms: u64) -> Result<Vec<u8>> {
        if self.responses.is_empty() {
            Err(Error::Timeout)
        } else {
            Ok(self.responses.remove(0))
        }
    }

    fn device_type(&self) -> Result<DeviceType> {
        Ok(self.device_type)
    }

    fn reset(&mut self) -> Result<()> {
        // Queued responses are preserved so tests can pre-seed replies
        // before handing the transport to a Device.
        self.resets += 1;
        Ok(())
    }
}

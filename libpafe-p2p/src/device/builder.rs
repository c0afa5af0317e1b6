// libpafe-p2p/src/device/builder.rs

use crate::device::handle::{Device, Uninitialized};
use crate::transport::Transport;
use crate::{Error, Result};

/// Helper to construct a Device with optional configuration.
#[derive(Default)]
pub struct DeviceBuilder {
    transport: Option<Box<dyn Transport>>,
    timeout_ms: Option<u64>,
    target_timeout_ms: Option<u64>,
}

impl DeviceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide an already-created transport instance (e.g. MockTransport)
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Open the first RC-S956 reader on the USB bus.
    #[cfg(feature = "usb")]
    pub fn usb(mut self) -> Result<Self> {
        self.transport = Some(Box::new(crate::transport::UsbTransport::open()?));
        Ok(self)
    }

    /// Response timeout for initiator exchanges
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Timeout while waiting as a target (0 = forever)
    pub fn target_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.target_timeout_ms = Some(timeout_ms);
        self
    }

    /// Consume the builder and return an uninitialized Device.
    /// Requires a transport to be provided; otherwise returns DeviceNotFound.
    pub fn build_uninitialized(self) -> Result<Device<Uninitialized>> {
        let transport = self.transport.ok_or(Error::DeviceNotFound)?;
        let mut device = Device::new_with_transport(transport)?;
        if let Some(t) = self.timeout_ms {
            device.set_timeout_ms(t);
        }
        if let Some(t) = self.target_timeout_ms {
            device.set_target_timeout_ms(t);
        }
        Ok(device)
    }
}

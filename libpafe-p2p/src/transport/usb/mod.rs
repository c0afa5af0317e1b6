// libpafe-p2p/src/transport/usb/mod.rs

#![cfg(feature = "usb")]

use std::time::Duration;

use crate::transport::traits::Transport;
use crate::types::DeviceType;
use crate::{Error, Result};

use rusb::UsbContext;
use rusb::{Context, DeviceHandle};

mod descriptor;
use descriptor::find_bulk_endpoints;

/// Sony vendor id
const SONY_VENDOR_ID: u16 = 0x054c;

/// Bulk transport for USB readers built around the RC-S956. Frames are
/// passed through unchanged; framing is done by the command layer.
pub struct UsbTransport {
    handle: DeviceHandle<Context>,
    device_type: DeviceType,
    in_ep: u8,
    out_ep: u8,
    interface: u8,
    timeout_ms: u64,
}

impl UsbTransport {
    /// Open the first RC-S956 based reader found on the bus.
    pub fn open() -> Result<Self> {
        let ctx = Context::new()?;
        for device in ctx.devices()?.iter() {
            let dd = device.device_descriptor()?;
            if dd.vendor_id() != SONY_VENDOR_ID {
                continue;
            }
            let Some(device_type) = DeviceType::from_product_id(dd.product_id()) else {
                continue;
            };
            let Some(eps) = find_bulk_endpoints(&device) else {
                log::warn!("reader {:04x} has no bulk endpoints", dd.product_id());
                continue;
            };

            let mut handle = device.open()?;
            // The kernel driver may own the interface on Linux; detaching is
            // best-effort and claim_interface reports a hard failure.
            if let Ok(true) = handle.kernel_driver_active(eps.interface) {
                let _ = handle.detach_kernel_driver(eps.interface);
            }
            handle.claim_interface(eps.interface)?;

            log::info!(
                "opened reader {:04x}:{:04x} (in={:#04x}, out={:#04x})",
                dd.vendor_id(),
                dd.product_id(),
                eps.in_ep,
                eps.out_ep
            );
            return Ok(UsbTransport {
                handle,
                device_type,
                in_ep: eps.in_ep,
                out_ep: eps.out_ep,
                interface: eps.interface,
                timeout_ms: crate::utils::DEFAULT_READ_TIMEOUT_MS,
            });
        }

        Err(Error::DeviceNotFound)
    }
}

impl Transport for UsbTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        let timeout = Duration::from_millis(self.timeout_ms);
        #[cfg(feature = "diagnostics")]
        log::trace!("usb out [{}]", crate::utils::HexDump::spaced(data));

        let n = self.handle.write_bulk(self.out_ep, data, timeout)?;
        if n != data.len() {
            return Err(Error::InvalidLength {
                expected: data.len(),
                actual: n,
            });
        }
        Ok(())
    }

    fn receive(&mut self, timeout_ms: u64) -> Result<Vec<u8>> {
        // A zero timeout means "wait forever" for rusb, which is what the
        // target side needs while waiting for the initiator.
        let timeout = Duration::from_millis(timeout_ms);
        let mut buf = vec![0u8; 512];
        match self.handle.read_bulk(self.in_ep, &mut buf, timeout) {
            Ok(n) => {
                buf.truncate(n);
                #[cfg(feature = "diagnostics")]
                log::trace!("usb in [{}]", crate::utils::HexDump::spaced(&buf));
                Ok(buf)
            }
            Err(rusb::Error::Timeout) => Err(Error::Timeout),
            Err(e) => Err(e.into()),
        }
    }

    fn device_type(&self) -> Result<DeviceType> {
        Ok(self.device_type)
    }

    fn reset(&mut self) -> Result<()> {
        // Abort anything in flight and flush stale frames from the IN pipe.
        self.cancel()?;
        let _ = self.handle.clear_halt(self.in_ep);
        let mut scratch = vec![0u8; 512];
        while self
            .handle
            .read_bulk(self.in_ep, &mut scratch, Duration::from_millis(10))
            .is_ok()
        {}
        Ok(())
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        let _ = self.handle.release_interface(self.interface);
    }
}

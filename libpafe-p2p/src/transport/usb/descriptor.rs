// libpafe-p2p/src/transport/usb/descriptor.rs

use rusb::{Device, Direction, TransferType};

/// Bulk endpoint pair found on one interface.
pub struct BulkEndpoints {
    pub in_ep: u8,
    pub out_ep: u8,
    pub interface: u8,
}

/// Inspect the active configuration and return the first interface that
/// exposes both a bulk IN and a bulk OUT endpoint.
pub fn find_bulk_endpoints<D: rusb::UsbContext>(device: &Device<D>) -> Option<BulkEndpoints> {
    let config = device.config_descriptor(0).ok()?;

    for interface in config.interfaces() {
        for desc in interface.descriptors() {
            let mut in_ep = None;
            let mut out_ep = None;
            for ep in desc.endpoint_descriptors() {
                if ep.transfer_type() != TransferType::Bulk {
                    continue;
                }
                match ep.direction() {
                    Direction::In if in_ep.is_none() => in_ep = Some(ep.address()),
                    Direction::Out if out_ep.is_none() => out_ep = Some(ep.address()),
                    _ => {}
                }
            }
            if let (Some(in_ep), Some(out_ep)) = (in_ep, out_ep) {
                return Some(BulkEndpoints {
                    in_ep,
                    out_ep,
                    interface: desc.interface_number(),
                });
            }
        }
    }

    None
}

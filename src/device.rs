//! Capture devices as the capture backend enumerates them.

use std::net::IpAddr;

use pcap::Device;

use crate::error::BackendError;

/// A capture-capable device reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeDevice {
    /// Backend identifier, e.g. `\Device\NPF_{GUID}` under Npcap.
    pub name: String,
    pub description: Option<String>,
    pub addresses: Vec<IpAddr>,
}

impl From<Device> for NativeDevice {
    fn from(device: Device) -> Self {
        Self {
            name: device.name,
            description: device.desc,
            addresses: device.addresses.into_iter().map(|a| a.addr).collect(),
        }
    }
}

/// Lists the devices a capture backend can open, in backend order.
pub trait DeviceEnumerator {
    fn list_devices(&self) -> Result<Vec<NativeDevice>, BackendError>;
}

/// Enumerates devices through `pcap_findalldevs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PcapDevices;

impl DeviceEnumerator for PcapDevices {
    fn list_devices(&self) -> Result<Vec<NativeDevice>, BackendError> {
        let devices = Device::list()?;
        Ok(devices.into_iter().map(NativeDevice::from).collect())
    }
}

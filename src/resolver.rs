//! Maps an OS interface to the device name the capture backend expects.
//!
//! libpcap on Linux and macOS opens devices by their OS interface name, so
//! resolution is the identity there. Npcap on Windows exposes devices as
//! `\Device\NPF_{GUID}` and the interface has to be matched against the
//! enumerated devices. Matching runs in tiers; every device is tried
//! against one tier before the next tier is considered, and the first
//! device to match wins.

use std::fmt;
use std::net::IpAddr;

use log::debug;

use crate::device::{DeviceEnumerator, NativeDevice};
use crate::error::{CaptureError, Result};
use crate::interface::{InterfaceDescriptor, InterfaceInspector};

/// Produces the backend device name for an interface.
pub trait DeviceResolver {
    fn resolve(&self, iface: &InterfaceDescriptor) -> Result<String>;
}

impl<R: DeviceResolver + ?Sized> DeviceResolver for Box<R> {
    fn resolve(&self, iface: &InterfaceDescriptor) -> Result<String> {
        (**self).resolve(iface)
    }
}

/// Uses the interface name verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityResolver;

impl DeviceResolver for IdentityResolver {
    fn resolve(&self, iface: &InterfaceDescriptor) -> Result<String> {
        Ok(iface.name.clone())
    }
}

/// The matching strategies, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    BoundAddress,
    Description,
    Index,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::BoundAddress => write!(f, "bound address"),
            MatchTier::Description => write!(f, "description"),
            MatchTier::Index => write!(f, "interface index"),
        }
    }
}

/// True when any address bound to the device is also bound to the
/// interface. Addresses are compared in canonical form so that an
/// IPv4-mapped IPv6 address equals its IPv4 address.
pub fn shares_bound_address(device: &NativeDevice, os_addresses: &[IpAddr]) -> bool {
    device.addresses.iter().any(|device_addr| {
        os_addresses
            .iter()
            .any(|os_addr| os_addr.to_canonical() == device_addr.to_canonical())
    })
}

/// True when the device description contains the interface name,
/// ignoring case.
pub fn description_names_interface(device: &NativeDevice, iface: &InterfaceDescriptor) -> bool {
    if iface.name.is_empty() {
        return false;
    }
    device
        .description
        .as_deref()
        .is_some_and(|desc| contains_ignore_case(desc, &iface.name))
}

/// True when the device name contains the decimal interface index.
pub fn name_embeds_index(device: &NativeDevice, iface: &InterfaceDescriptor) -> bool {
    contains_ignore_case(&device.name, &iface.index.to_string())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Resolves interfaces by matching them against enumerated backend devices.
pub struct TranslatingResolver<E, I> {
    devices: E,
    interfaces: I,
}

impl<E, I> TranslatingResolver<E, I>
where
    E: DeviceEnumerator,
    I: InterfaceInspector,
{
    pub fn new(devices: E, interfaces: I) -> Self {
        Self { devices, interfaces }
    }

    /// Re-reads the interface's bound addresses for every device that has
    /// addresses of its own. A failed OS query is a miss, not an error.
    fn address_matches(&self, device: &NativeDevice, iface: &InterfaceDescriptor) -> bool {
        if device.addresses.is_empty() {
            return false;
        }
        match self.interfaces.bound_addresses(&iface.name) {
            Ok(os_addresses) => shares_bound_address(device, &os_addresses),
            Err(err) => {
                debug!("skipping address match for {}: {}", device.name, err);
                false
            }
        }
    }
}

impl<E, I> DeviceResolver for TranslatingResolver<E, I>
where
    E: DeviceEnumerator,
    I: InterfaceInspector,
{
    fn resolve(&self, iface: &InterfaceDescriptor) -> Result<String> {
        let devices = self
            .devices
            .list_devices()
            .map_err(CaptureError::Enumeration)?;

        let tiers: [(MatchTier, &dyn Fn(&NativeDevice) -> bool); 3] = [
            (MatchTier::BoundAddress, &|d: &NativeDevice| self.address_matches(d, iface)),
            (MatchTier::Description, &|d: &NativeDevice| description_names_interface(d, iface)),
            (MatchTier::Index, &|d: &NativeDevice| name_embeds_index(d, iface)),
        ];

        for (tier, matches) in tiers {
            if let Some(device) = devices.iter().find(|d| matches(d)) {
                debug!("matched {} to {} by {}", iface.name, device.name, tier);
                return Ok(device.name.clone());
            }
        }

        Err(CaptureError::NoMatchingDevice {
            interface: iface.name.clone(),
            hardware_addr: iface.hardware_addr_string(),
        })
    }
}

/// Resolver for the platform this binary was built for.
#[cfg(windows)]
pub fn platform_resolver() -> Box<dyn DeviceResolver> {
    use crate::device::PcapDevices;
    use crate::interface::SystemInterfaces;

    Box::new(TranslatingResolver::new(PcapDevices, SystemInterfaces))
}

/// Resolver for the platform this binary was built for.
#[cfg(not(windows))]
pub fn platform_resolver() -> Box<dyn DeviceResolver> {
    Box::new(IdentityResolver)
}

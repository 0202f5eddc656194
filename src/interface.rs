//! OS view of network interfaces.
//!
//! Interfaces are read from the OS adapter tables through `netdev`. On
//! Windows the OS name of an adapter is its friendly name ("Ethernet 2");
//! the adapter GUID is only used when no friendly name is reported.

use std::fmt::Write;
use std::net::IpAddr;

use crate::error::{CaptureError, Result};

/// A logical network interface as the operating system names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub hardware_addr: Option<Vec<u8>>,
    pub index: u32,
}

impl InterfaceDescriptor {
    pub fn new(name: impl Into<String>, hardware_addr: Option<Vec<u8>>, index: u32) -> Self {
        Self {
            name: name.into(),
            hardware_addr,
            index,
        }
    }

    /// Colon separated lowercase hex, or an empty string when there is no
    /// hardware address.
    pub fn hardware_addr_string(&self) -> String {
        let mut out = String::new();
        for (i, byte) in self.hardware_addr.iter().flatten().enumerate() {
            if i > 0 {
                out.push(':');
            }
            let _ = write!(out, "{:02x}", byte);
        }
        out
    }
}

/// One row of the OS interface table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInterface {
    /// Kernel or adapter name (a GUID on Windows).
    pub name: String,
    pub friendly_name: Option<String>,
    pub hardware_addr: Option<Vec<u8>>,
    pub index: u32,
    pub addresses: Vec<IpAddr>,
}

impl OsInterface {
    /// The name users know the interface by. `friendly` selects the
    /// Windows convention.
    pub fn os_name(&self, friendly: bool) -> &str {
        match (&self.friendly_name, friendly) {
            (Some(friendly_name), true) if !friendly_name.is_empty() => friendly_name,
            _ => &self.name,
        }
    }

    pub fn descriptor(&self, friendly: bool) -> InterfaceDescriptor {
        InterfaceDescriptor::new(self.os_name(friendly), self.hardware_addr.clone(), self.index)
    }
}

impl From<netdev::Interface> for OsInterface {
    fn from(iface: netdev::Interface) -> Self {
        let addresses = iface
            .ipv4
            .iter()
            .map(|net| IpAddr::V4(net.addr()))
            .chain(iface.ipv6.iter().map(|net| IpAddr::V6(net.addr())))
            .collect();
        Self {
            name: iface.name,
            friendly_name: iface.friendly_name,
            hardware_addr: iface.mac_addr.map(|mac| mac.octets().to_vec()),
            index: iface.index,
            addresses,
        }
    }
}

/// Finds the interface whose OS name is `name`.
pub fn find_named<'a>(interfaces: &'a [OsInterface], name: &str, friendly: bool) -> Result<&'a OsInterface> {
    interfaces
        .iter()
        .find(|iface| iface.os_name(friendly) == name)
        .ok_or_else(|| CaptureError::InterfaceNotFound {
            name: name.to_string(),
        })
}

/// Interface inspection facilities provided by the operating system.
pub trait InterfaceInspector {
    /// Looks up an interface by its OS name.
    fn find(&self, name: &str) -> Result<InterfaceDescriptor>;

    /// Addresses currently bound to the named interface.
    fn bound_addresses(&self, name: &str) -> Result<Vec<IpAddr>>;
}

/// Reads interfaces from the live OS tables on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

impl SystemInterfaces {
    fn snapshot(&self) -> Vec<OsInterface> {
        netdev::get_interfaces().into_iter().map(OsInterface::from).collect()
    }
}

impl InterfaceInspector for SystemInterfaces {
    fn find(&self, name: &str) -> Result<InterfaceDescriptor> {
        let interfaces = self.snapshot();
        find_named(&interfaces, name, cfg!(windows)).map(|iface| iface.descriptor(cfg!(windows)))
    }

    fn bound_addresses(&self, name: &str) -> Result<Vec<IpAddr>> {
        let interfaces = self.snapshot();
        find_named(&interfaces, name, cfg!(windows)).map(|iface| iface.addresses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn ethernet2() -> OsInterface {
        OsInterface {
            name: "{4D36E972-E325-11CE-BFC1-08002BE10318}".to_string(),
            friendly_name: Some("Ethernet 2".to_string()),
            hardware_addr: Some(vec![0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]),
            index: 12,
            addresses: vec![
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)),
                IpAddr::V6(Ipv6Addr::LOCALHOST),
            ],
        }
    }

    fn eth0() -> OsInterface {
        OsInterface {
            name: "eth0".to_string(),
            friendly_name: None,
            hardware_addr: None,
            index: 2,
            addresses: vec![],
        }
    }

    #[test]
    fn hardware_addr_formats_as_colon_hex() {
        let iface = InterfaceDescriptor::new(
            "eth0",
            Some(vec![0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]),
            3,
        );
        assert_eq!(iface.hardware_addr_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn missing_hardware_addr_formats_empty() {
        let iface = InterfaceDescriptor::new("lo", None, 1);
        assert_eq!(iface.hardware_addr_string(), "");
    }

    #[test]
    fn single_digit_octets_are_padded() {
        let iface = InterfaceDescriptor::new("eth1", Some(vec![0x00, 0x0a, 0x1b]), 4);
        assert_eq!(iface.hardware_addr_string(), "00:0a:1b");
    }

    #[test]
    fn friendly_name_is_the_windows_os_name() {
        let interfaces = [eth0(), ethernet2()];
        let found = find_named(&interfaces, "Ethernet 2", true).unwrap();
        let descriptor = found.descriptor(true);
        assert_eq!(descriptor.name, "Ethernet 2");
        assert_eq!(descriptor.index, 12);
        assert_eq!(descriptor.hardware_addr_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn adapter_guid_does_not_match_on_windows() {
        let interfaces = [ethernet2()];
        let err = find_named(&interfaces, "{4D36E972-E325-11CE-BFC1-08002BE10318}", true).unwrap_err();
        assert!(matches!(err, CaptureError::InterfaceNotFound { .. }));
    }

    #[test]
    fn kernel_name_is_used_without_friendly_names() {
        let interfaces = [ethernet2(), eth0()];
        assert_eq!(find_named(&interfaces, "eth0", false).unwrap().index, 2);
        assert!(find_named(&interfaces, "Ethernet 2", false).is_err());
    }

    #[test]
    fn missing_friendly_name_falls_back_to_adapter_name() {
        assert_eq!(eth0().os_name(true), "eth0");
    }

    #[test]
    fn unknown_interface_is_not_found() {
        let err = find_named(&[eth0()], "wlan9", cfg!(windows)).unwrap_err();
        assert_eq!(err.to_string(), "interface wlan9 not found");
    }
}

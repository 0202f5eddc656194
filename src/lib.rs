//! Builds live libpcap capture handles from OS network interfaces.
//!
//! On platforms where libpcap names devices differently from the OS
//! (Windows/Npcap uses `\Device\NPF_{GUID}`), the interface is first
//! translated to the matching capture device.

pub mod capture;
pub mod device;
pub mod error;
pub mod interface;
pub mod resolver;

pub use capture::{CaptureConfig, CaptureHandle, HandleBuilder};
pub use error::{CaptureError, Result};
pub use interface::InterfaceDescriptor;
pub use resolver::{DeviceResolver, platform_resolver};

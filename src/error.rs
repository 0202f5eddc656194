use thiserror::Error;

use crate::capture::SessionOption;

pub type Result<T, E = CaptureError> = std::result::Result<T, E>;

/// Failure reported by a capture backend.
///
/// libpcap errors and test backends both report through this type so
/// the handle builder does not depend on a concrete backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<pcap::Error> for BackendError {
    fn from(err: pcap::Error) -> Self {
        Self(err.to_string())
    }
}

/// Errors raised while resolving a device or building a capture handle.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("interface {name} not found")]
    InterfaceNotFound { name: String },

    #[error("failed to enumerate capture devices: {0}")]
    Enumeration(#[source] BackendError),

    #[error("no capture device found matching interface {interface} (MAC: {hardware_addr})")]
    NoMatchingDevice {
        interface: String,
        hardware_addr: String,
    },

    #[error("failed to create inactive capture session for {device}: {source}")]
    SessionCreation {
        device: String,
        source: BackendError,
    },

    #[error("failed to set {} to {}: {source}", .option.name(), .option.value())]
    Configuration {
        option: SessionOption,
        source: BackendError,
    },

    #[error("failed to activate capture on {device}: {source}")]
    Activation {
        device: String,
        source: BackendError,
    },
}

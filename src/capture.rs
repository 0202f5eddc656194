//! Builds an active capture handle from an interface and its tuning.
//!
//! The backend session goes through a fixed sequence: create inactive,
//! apply every [`SessionOption`] in order, activate. The inactive session
//! is held by an [`InactiveGuard`] from creation onward so it is released
//! exactly once whether construction succeeds or fails.

mod pcap_backend;

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use log::{debug, trace};

use crate::error::{BackendError, CaptureError, Result};
use crate::interface::InterfaceDescriptor;
use crate::resolver::{DeviceResolver, platform_resolver};

pub use pcap_backend::{PcapBackend, PcapSession};

/// Maximum number of bytes captured per frame.
pub const SNAPSHOT_LENGTH: u32 = 65536;

/// A live libpcap capture.
pub type CaptureHandle = pcap::Capture<pcap::Active>;

/// What to capture on and how large the kernel receive buffer should be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    pub interface: InterfaceDescriptor,
    /// Receive buffer size in bytes, handed to the backend as given.
    pub buffer_size: u32,
}

impl CaptureConfig {
    pub fn new(interface: InterfaceDescriptor, buffer_size: u32) -> Self {
        Self {
            interface,
            buffer_size,
        }
    }

    /// Options applied to the inactive session, in application order.
    pub fn session_options(&self) -> [SessionOption; 5] {
        [
            SessionOption::BufferSize(self.buffer_size),
            SessionOption::SnapLen(SNAPSHOT_LENGTH),
            SessionOption::Promiscuous(true),
            SessionOption::Timeout(None),
            SessionOption::ImmediateMode(true),
        ]
    }
}

/// A setting applied to an inactive session before activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOption {
    BufferSize(u32),
    SnapLen(u32),
    Promiscuous(bool),
    /// `None` blocks reads until a frame arrives.
    Timeout(Option<Duration>),
    ImmediateMode(bool),
}

impl SessionOption {
    pub fn name(&self) -> &'static str {
        match self {
            SessionOption::BufferSize(_) => "buffer size",
            SessionOption::SnapLen(_) => "snapshot length",
            SessionOption::Promiscuous(_) => "promiscuous mode",
            SessionOption::Timeout(_) => "read timeout",
            SessionOption::ImmediateMode(_) => "immediate mode",
        }
    }

    pub fn value(&self) -> String {
        match self {
            SessionOption::BufferSize(n) | SessionOption::SnapLen(n) => n.to_string(),
            SessionOption::Promiscuous(on) | SessionOption::ImmediateMode(on) => on.to_string(),
            SessionOption::Timeout(None) => "block forever".to_string(),
            SessionOption::Timeout(Some(t)) => format!("{}ms", t.as_millis()),
        }
    }
}

impl fmt::Display for SessionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name(), self.value())
    }
}

/// Opens inactive capture sessions.
pub trait CaptureBackend {
    type Session: InactiveSession;

    fn create_inactive(&self, device: &str) -> Result<Self::Session, BackendError>;
}

/// A created but not yet activated capture session.
pub trait InactiveSession {
    type Active;

    fn configure(&mut self, option: SessionOption) -> Result<(), BackendError>;

    /// Turns the session into a live handle. The inactive session is
    /// spent afterwards whether or not activation succeeded.
    fn activate(&mut self) -> Result<Self::Active, BackendError>;

    /// Frees whatever the inactive session still holds. Called once by
    /// [`InactiveGuard`].
    fn release(&mut self);
}

/// Releases the wrapped session when dropped.
pub struct InactiveGuard<S: InactiveSession> {
    session: S,
}

impl<S: InactiveSession> InactiveGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }
}

impl<S: InactiveSession> Deref for InactiveGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: InactiveSession> DerefMut for InactiveGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: InactiveSession> Drop for InactiveGuard<S> {
    fn drop(&mut self) {
        trace!("releasing inactive capture session");
        self.session.release();
    }
}

/// Turns a [`CaptureConfig`] into an active handle on a backend.
pub struct HandleBuilder<B, R> {
    backend: B,
    resolver: R,
}

impl HandleBuilder<PcapBackend, Box<dyn DeviceResolver>> {
    /// libpcap with the resolver for the current platform.
    pub fn pcap() -> Self {
        Self::new(PcapBackend, platform_resolver())
    }
}

impl<B, R> HandleBuilder<B, R>
where
    B: CaptureBackend,
    R: DeviceResolver,
{
    pub fn new(backend: B, resolver: R) -> Self {
        Self { backend, resolver }
    }

    pub fn build(
        &self,
        config: &CaptureConfig,
    ) -> Result<<B::Session as InactiveSession>::Active> {
        let device = self.resolver.resolve(&config.interface)?;
        debug!("opening {} as capture device {}", config.interface.name, device);

        let session = self
            .backend
            .create_inactive(&device)
            .map_err(|source| CaptureError::SessionCreation {
                device: device.clone(),
                source,
            })?;
        let mut session = InactiveGuard::new(session);

        for option in config.session_options() {
            trace!("{}: {}", device, option);
            session
                .configure(option)
                .map_err(|source| CaptureError::Configuration { option, source })?;
        }

        let handle = session
            .activate()
            .map_err(|source| CaptureError::Activation {
                device: device.clone(),
                source,
            })?;
        drop(session);

        debug!("capture active on {}", device);
        Ok(handle)
    }
}

/// Opens a live libpcap handle for the configured interface.
pub fn open_handle(config: &CaptureConfig) -> Result<CaptureHandle> {
    HandleBuilder::pcap().build(config)
}

use std::time::Duration;

use pcap::{Active, Capture, Inactive};

use super::{CaptureBackend, InactiveSession, SessionOption};
use crate::error::BackendError;

/// libpcap through the `pcap` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PcapBackend;

impl CaptureBackend for PcapBackend {
    type Session = PcapSession;

    fn create_inactive(&self, device: &str) -> Result<PcapSession, BackendError> {
        let capture = Capture::from_device(device)?;
        Ok(PcapSession {
            capture: Some(capture),
        })
    }
}

/// An inactive `pcap_t`. The `pcap` setters consume the capture, so it is
/// held in an `Option` and put back after every setter.
pub struct PcapSession {
    capture: Option<Capture<Inactive>>,
}

impl PcapSession {
    fn take(&mut self) -> Result<Capture<Inactive>, BackendError> {
        self.capture
            .take()
            .ok_or_else(|| BackendError::new("capture session already spent"))
    }
}

impl InactiveSession for PcapSession {
    type Active = Capture<Active>;

    fn configure(&mut self, option: SessionOption) -> Result<(), BackendError> {
        // Convert before taking the capture so a bad value leaves it in place.
        let capture = match option {
            SessionOption::BufferSize(bytes) => {
                let bytes = c_int(bytes)?;
                self.take()?.buffer_size(bytes)
            }
            SessionOption::SnapLen(len) => {
                let len = c_int(len)?;
                self.take()?.snaplen(len)
            }
            SessionOption::Promiscuous(on) => self.take()?.promisc(on),
            SessionOption::Timeout(timeout) => {
                let ms = timeout_ms(timeout)?;
                self.take()?.timeout(ms)
            }
            SessionOption::ImmediateMode(on) => self.take()?.immediate_mode(on),
        };
        self.capture = Some(capture);
        Ok(())
    }

    fn activate(&mut self) -> Result<Capture<Active>, BackendError> {
        Ok(self.take()?.open()?)
    }

    fn release(&mut self) {
        // Dropping an inactive capture calls pcap_close.
        self.capture = None;
    }
}

fn c_int(value: u32) -> Result<i32, BackendError> {
    i32::try_from(value).map_err(|_| BackendError::new(format!("{value} exceeds {}", i32::MAX)))
}

/// libpcap reads a timeout of zero as "wait forever".
fn timeout_ms(timeout: Option<Duration>) -> Result<i32, BackendError> {
    match timeout {
        None => Ok(0),
        Some(t) => i32::try_from(t.as_millis())
            .map_err(|_| BackendError::new(format!("{}ms exceeds {}", t.as_millis(), i32::MAX))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_int_accepts_zero_and_max() {
        assert_eq!(c_int(0), Ok(0));
        assert_eq!(c_int(i32::MAX as u32), Ok(i32::MAX));
    }

    #[test]
    fn c_int_rejects_overflow() {
        let err = c_int(u32::MAX).unwrap_err();
        assert_eq!(err.to_string(), "4294967295 exceeds 2147483647");
    }

    #[test]
    fn block_forever_is_zero_timeout() {
        assert_eq!(timeout_ms(None), Ok(0));
        assert_eq!(timeout_ms(Some(Duration::from_millis(1500))), Ok(1500));
    }

    #[test]
    fn spent_session_refuses_configuration() {
        let mut session = PcapSession { capture: None };
        assert!(session.configure(SessionOption::Promiscuous(true)).is_err());
        assert!(session.activate().is_err());
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::{thread, time};

use log::{error, info, warn};
use taphandle::CaptureHandle;

use crate::cli::CliArgs;
use crate::core::summary::CaptureStats;

/// Opens the export file named on the command line, if any. A file that
/// cannot be created is logged and the capture continues without it.
pub fn setup_savefile(args: &CliArgs, cap: &CaptureHandle) -> Option<pcap::Savefile> {
    let filename = args.export.as_deref().filter(|f| !f.is_empty())?;

    match cap.savefile(filename) {
        Ok(sf) => {
            info!("exporting frames to {}", filename);
            Some(sf)
        }
        Err(e) => {
            error!("failed to create savefile {}: {}", filename, e);
            None
        }
    }
}

/// Consecutive read failures tolerated before the loop gives up.
pub const MAX_CONSECUTIVE_ERRORS: u32 = 5;

/// Decides whether a failed read ends the capture.
#[derive(Debug, Default)]
pub struct ErrorBudget {
    consecutive: u32,
}

impl ErrorBudget {
    pub fn frame_read(&mut self) {
        self.consecutive = 0;
    }

    /// Returns `false` once the capture should stop.
    pub fn allows(&mut self, err: &pcap::Error) -> bool {
        match err {
            pcap::Error::TimeoutExpired => true,
            pcap::Error::NoMorePackets => false,
            _ => {
                self.consecutive += 1;
                self.consecutive < MAX_CONSECUTIVE_ERRORS
            }
        }
    }
}

/// Reads frames until `running` is cleared, `limit` frames were seen or
/// reads keep failing.
pub fn run_packet_loop(
    running: &AtomicBool,
    cap: &mut CaptureHandle,
    savefile: &mut Option<pcap::Savefile>,
    limit: Option<u64>,
) -> CaptureStats {
    let mut stats = CaptureStats::default();
    let mut budget = ErrorBudget::default();

    while running.load(Ordering::SeqCst) && !stats.reached(limit) {
        match cap.next_packet() {
            Ok(packet) => {
                budget.frame_read();
                stats.record(packet.header.caplen, packet.header.len);
                if let Some(sf) = savefile.as_mut() {
                    sf.write(&packet);
                }
            }
            Err(pcap::Error::TimeoutExpired) => {
                thread::yield_now();
            }
            Err(e) if !budget.allows(&e) => {
                error!("stopping capture: {}", e);
                break;
            }
            Err(e) => {
                warn!("capture error: {}", e);
                thread::sleep(time::Duration::from_millis(10));
            }
        }
    }

    if let Some(sf) = savefile.as_mut() {
        if let Err(e) = sf.flush() {
            error!("failed to flush savefile: {}", e);
        }
    }

    stats
}

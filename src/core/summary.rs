use std::fmt::Write as _;
use std::io::{self, Write};

/// Running totals for the read loop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames: u64,
    /// Bytes actually captured, capped per frame by the snapshot length.
    pub captured_bytes: u64,
    /// Bytes the frames had on the wire.
    pub wire_bytes: u64,
}

impl CaptureStats {
    pub fn record(&mut self, caplen: u32, len: u32) {
        self.frames += 1;
        self.captured_bytes += u64::from(caplen);
        self.wire_bytes += u64::from(len);
    }

    pub fn reached(&self, limit: Option<u64>) -> bool {
        limit.is_some_and(|n| self.frames >= n)
    }
}

/// libpcap's own counters for the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCounters {
    pub received: u32,
    pub dropped: u32,
    pub if_dropped: u32,
}

impl From<pcap::Stat> for BackendCounters {
    fn from(stat: pcap::Stat) -> Self {
        Self {
            received: stat.received,
            dropped: stat.dropped,
            if_dropped: stat.if_dropped,
        }
    }
}

/// Renders the end-of-run summary. `backend` is absent when the platform
/// does not report counters.
pub fn format_summary(stats: &CaptureStats, backend: Option<&BackendCounters>) -> String {
    let mut out = String::from("Capture summary:\n");

    if stats.frames == 0 {
        out.push_str("  No frames captured\n");
    } else {
        let _ = writeln!(out, "  frames:         {}", stats.frames);
        let _ = writeln!(out, "  captured bytes: {}", stats.captured_bytes);
        let _ = writeln!(out, "  wire bytes:     {}", stats.wire_bytes);
    }

    if let Some(s) = backend {
        let _ = writeln!(
            out,
            "  libpcap: {} received, {} dropped, {} dropped by interface",
            s.received, s.dropped, s.if_dropped
        );
    }

    out
}

/// Prints the summary of the finished capture.
pub fn print_capture_summary(stats: &CaptureStats, backend: Option<&BackendCounters>) {
    println!("\n{}", format_summary(stats, backend).trim_end());
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_lengths() {
        let mut stats = CaptureStats::default();
        stats.record(60, 60);
        stats.record(1514, 9000);
        assert_eq!(
            stats,
            CaptureStats {
                frames: 2,
                captured_bytes: 1574,
                wire_bytes: 9060,
            }
        );
    }

    #[test]
    fn limit_is_reached_at_count() {
        let mut stats = CaptureStats::default();
        assert!(!stats.reached(None));
        assert!(!stats.reached(Some(1)));
        stats.record(10, 10);
        assert!(stats.reached(Some(1)));
        assert!(!stats.reached(None));
    }

    #[test]
    fn empty_capture_says_so() {
        let summary = format_summary(&CaptureStats::default(), None);
        assert!(summary.contains("No frames captured"));
        assert!(!summary.contains("libpcap"));
    }

    #[test]
    fn summary_includes_backend_counters() {
        let mut stats = CaptureStats::default();
        stats.record(100, 150);
        let counters = BackendCounters {
            received: 7,
            dropped: 2,
            if_dropped: 1,
        };
        let summary = format_summary(&stats, Some(&counters));
        assert!(summary.contains("frames:         1"));
        assert!(summary.contains("wire bytes:     150"));
        assert!(summary.contains("7 received, 2 dropped, 1 dropped by interface"));
    }
}

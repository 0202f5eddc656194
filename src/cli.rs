use clap::Parser;

/// 4 MiB kernel receive buffer.
pub const DEFAULT_BUFFER_SIZE: u32 = 4 * 1024 * 1024;

/// Taphandle - open a live capture on a network interface
#[derive(Parser, Debug)]
#[command(name = "taphandle", about = "Open a live packet capture on a network interface")]
pub struct CliArgs {
    /// OS name of the interface to capture on (e.g. eth0, "Ethernet 2").
    #[arg(short, long, value_name = "NAME")]
    pub interface: String,

    /// Kernel receive buffer size in bytes.
    #[arg(short, long, value_name = "BYTES", default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: u32,

    /// Stop after this many frames.
    #[arg(short, long, value_name = "N")]
    pub count: Option<u64>,

    /// Write captured frames to a PCAP file.
    #[arg(long, value_name = "FILE")]
    pub export: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_is_required() {
        assert!(CliArgs::try_parse_from(["taphandle"]).is_err());
    }

    #[test]
    fn buffer_size_defaults_to_four_mib() {
        let args = CliArgs::try_parse_from(["taphandle", "-i", "eth0"]).unwrap();
        assert_eq!(args.interface, "eth0");
        assert_eq!(args.buffer_size, 4_194_304);
        assert_eq!(args.count, None);
        assert_eq!(args.export, None);
    }

    #[test]
    fn parses_all_flags() {
        let args = CliArgs::try_parse_from([
            "taphandle",
            "--interface",
            "Ethernet 2",
            "--buffer-size",
            "0",
            "--count",
            "10",
            "--export",
            "out.pcap",
        ])
        .unwrap();
        assert_eq!(args.interface, "Ethernet 2");
        assert_eq!(args.buffer_size, 0);
        assert_eq!(args.count, Some(10));
        assert_eq!(args.export.as_deref(), Some("out.pcap"));
    }
}

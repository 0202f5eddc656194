use log::info;
use taphandle::interface::{InterfaceInspector, SystemInterfaces};
use taphandle::capture::open_handle;
use taphandle::{CaptureConfig, CaptureHandle, Result};

use crate::cli::CliArgs;

/// Looks the interface up in the OS tables and builds its capture config.
pub fn capture_config(args: &CliArgs, interfaces: &impl InterfaceInspector) -> Result<CaptureConfig> {
    let interface = interfaces.find(&args.interface)?;
    Ok(CaptureConfig::new(interface, args.buffer_size))
}

/// Opens the live capture for the interface named on the command line.
pub fn initialize_capture(args: &CliArgs) -> Result<CaptureHandle> {
    let config = capture_config(args, &SystemInterfaces)?;
    info!(
        "opening {} (index {}, MAC {})",
        config.interface.name,
        config.interface.index,
        config.interface.hardware_addr_string()
    );
    open_handle(&config)
}

mod cli;
mod core;

use clap::Parser;
use log::{error, info};
use std::{
    process,
    sync::{atomic::AtomicBool, Arc},
};

use crate::cli::CliArgs;
use crate::core::capture_loop::initialize_capture;
use crate::core::runner::{run_packet_loop, setup_savefile};
use crate::core::signal::setup_ctrlc_handler;
use crate::core::summary::{print_capture_summary, BackendCounters};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();

    // Shared shutdown flag
    let running = Arc::new(AtomicBool::new(true));
    if let Err(e) = setup_ctrlc_handler(Arc::clone(&running)) {
        error!("failed to set Ctrl+C handler: {}", e);
        process::exit(1);
    }

    let mut cap = match initialize_capture(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let mut savefile = setup_savefile(&args, &cap);

    info!("capturing on {}, press Ctrl+C to stop", args.interface);
    let stats = run_packet_loop(&running, &mut cap, &mut savefile, args.count);

    let counters = cap.stats().ok().map(BackendCounters::from);
    print_capture_summary(&stats, counters.as_ref());
}

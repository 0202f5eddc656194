use std::process;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Sets up a Ctrl+C handler that clears the shared `running` flag.
///
/// A block-forever handle only notices the flag once the next frame
/// arrives, so a second Ctrl+C exits straight away.
pub fn setup_ctrlc_handler(running_flag: Arc<AtomicBool>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if !running_flag.swap(false, Ordering::SeqCst) {
            process::exit(130);
        }
    })
}

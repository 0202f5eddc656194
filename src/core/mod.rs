pub mod capture_loop;
pub mod runner;
pub mod signal;
pub mod summary;

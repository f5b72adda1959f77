//! # User Interface
//!
//! Colored, timestamped terminal output.

pub mod log;

pub use log::{debug, error, group, header, info, print_logo, success, warn, Log};

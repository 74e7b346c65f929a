//! Utility modules
//!
//! Formatting helpers shared by the measurement engine and the CLI.

pub mod units;

pub use units::{format_bandwidth, format_bytes, scale_bandwidth, SIZE_PREFIXES};

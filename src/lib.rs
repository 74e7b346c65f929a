//! rdbench - read benchmark
//!
//! Measures raw file read bandwidth and IOPS under sequential and random
//! access patterns, optionally against a memory-backed transient volume
//! to take the persistent media out of the measurement.

use std::fmt;

// Public re-exports
pub mod bench;
pub mod config;
pub mod io;
pub mod models;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum RdBenchError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// Transient volume provisioning or teardown failure
    VolumeError(String),
    /// Measurement execution error
    MeasurementError(String),
}

impl fmt::Display for RdBenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdBenchError::IoError(err) => write!(f, "I/O error: {}", err),
            RdBenchError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            RdBenchError::VolumeError(msg) => write!(f, "Transient volume error: {}", msg),
            RdBenchError::MeasurementError(msg) => write!(f, "Measurement error: {}", msg),
        }
    }
}

impl std::error::Error for RdBenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RdBenchError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RdBenchError {
    fn from(err: std::io::Error) -> Self {
        RdBenchError::IoError(err)
    }
}

impl From<serde_json::Error> for RdBenchError {
    fn from(err: serde_json::Error) -> Self {
        RdBenchError::ConfigError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for RdBenchError {
    fn from(err: toml::de::Error) -> Self {
        RdBenchError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for RdBenchError {
    fn from(err: toml::ser::Error) -> Self {
        RdBenchError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

impl RdBenchError {
    /// Configuration errors abort only the affected measurement call;
    /// every other variant is fatal to the run.
    pub fn is_config(&self) -> bool {
        matches!(self, RdBenchError::ConfigError(_))
    }
}

/// Result type alias for rdbench operations
pub type Result<T> = std::result::Result<T, RdBenchError>;

// Common constants
pub const APP_NAME: &str = "rdbench";
pub const CONFIG_FILE: &str = "rdbench.toml";
pub const DEFAULT_TEST_FILE: &str = "test_file";
pub const DEFAULT_TARGET_DIR: &str = "/tmp/rdbench";
pub const DEFAULT_RAMDISK_PATH: &str = "/mnt/rdbench-ramdisk";
pub const DEFAULT_VOLUME_CAPACITY: u64 = 2048 * 1024 * 1024;
pub const DEFAULT_BLOCK_SIZE: u64 = 1024;
pub const DEFAULT_LOOPS: u32 = 1;
pub const DEFAULT_ROUNDING: usize = 2;

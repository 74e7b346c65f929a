//! Run report data models
//!
//! Structures for recording a run's configuration and the trial results
//! of each dispatched measurement, serializable for the optional JSON
//! report output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Mode, RunConfig};
use crate::Result;

/// Trial results for one measurement: one entry per loop per target file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialSeries {
    /// Mean per-operation throughput, bytes per second.
    Bandwidth(Vec<f64>),
    /// Whole-pass operation rate, operations per second.
    Iops(Vec<u64>),
}

impl TrialSeries {
    pub fn len(&self) -> usize {
        match self {
            TrialSeries::Bandwidth(trials) => trials.len(),
            TrialSeries::Iops(trials) => trials.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One dispatched measurement and its trials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub mode: Mode,
    pub files: Vec<PathBuf>,
    pub series: TrialSeries,
}

/// Complete record of one benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Timestamp when the run started
    pub timestamp: DateTime<Utc>,
    /// Configuration used for this run
    pub config: RunConfig,
    /// Measurements that produced results, in dispatch order; skipped
    /// measurements leave no entry
    pub measurements: Vec<Measurement>,
}

impl RunReport {
    pub fn new(config: RunConfig) -> Self {
        Self {
            timestamp: Utc::now(),
            config,
            measurements: Vec::new(),
        }
    }

    pub fn push(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get a human-readable one-line summary of the run
    pub fn summary(&self) -> String {
        format!(
            "{} - {} measurement(s), block size {}, {} loop(s)",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.measurements.len(),
            self.config.block_size,
            self.config.loops
        )
    }
}

//! Timed read passes
//!
//! Drives one descriptor through an offset plan, either timing every
//! operation individually (bandwidth) or timing the pass as a whole
//! (IOPS). A fresh descriptor is opened per pass and closed when the
//! pass ends; nothing is shared across loop iterations.

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::bench::pattern::OffsetPlan;
use crate::io::flags::ReadFlags;
use crate::Result;

/// Offsets between progress heartbeats within one pass.
const PROGRESS_INTERVAL: usize = 100_000;

/// Performs timed reads against a target file with a resolved read-mode
/// flag set
#[derive(Debug, Clone, Copy)]
pub struct TimedReader {
    flags: ReadFlags,
}

impl TimedReader {
    pub fn new(flags: ReadFlags) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> ReadFlags {
        self.flags
    }

    /// Run one bandwidth pass over the plan.
    ///
    /// Each operation seeks to its offset and reads one block; the
    /// per-operation throughput sample is the bytes actually read over
    /// the elapsed wall time. A read that returns zero bytes means the
    /// file ended before the plan did (offsets computed from a stale
    /// size); the pass stops early and returns what it collected.
    pub fn bandwidth_pass(&self, path: &Path, plan: &OffsetPlan) -> Result<Vec<f64>> {
        let mut file = self.flags.open(path)?;
        let mut buffer = vec![0u8; plan.block_size as usize];
        let mut samples = Vec::with_capacity(plan.len());

        for (i, &offset) in plan.offsets.iter().enumerate() {
            if (i + 1) % PROGRESS_INTERVAL == 0 {
                debug!("offset {}/{}", i + 1, plan.len());
            }

            let start = Instant::now();
            file.seek(SeekFrom::Start(offset))?;
            let read = file.read(&mut buffer)?;
            let elapsed = start.elapsed();

            if read == 0 {
                warn!(
                    "read at offset {} returned no data, ending pass after {} of {} operations",
                    offset,
                    i,
                    plan.len()
                );
                break;
            }

            samples.push(read as f64 / elapsed.as_secs_f64());
        }

        Ok(samples)
    }

    /// Run one IOPS pass over the plan.
    ///
    /// Counts completed operations and times the pass as a whole. Stops
    /// early on a zero-byte read like the bandwidth pass.
    pub fn counted_pass(&self, path: &Path, plan: &OffsetPlan) -> Result<(u64, Duration)> {
        let mut file = self.flags.open(path)?;
        let mut buffer = vec![0u8; plan.block_size as usize];
        let mut operations = 0u64;

        let start = Instant::now();
        for (i, &offset) in plan.offsets.iter().enumerate() {
            if (i + 1) % PROGRESS_INTERVAL == 0 {
                debug!("offset {}/{}", i + 1, plan.len());
            }

            file.seek(SeekFrom::Start(offset))?;
            let read = file.read(&mut buffer)?;

            if read == 0 {
                warn!(
                    "read at offset {} returned no data, ending pass after {} of {} operations",
                    offset,
                    i,
                    plan.len()
                );
                break;
            }

            operations += 1;
        }
        let elapsed = start.elapsed();

        Ok((operations, elapsed))
    }
}

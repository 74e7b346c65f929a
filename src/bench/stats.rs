//! Trial aggregation
//!
//! Reduces one loop's worth of measurements into a single trial figure.
//! Bandwidth and IOPS aggregate differently on purpose: bandwidth is the
//! arithmetic mean of per-operation throughput samples, IOPS divides one
//! total count by one total duration. The two produce different numbers
//! under non-uniform per-operation latency and must not be unified.

use std::time::Duration;

use crate::{RdBenchError, Result};

/// Arithmetic mean of per-operation throughput samples, in bytes per
/// second
///
/// An empty sample set means the file yielded no complete read (empty or
/// shorter than one block) and is reported as a configuration error
/// rather than a zero or a NaN.
pub fn mean_bandwidth(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(RdBenchError::ConfigError(
            "no throughput samples collected; is the target file shorter than one block?"
                .to_string(),
        ));
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Completed operations over total wall-clock time, rounded to the
/// nearest whole operation per second
pub fn iops_rate(operations: u64, elapsed: Duration) -> u64 {
    if elapsed.is_zero() {
        return 0;
    }
    (operations as f64 / elapsed.as_secs_f64()).round() as u64
}

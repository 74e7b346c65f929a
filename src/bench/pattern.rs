//! Offset plan generation
//!
//! Produces the ordered or shuffled byte offsets a measurement pass
//! visits. Bandwidth and IOPS passes use deliberately different offset
//! strategies; see `bandwidth_plan` and `iops_plan`.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{RdBenchError, Result};

/// Offset-selection strategy for a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPattern {
    /// Visit the file front to back.
    Sequential,
    /// Visit offsets in a uniformly shuffled order.
    Random,
}

impl AccessPattern {
    /// Parse a pattern name.
    ///
    /// Unknown names are configuration errors and abort only the
    /// measurement that requested them.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "sequential" => Ok(AccessPattern::Sequential),
            "random" => Ok(AccessPattern::Random),
            other => Err(RdBenchError::ConfigError(format!(
                "unsupported read pattern '{}'",
                other
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AccessPattern::Sequential => "sequential",
            AccessPattern::Random => "random",
        }
    }
}

/// The offsets one measurement pass visits, with the effective block size
/// to read at each of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPlan {
    pub offsets: Vec<u64>,
    pub block_size: u64,
}

impl OffsetPlan {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Build the offset plan for one bandwidth pass
///
/// Sequential reads the whole file in a single operation: one offset at
/// zero with the block widened to the full file size. Random covers every
/// complete block exactly once, in a fresh uniform shuffle; callers
/// regenerate the plan each loop so no two loops share an order.
pub fn bandwidth_plan(
    pattern: AccessPattern,
    file_size: u64,
    block_size: u64,
) -> Result<OffsetPlan> {
    if block_size == 0 {
        return Err(RdBenchError::ConfigError(
            "block size must be greater than 0".to_string(),
        ));
    }

    match pattern {
        AccessPattern::Sequential => Ok(OffsetPlan {
            offsets: vec![0],
            block_size: file_size,
        }),
        AccessPattern::Random => {
            let block_count = file_size / block_size;
            let mut offsets: Vec<u64> = (0..block_count).map(|i| i * block_size).collect();
            offsets.shuffle(&mut SmallRng::from_entropy());
            Ok(OffsetPlan {
                offsets,
                block_size,
            })
        }
    }
}

/// Build the offset plan for one IOPS pass
///
/// The pass performs exactly `op_count` operations. Sequential repeats
/// offset zero for the whole budget. Random divides the addressable range
/// into `op_count` strides and shuffles the stride starts, which is a
/// coarser placement than the bandwidth plan's block-aligned offsets.
pub fn iops_plan(
    pattern: AccessPattern,
    file_size: u64,
    block_size: u64,
    op_count: u64,
) -> Result<OffsetPlan> {
    if block_size == 0 {
        return Err(RdBenchError::ConfigError(
            "block size must be greater than 0".to_string(),
        ));
    }
    if op_count == 0 {
        return Err(RdBenchError::ConfigError(
            "operation count must be at least 1".to_string(),
        ));
    }

    match pattern {
        AccessPattern::Sequential => Ok(OffsetPlan {
            offsets: vec![0; op_count as usize],
            block_size,
        }),
        AccessPattern::Random => {
            let stride = file_size / op_count;
            if stride == 0 {
                return Err(RdBenchError::ConfigError(format!(
                    "operation budget {} exceeds the addressable range of {} bytes",
                    op_count, file_size
                )));
            }
            let mut offsets: Vec<u64> = (0..op_count).map(|i| i * stride).collect();
            offsets.shuffle(&mut SmallRng::from_entropy());
            Ok(OffsetPlan {
                offsets,
                block_size,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pattern_names_round_trip() {
        assert_eq!(
            AccessPattern::from_name("sequential").unwrap(),
            AccessPattern::Sequential
        );
        assert_eq!(
            AccessPattern::from_name("random").unwrap(),
            AccessPattern::Random
        );
    }

    #[test]
    fn test_unknown_pattern_is_config_error() {
        let err = AccessPattern::from_name("diagonal").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("diagonal"));
    }

    #[test]
    fn test_random_bandwidth_plan_covers_every_block_once() {
        let plan = bandwidth_plan(AccessPattern::Random, 1_048_576, 4096).unwrap();
        assert_eq!(plan.len(), 256);
        assert_eq!(plan.block_size, 4096);

        let distinct: HashSet<u64> = plan.offsets.iter().copied().collect();
        assert_eq!(distinct.len(), 256);
        for &offset in &plan.offsets {
            assert_eq!(offset % 4096, 0);
            assert!(offset < 1_048_576);
        }
    }

    #[test]
    fn test_random_bandwidth_plan_ignores_trailing_partial_block() {
        let plan = bandwidth_plan(AccessPattern::Random, 10_000, 4096).unwrap();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_sequential_bandwidth_plan_is_one_whole_file_read() {
        let plan = bandwidth_plan(AccessPattern::Sequential, 1_048_576, 4096).unwrap();
        assert_eq!(plan.offsets, vec![0]);
        assert_eq!(plan.block_size, 1_048_576);
    }

    #[test]
    fn test_empty_file_random_plan_has_no_offsets() {
        let plan = bandwidth_plan(AccessPattern::Random, 0, 4096).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_zero_block_size_is_config_error() {
        assert!(bandwidth_plan(AccessPattern::Random, 1024, 0)
            .unwrap_err()
            .is_config());
        assert!(iops_plan(AccessPattern::Random, 1024, 0, 8)
            .unwrap_err()
            .is_config());
    }

    #[test]
    fn test_sequential_iops_plan_repeats_offset_zero() {
        let plan = iops_plan(AccessPattern::Sequential, 1_048_576, 512, 100).unwrap();
        assert_eq!(plan.len(), 100);
        assert!(plan.offsets.iter().all(|&o| o == 0));
        assert_eq!(plan.block_size, 512);
    }

    #[test]
    fn test_random_iops_plan_honors_operation_budget() {
        let plan = iops_plan(AccessPattern::Random, 1_048_576, 512, 64).unwrap();
        assert_eq!(plan.len(), 64);

        let stride = 1_048_576 / 64;
        let distinct: HashSet<u64> = plan.offsets.iter().copied().collect();
        assert_eq!(distinct.len(), 64);
        for &offset in &plan.offsets {
            assert_eq!(offset % stride, 0);
            assert!(offset < 1_048_576);
        }
    }

    #[test]
    fn test_iops_budget_larger_than_range_is_config_error() {
        let err = iops_plan(AccessPattern::Random, 100, 512, 1000).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_zero_operation_count_is_config_error() {
        let err = iops_plan(AccessPattern::Sequential, 1024, 512, 0).unwrap_err();
        assert!(err.is_config());
    }
}

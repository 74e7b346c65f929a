//! Run configuration and mode selection
//!
//! Holds the parameters of one benchmark run and the explicit set of
//! requested measurement modes. A run's configuration is immutable once
//! the run starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{
    RdBenchError, Result, DEFAULT_BLOCK_SIZE, DEFAULT_LOOPS, DEFAULT_RAMDISK_PATH,
    DEFAULT_ROUNDING, DEFAULT_TARGET_DIR, DEFAULT_TEST_FILE, DEFAULT_VOLUME_CAPACITY,
};

pub mod persistence;

/// A single measurement kind; names are the exact CLI selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Random-pattern read bandwidth
    ReadRand,
    /// Sequential-pattern read bandwidth
    ReadSeq,
    /// Random-pattern IOPS
    IopsRand,
    /// Sequential-pattern IOPS
    IopsSeq,
}

impl Mode {
    /// Every mode, in the canonical execution order `all` expands to.
    pub const ALL: [Mode; 4] = [Mode::ReadRand, Mode::ReadSeq, Mode::IopsRand, Mode::IopsSeq];

    pub fn name(self) -> &'static str {
        match self {
            Mode::ReadRand => "readrand",
            Mode::ReadSeq => "readseq",
            Mode::IopsRand => "iopsrand",
            Mode::IopsSeq => "iopsseq",
        }
    }

    /// Parse a single mode selector. `all` is handled by [`ModeSet`].
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "readrand" => Ok(Mode::ReadRand),
            "readseq" => Ok(Mode::ReadSeq),
            "iopsrand" => Ok(Mode::IopsRand),
            "iopsseq" => Ok(Mode::IopsSeq),
            other => Err(RdBenchError::ConfigError(format!(
                "unsupported mode '{}' (expected readrand, readseq, iopsrand, iopsseq or all)",
                other
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered, deduplicated set of requested measurement modes
///
/// Modes run in the order they were requested. The `all` selector
/// expands to the four modes in canonical order; matching is exact, so
/// no selector can shadow another by substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSet {
    modes: Vec<Mode>,
}

impl ModeSet {
    /// All four modes in canonical order.
    pub fn all() -> Self {
        Self {
            modes: Mode::ALL.to_vec(),
        }
    }

    /// Parse a list of selectors, expanding `all` and collapsing
    /// duplicates while preserving first-seen order.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(RdBenchError::ConfigError(
                "at least one mode must be selected".to_string(),
            ));
        }

        fn push_unique(mode: Mode, modes: &mut Vec<Mode>) {
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }

        let mut modes = Vec::new();
        for name in names {
            match name.as_ref() {
                "all" => {
                    for mode in Mode::ALL {
                        push_unique(mode, &mut modes);
                    }
                }
                other => push_unique(Mode::from_name(other)?, &mut modes),
            }
        }

        Ok(Self { modes })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mode> {
        self.modes.iter()
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl Default for ModeSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Parameters of one benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Target files; relative paths resolve against the active target
    /// directory
    pub files: Vec<PathBuf>,
    /// Block size for timed reads (bytes)
    pub block_size: u64,
    /// Number of trial loops per measurement
    pub loops: u32,
    /// Operation budget for IOPS passes; defaults to one operation per
    /// complete block when unset
    pub op_count: Option<u64>,
    /// Measurements to run, in order
    pub modes: ModeSet,
    /// Provision a transient volume and run against it
    pub use_volume: bool,
    /// Mount point for the transient volume
    pub volume_path: PathBuf,
    /// Transient volume capacity (bytes)
    pub volume_capacity: u64,
    /// Scratch directory used when no volume is requested
    pub target_dir: PathBuf,
    /// Decimal digits in bandwidth summaries
    pub rounding: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            files: vec![PathBuf::from(DEFAULT_TEST_FILE)],
            block_size: DEFAULT_BLOCK_SIZE,
            loops: DEFAULT_LOOPS,
            op_count: None,
            modes: ModeSet::all(),
            use_volume: false,
            volume_path: PathBuf::from(DEFAULT_RAMDISK_PATH),
            volume_capacity: DEFAULT_VOLUME_CAPACITY,
            target_dir: PathBuf::from(DEFAULT_TARGET_DIR),
            rounding: DEFAULT_ROUNDING,
        }
    }
}

impl RunConfig {
    /// Create a new run configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_loops(mut self, loops: u32) -> Self {
        self.loops = loops;
        self
    }

    pub fn with_modes(mut self, modes: ModeSet) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_volume(mut self, use_volume: bool) -> Self {
        self.use_volume = use_volume;
        self
    }

    pub fn with_target_dir(mut self, target_dir: impl Into<PathBuf>) -> Self {
        self.target_dir = target_dir.into();
        self
    }

    pub fn with_op_count(mut self, op_count: u64) -> Self {
        self.op_count = Some(op_count);
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(RdBenchError::ConfigError(
                "at least one target file is required".to_string(),
            ));
        }

        if self.block_size == 0 {
            return Err(RdBenchError::ConfigError(
                "block size must be greater than 0".to_string(),
            ));
        }

        if self.loops == 0 {
            return Err(RdBenchError::ConfigError(
                "loop count must be at least 1".to_string(),
            ));
        }

        if self.op_count == Some(0) {
            return Err(RdBenchError::ConfigError(
                "operation count must be at least 1".to_string(),
            ));
        }

        if self.modes.is_empty() {
            return Err(RdBenchError::ConfigError(
                "at least one mode must be selected".to_string(),
            ));
        }

        if self.use_volume && self.volume_capacity == 0 {
            return Err(RdBenchError::ConfigError(
                "transient volume capacity must be greater than 0".to_string(),
            ));
        }

        // More digits than an f64 carries is a typo, not a preference.
        if self.rounding > 9 {
            return Err(RdBenchError::ConfigError(format!(
                "rounding of {} decimal digits is out of range (max 9)",
                self.rounding
            )));
        }

        Ok(())
    }

    /// Resolve the configured target files against the active target
    /// directory. Absolute paths are used as-is.
    pub fn resolved_targets(&self, target_dir: &Path) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|file| {
                if file.is_absolute() {
                    file.clone()
                } else {
                    target_dir.join(file)
                }
            })
            .collect()
    }
}

//! Benchmark run orchestration
//!
//! Owns the whole run: provisions the target storage, dispatches the
//! requested measurements over it, and guarantees teardown on every exit
//! path. The run moves through
//! `Idle -> VolumeProvisioning -> Measuring -> VolumeTeardown -> Idle`,
//! with the volume states skipped when no transient volume is requested.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::bench::pattern::{self, AccessPattern};
use crate::bench::reader::TimedReader;
use crate::bench::stats;
use crate::config::{Mode, RunConfig};
use crate::io::flags::ReadFlags;
use crate::io::ramdisk::TransientVolume;
use crate::models::result::{Measurement, RunReport, TrialSeries};
use crate::util::units;
use crate::Result;

/// Lifecycle states of a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    VolumeProvisioning,
    Measuring,
    VolumeTeardown,
}

/// Target storage for a run: a transient volume or a plain scratch
/// directory
enum TargetStorage {
    Volume(TransientVolume),
    Scratch { path: PathBuf, created: bool },
}

impl TargetStorage {
    fn path(&self) -> &Path {
        match self {
            TargetStorage::Volume(volume) => volume.path(),
            TargetStorage::Scratch { path, .. } => path,
        }
    }
}

/// Drives one benchmark run to completion
pub struct Orchestrator {
    config: RunConfig,
    reader: TimedReader,
    state: RunState,
}

impl Orchestrator {
    /// Create an orchestrator for a validated configuration and a
    /// resolved read-mode flag set.
    pub fn new(config: RunConfig, flags: ReadFlags) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reader: TimedReader::new(flags),
            state: RunState::Idle,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute the configured run.
    ///
    /// Teardown runs once measuring completes or aborts, mirroring
    /// provisioning. A measurement error never skips the release of the
    /// volume or scratch directory.
    pub fn run(&mut self) -> Result<RunReport> {
        let storage = self.provision()?;

        self.state = RunState::Measuring;
        let outcome = self.measure(storage.path());

        self.state = RunState::VolumeTeardown;
        let teardown = Self::teardown(storage);
        self.state = RunState::Idle;

        match (outcome, teardown) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(teardown_err)) => {
                error!(
                    "teardown failed after a measurement error: {}",
                    teardown_err
                );
                Err(err)
            }
        }
    }

    /// Measure read bandwidth for each target file.
    ///
    /// Returns one trial per loop per file, each the mean of that loop's
    /// per-operation throughput samples. Random plans are regenerated
    /// (re-shuffled) every loop.
    pub fn read_bandwidth(&self, files: &[PathBuf], pattern_name: &str) -> Result<Vec<f64>> {
        let pattern = AccessPattern::from_name(pattern_name)?;
        let mut trials = Vec::new();

        for file in files {
            info!(
                "performing {} read benchmark on file {}",
                pattern.name(),
                file.display()
            );
            let file_size = fs::metadata(file)?.len();

            for loop_index in 0..self.config.loops {
                debug!("starting loop {}", loop_index);
                let plan = pattern::bandwidth_plan(pattern, file_size, self.config.block_size)?;
                let samples = self.reader.bandwidth_pass(file, &plan)?;
                let trial = stats::mean_bandwidth(&samples)?;
                info!(
                    "measured bandwidth: {}",
                    units::format_bandwidth(trial, self.config.rounding)
                );
                trials.push(trial);
            }
        }

        Ok(trials)
    }

    /// Measure read IOPS for each target file.
    ///
    /// Returns one trial per loop per file, each the whole-pass operation
    /// count over the whole-pass elapsed time.
    pub fn read_iops(&self, files: &[PathBuf], pattern_name: &str) -> Result<Vec<u64>> {
        let pattern = AccessPattern::from_name(pattern_name)?;
        info!("performing {} IOPS measurement", pattern.name());
        let mut trials = Vec::new();

        for loop_index in 0..self.config.loops {
            debug!("starting loop {}", loop_index);
            for file in files {
                let file_size = fs::metadata(file)?.len();
                let op_count = self
                    .config
                    .op_count
                    .unwrap_or(file_size / self.config.block_size);
                let plan =
                    pattern::iops_plan(pattern, file_size, self.config.block_size, op_count)?;
                let (operations, elapsed) = self.reader.counted_pass(file, &plan)?;
                let trial = stats::iops_rate(operations, elapsed);
                info!("measured IOPS: {}", trial);
                trials.push(trial);
            }
        }

        Ok(trials)
    }

    fn provision(&mut self) -> Result<TargetStorage> {
        if self.config.use_volume {
            self.state = RunState::VolumeProvisioning;
            info!("creating ramdisk at {}", self.config.volume_path.display());
            let volume =
                TransientVolume::create(&self.config.volume_path, self.config.volume_capacity)?;
            info!(
                "ramdisk ready ({})",
                units::format_bytes(self.config.volume_capacity)
            );
            Ok(TargetStorage::Volume(volume))
        } else {
            let path = self.config.target_dir.clone();
            let created = if path.is_dir() {
                false
            } else {
                fs::create_dir_all(&path)?;
                true
            };
            Ok(TargetStorage::Scratch { path, created })
        }
    }

    fn measure(&self, target_dir: &Path) -> Result<RunReport> {
        let files = self.config.resolved_targets(target_dir);
        let mut report = RunReport::new(self.config.clone());

        for &mode in self.config.modes.iter() {
            let series = match mode {
                Mode::ReadRand => self
                    .read_bandwidth(&files, "random")
                    .map(TrialSeries::Bandwidth),
                Mode::ReadSeq => self
                    .read_bandwidth(&files, "sequential")
                    .map(TrialSeries::Bandwidth),
                Mode::IopsRand => self.read_iops(&files, "random").map(TrialSeries::Iops),
                Mode::IopsSeq => self.read_iops(&files, "sequential").map(TrialSeries::Iops),
            };

            match series {
                Ok(series) => report.push(Measurement {
                    mode,
                    files: files.clone(),
                    series,
                }),
                Err(err) if err.is_config() => {
                    error!("skipping {} measurement: {}", mode, err);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(report)
    }

    fn teardown(storage: TargetStorage) -> Result<()> {
        match storage {
            TargetStorage::Volume(mut volume) => {
                info!("unmounting ramdisk at {}", volume.path().display());
                volume.destroy()?;
                info!("ramdisk destroyed");
                Ok(())
            }
            TargetStorage::Scratch { path, created } => {
                if created && path.is_dir() {
                    fs::remove_dir_all(&path)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModeSet;
    use tempfile::tempdir;

    fn orchestrator(config: RunConfig) -> Orchestrator {
        Orchestrator::new(config, ReadFlags::buffered()).unwrap()
    }

    fn write_target(dir: &Path, size: usize) -> PathBuf {
        let path = dir.join("target.dat");
        fs::write(&path, vec![0x5Au8; size]).unwrap();
        path
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RunConfig::default().with_block_size(0);
        assert!(Orchestrator::new(config, ReadFlags::buffered()).is_err());
    }

    #[test]
    fn test_read_bandwidth_one_trial_per_loop() {
        let dir = tempdir().unwrap();
        let target = write_target(dir.path(), 64 * 1024);

        let config = RunConfig::default().with_block_size(4096).with_loops(3);
        let trials = orchestrator(config)
            .read_bandwidth(&[target], "random")
            .unwrap();

        assert_eq!(trials.len(), 3);
        assert!(trials.iter().all(|&t| t.is_finite() && t > 0.0));
    }

    #[test]
    fn test_read_bandwidth_unknown_pattern_yields_no_result() {
        let dir = tempdir().unwrap();
        let target = write_target(dir.path(), 4096);

        let err = orchestrator(RunConfig::default())
            .read_bandwidth(&[target], "diagonal")
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_read_bandwidth_empty_file_is_config_error() {
        let dir = tempdir().unwrap();
        let target = write_target(dir.path(), 0);

        let err = orchestrator(RunConfig::default())
            .read_bandwidth(&[target], "sequential")
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_read_iops_sequential_two_loops() {
        let dir = tempdir().unwrap();
        let target = write_target(dir.path(), 64 * 1024);

        let config = RunConfig::default().with_block_size(4096).with_loops(2);
        let trials = orchestrator(config)
            .read_iops(&[target], "sequential")
            .unwrap();

        assert_eq!(trials.len(), 2);
    }

    #[test]
    fn test_missing_target_file_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.dat");

        let err = orchestrator(RunConfig::default())
            .read_bandwidth(&[missing], "random")
            .unwrap_err();
        assert!(!err.is_config());
    }

    #[test]
    fn test_run_covers_all_modes_and_cleans_created_scratch_dir() {
        let parent = tempdir().unwrap();
        let scratch = parent.path().join("scratch");
        let data = parent.path().join("data.dat");
        fs::write(&data, vec![0u8; 64 * 1024]).unwrap();

        let config = RunConfig::default()
            .with_files(vec![data])
            .with_block_size(4096)
            .with_target_dir(&scratch);

        let mut orch = orchestrator(config);
        let report = orch.run().unwrap();

        assert_eq!(report.measurements.len(), 4);
        assert_eq!(orch.state(), RunState::Idle);
        // The run created the scratch directory, so the run removes it.
        assert!(!scratch.exists());
    }

    #[test]
    fn test_run_keeps_preexisting_scratch_dir() {
        let parent = tempdir().unwrap();
        let data = parent.path().join("data.dat");
        fs::write(&data, vec![0u8; 16 * 1024]).unwrap();

        let config = RunConfig::default()
            .with_files(vec![data])
            .with_block_size(4096)
            .with_modes(ModeSet::parse(&["readseq"]).unwrap())
            .with_target_dir(parent.path());

        let report = orchestrator(config).run().unwrap();
        assert_eq!(report.measurements.len(), 1);
        assert!(parent.path().exists());
    }

    #[test]
    fn test_run_continues_past_config_error_measurements() {
        // A file shorter than one block makes the random bandwidth plan
        // empty, which skips that measurement but not the rest.
        let parent = tempdir().unwrap();
        let data = parent.path().join("tiny.dat");
        fs::write(&data, vec![0u8; 100]).unwrap();

        let config = RunConfig::default()
            .with_files(vec![data])
            .with_block_size(4096)
            .with_op_count(10)
            .with_target_dir(parent.path());

        let report = orchestrator(config).run().unwrap();

        let modes: Vec<Mode> = report.measurements.iter().map(|m| m.mode).collect();
        assert_eq!(modes, vec![Mode::ReadSeq, Mode::IopsRand, Mode::IopsSeq]);
    }
}

//! End-to-end measurement scenarios against real files.
//!
//! All scenarios inject buffered read flags so they run without
//! direct-I/O alignment constraints or elevated privileges.

use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use rdbench::bench::{bandwidth_plan, AccessPattern, Orchestrator};
use rdbench::config::{Mode, ModeSet, RunConfig};
use rdbench::io::flags::ReadFlags;
use rdbench::models::TrialSeries;

fn write_file(path: &PathBuf, size: usize) {
    fs::write(path, vec![0xC3u8; size]).unwrap();
}

fn orchestrator(config: RunConfig) -> Orchestrator {
    Orchestrator::new(config, ReadFlags::buffered()).unwrap()
}

#[test]
fn one_mebibyte_file_with_4k_blocks_yields_256_random_offsets() {
    let plan = bandwidth_plan(AccessPattern::Random, 1_048_576, 4096).unwrap();
    assert_eq!(plan.len(), 256);

    let sequential = bandwidth_plan(AccessPattern::Sequential, 1_048_576, 4096).unwrap();
    assert_eq!(sequential.offsets, vec![0]);
    assert_eq!(sequential.block_size, 1_048_576);
}

#[test]
fn iopsseq_with_two_loops_produces_two_trials() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.dat");
    write_file(&target, 256 * 1024);

    let config = RunConfig::default().with_block_size(4096).with_loops(2);
    let trials = orchestrator(config)
        .read_iops(&[target], "sequential")
        .unwrap();

    assert_eq!(trials.len(), 2);
}

#[test]
fn unsupported_pattern_yields_no_result_without_a_fault() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.dat");
    write_file(&target, 16 * 1024);

    let orch = orchestrator(RunConfig::default());
    let err = orch
        .read_bandwidth(std::slice::from_ref(&target), "diagonal")
        .unwrap_err();
    assert!(err.is_config());

    let err = orch.read_iops(&[target], "diagonal").unwrap_err();
    assert!(err.is_config());
}

#[test]
fn bandwidth_loops_produce_one_trial_each() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.dat");
    write_file(&target, 128 * 1024);

    let config = RunConfig::default().with_block_size(4096).with_loops(4);
    let trials = orchestrator(config)
        .read_bandwidth(&[target], "random")
        .unwrap();

    assert_eq!(trials.len(), 4);
    assert!(trials.iter().all(|&t| t.is_finite() && t > 0.0));
}

#[test]
fn empty_target_file_is_a_configuration_error() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("empty.dat");
    write_file(&target, 0);

    let orch = orchestrator(RunConfig::default());
    let err = orch
        .read_bandwidth(&[target], "sequential")
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn multiple_target_files_stack_their_trials() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.dat");
    let second = dir.path().join("b.dat");
    write_file(&first, 32 * 1024);
    write_file(&second, 32 * 1024);

    let config = RunConfig::default().with_block_size(4096).with_loops(2);
    let trials = orchestrator(config)
        .read_bandwidth(&[first, second], "sequential")
        .unwrap();

    // Two loops for each of the two files.
    assert_eq!(trials.len(), 4);
}

#[test]
fn full_run_reports_every_requested_mode_in_order() {
    let parent = tempdir().unwrap();
    let scratch = parent.path().join("scratch");
    let data = parent.path().join("data.dat");
    write_file(&data, 128 * 1024);

    let config = RunConfig::default()
        .with_files(vec![data])
        .with_block_size(4096)
        .with_modes(ModeSet::parse(&["all"]).unwrap())
        .with_target_dir(&scratch);

    let report = orchestrator(config).run().unwrap();

    let modes: Vec<Mode> = report.measurements.iter().map(|m| m.mode).collect();
    assert_eq!(
        modes,
        vec![Mode::ReadRand, Mode::ReadSeq, Mode::IopsRand, Mode::IopsSeq]
    );

    for measurement in &report.measurements {
        match &measurement.series {
            TrialSeries::Bandwidth(trials) => assert_eq!(trials.len(), 1),
            TrialSeries::Iops(trials) => assert_eq!(trials.len(), 1),
        }
    }

    // The run created its scratch directory and removed it afterwards.
    assert!(!scratch.exists());
}

#[test]
fn relative_targets_resolve_against_the_scratch_directory() {
    let parent = tempdir().unwrap();
    let scratch = parent.path().join("scratch");
    fs::create_dir(&scratch).unwrap();
    let inside = scratch.join("test_file");
    write_file(&inside, 64 * 1024);

    let config = RunConfig::default()
        .with_files(vec![PathBuf::from("test_file")])
        .with_block_size(4096)
        .with_modes(ModeSet::parse(&["readseq"]).unwrap())
        .with_target_dir(&scratch);

    let report = orchestrator(config).run().unwrap();
    assert_eq!(report.measurements.len(), 1);
    assert_eq!(report.measurements[0].files, vec![inside]);

    // The scratch directory existed before the run, so it survives it.
    assert!(scratch.exists());
}

#[test]
fn fatal_errors_still_tear_down_created_scratch_directories() {
    let parent = tempdir().unwrap();
    let scratch = parent.path().join("scratch");

    // The default relative target does not exist inside the fresh
    // scratch directory, so every measurement fails on open.
    let config = RunConfig::default()
        .with_modes(ModeSet::parse(&["readrand"]).unwrap())
        .with_target_dir(&scratch);

    let err = orchestrator(config).run().unwrap_err();
    assert!(!err.is_config());
    assert!(!scratch.exists());
}

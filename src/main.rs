//! rdbench binary entry point
//!
//! Thin wrapper around the measurement engine: parses flags, overlays
//! them on the optional configuration file, resolves the read-mode flag
//! set for this host once, and hands the run to the orchestrator.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rdbench::bench::Orchestrator;
use rdbench::config::persistence::ConfigFile;
use rdbench::config::{ModeSet, RunConfig};
use rdbench::io::flags::resolve_read_flags;

/// Measure file access and read performance.
#[derive(Parser, Debug)]
#[command(name = "rdbench", version, about = "Measure file read bandwidth and IOPS")]
struct Args {
    /// Block size in bytes for timed reads
    #[arg(short = 'b', long)]
    blocksize: Option<u64>,

    /// Number of trial loops per measurement
    #[arg(short = 'l', long)]
    loops: Option<u32>,

    /// Target file (repeatable); relative paths resolve against the
    /// target directory
    #[arg(short = 'f', long = "file")]
    files: Vec<PathBuf>,

    /// Measurement to run (repeatable): readrand, readseq, iopsrand,
    /// iopsseq or all
    #[arg(short = 'm', long = "mode")]
    modes: Vec<String>,

    /// Provision a ramfs transient volume and run against it
    #[arg(long)]
    ramdisk: bool,

    /// Mount point for the transient volume
    #[arg(long)]
    ramdisk_path: Option<PathBuf>,

    /// Transient volume capacity in bytes
    #[arg(long)]
    capacity: Option<u64>,

    /// Scratch directory used when no ramdisk is requested
    #[arg(long)]
    target_dir: Option<PathBuf>,

    /// Operation budget for IOPS passes (default: file size / block size)
    #[arg(long)]
    ops: Option<u64>,

    /// Write the run report as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if let Err(err) = run(args) {
        error!("benchmark run failed: {}", err);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_config(args: &Args) -> rdbench::Result<RunConfig> {
    let mut config = RunConfig::default();
    if let Some(file) = ConfigFile::load()? {
        config = file.apply(config)?;
    }

    if let Some(block_size) = args.blocksize {
        config.block_size = block_size;
    }
    if let Some(loops) = args.loops {
        config.loops = loops;
    }
    if !args.files.is_empty() {
        config.files = args.files.clone();
    }
    if !args.modes.is_empty() {
        config.modes = ModeSet::parse(&args.modes)?;
    }
    if args.ramdisk {
        config.use_volume = true;
    }
    if let Some(path) = &args.ramdisk_path {
        config.volume_path = path.clone();
    }
    if let Some(capacity) = args.capacity {
        config.volume_capacity = capacity;
    }
    if let Some(target_dir) = &args.target_dir {
        config.target_dir = target_dir.clone();
    }
    if let Some(ops) = args.ops {
        config.op_count = Some(ops);
    }

    Ok(config)
}

fn run(args: Args) -> rdbench::Result<()> {
    let config = build_config(&args)?;
    info!(
        "performing benchmark with block size {} and {} run(s) of each kind",
        config.block_size, config.loops
    );

    let flags = resolve_read_flags(std::env::consts::OS);
    let mut orchestrator = Orchestrator::new(config, flags)?;
    let report = orchestrator.run()?;
    info!("{}", report.summary());

    if let Some(path) = &args.output {
        report.save_json(path)?;
        info!("report written to {}", path.display());
    }

    info!("done");
    Ok(())
}

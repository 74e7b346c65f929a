//! Transient volume lifecycle
//!
//! Mounts a memory-backed ramfs at a fixed path so measurements run
//! against volatile storage instead of the persistent media. The
//! orchestrator holds the volume for the run and releases it explicitly
//! on every exit path; `Drop` is only a backstop.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

use crate::{RdBenchError, Result};

/// Handle to a mounted memory-backed filesystem
///
/// Once constructed, the handle always refers to a valid mount path.
/// Destruction unmounts first and removes the directory only while the
/// path is still inspectable, so a failed unmount never leaves a
/// half-removed mount behind.
#[derive(Debug)]
pub struct TransientVolume {
    path: PathBuf,
    released: bool,
}

impl TransientVolume {
    /// Mount a ramfs of the given capacity at `path`, creating the
    /// directory if absent.
    ///
    /// A rejected mount is propagated; the engine does not retry.
    pub fn create(path: impl Into<PathBuf>, capacity_bytes: u64) -> Result<Self> {
        let path = path.into();

        let created_dir = if path.is_dir() {
            false
        } else {
            fs::create_dir_all(&path)?;
            true
        };

        let size_mib = (capacity_bytes / (1024 * 1024)).max(1);
        let status = Command::new("mount")
            .args(["-t", "ramfs", "-o"])
            .arg(format!("size={}m", size_mib))
            .arg("ramfs")
            .arg(&path)
            .status();

        let failure = match status {
            Ok(status) if status.success() => None,
            Ok(status) => Some(format!(
                "mount of ramfs at {} rejected ({})",
                path.display(),
                status
            )),
            Err(err) => Some(format!(
                "failed to run mount for {}: {}",
                path.display(),
                err
            )),
        };

        if let Some(msg) = failure {
            if created_dir {
                let _ = fs::remove_dir(&path);
            }
            return Err(RdBenchError::VolumeError(msg));
        }

        debug!("mounted ramfs at {} ({} MiB)", path.display(), size_mib);
        Ok(Self {
            path,
            released: false,
        })
    }

    /// The mount path this volume owns.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unmount and remove the mount point.
    ///
    /// Safe to call more than once; every call after the first is a
    /// no-op, and an already-absent path is not an error. Unmount is
    /// attempted unconditionally; directory removal happens only if the
    /// path is still inspectable afterwards.
    pub fn destroy(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        match Command::new("umount").arg(&self.path).status() {
            Ok(status) if !status.success() => {
                warn!("umount of {} reported {}", self.path.display(), status);
            }
            Err(err) => {
                warn!("failed to run umount for {}: {}", self.path.display(), err);
            }
            _ => {}
        }

        if self.path.is_dir() {
            fs::remove_dir_all(&self.path)?;
        }
        debug!("transient volume at {} released", self.path.display());
        Ok(())
    }
}

impl Drop for TransientVolume {
    fn drop(&mut self) {
        if !self.released {
            let _ = Command::new("umount").arg(&self.path).status();
            if self.path.is_dir() {
                let _ = fs::remove_dir_all(&self.path);
            }
        }
    }
}

//! Configuration file loading and saving
//!
//! Optional TOML defaults at `$CONFIG_DIR/rdbench/rdbench.toml`. Every
//! field is optional; values present in the file replace built-in
//! defaults, and command-line flags override both.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ModeSet, RunConfig};
use crate::{RdBenchError, Result, APP_NAME, CONFIG_FILE};

/// On-disk configuration defaults
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub blocksize: Option<u64>,
    pub loops: Option<u32>,
    pub files: Option<Vec<PathBuf>>,
    pub modes: Option<Vec<String>>,
    pub ramdisk: Option<bool>,
    pub ramdisk_path: Option<PathBuf>,
    pub capacity: Option<u64>,
    pub target_dir: Option<PathBuf>,
    pub ops: Option<u64>,
    pub rounding: Option<usize>,
}

impl ConfigFile {
    /// The standard configuration file path,
    /// `$CONFIG_DIR/rdbench/rdbench.toml`.
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            RdBenchError::ConfigError("unable to determine config directory".to_string())
        })?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Load the standard configuration file, if present.
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&Self::path()?)
    }

    /// Load a configuration file from an explicit path, if present.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            RdBenchError::ConfigError(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Some(toml::from_str(&content)?))
    }

    /// Save this file to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RdBenchError::ConfigError(format!(
                    "failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| {
            RdBenchError::ConfigError(format!(
                "failed to write config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Overlay the file's values onto `config`.
    pub fn apply(self, mut config: RunConfig) -> Result<RunConfig> {
        if let Some(block_size) = self.blocksize {
            config.block_size = block_size;
        }
        if let Some(loops) = self.loops {
            config.loops = loops;
        }
        if let Some(files) = self.files {
            config.files = files;
        }
        if let Some(modes) = self.modes {
            config.modes = ModeSet::parse(&modes)?;
        }
        if let Some(ramdisk) = self.ramdisk {
            config.use_volume = ramdisk;
        }
        if let Some(path) = self.ramdisk_path {
            config.volume_path = path;
        }
        if let Some(capacity) = self.capacity {
            config.volume_capacity = capacity;
        }
        if let Some(target_dir) = self.target_dir {
            config.target_dir = target_dir;
        }
        if let Some(ops) = self.ops {
            config.op_count = Some(ops);
        }
        if let Some(rounding) = self.rounding {
            config.rounding = rounding;
        }
        Ok(config)
    }
}

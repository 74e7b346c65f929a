//! Read-mode flag resolution
//!
//! Timed reads must not measure page-cache bandwidth, so descriptors are
//! opened with direct and synchronous flags where the platform supports
//! them. The flag set is resolved once at startup from a platform tag and
//! threaded into the reader explicitly, which lets tests inject an
//! arbitrary set (including plain buffered reads).

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

#[cfg(target_os = "linux")]
const DIRECT_FLAG: i32 = libc::O_DIRECT;
#[cfg(not(target_os = "linux"))]
const DIRECT_FLAG: i32 = 0;

#[cfg(unix)]
const SYNC_FLAG: i32 = libc::O_DSYNC;
#[cfg(not(unix))]
const SYNC_FLAG: i32 = 0;

const FILE_FLAG_WRITE_THROUGH: u32 = 0x8000_0000;
const FILE_FLAG_NO_BUFFERING: u32 = 0x2000_0000;

/// Set of OS open flags applied to every timed read descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFlags {
    custom: i32,
}

impl ReadFlags {
    /// Plain buffered reads with no extra open flags.
    ///
    /// Never used for timing once platform flags are resolvable; exists so
    /// tests can exercise the read path without direct-I/O alignment
    /// constraints.
    pub const fn buffered() -> Self {
        Self { custom: 0 }
    }

    /// Build a flag set from raw open(2) custom flag bits.
    pub const fn from_bits(custom: i32) -> Self {
        Self { custom }
    }

    /// Raw custom flag bits.
    pub const fn bits(self) -> i32 {
        self.custom
    }

    /// True when no cache-bypassing or synchronous bits are set.
    pub const fn is_buffered(self) -> bool {
        self.custom == 0
    }

    /// Open `path` read-only with this flag set.
    #[cfg(unix)]
    pub fn open(self, path: &Path) -> io::Result<File> {
        use std::os::unix::fs::OpenOptionsExt;

        let mut options = OpenOptions::new();
        options.read(true);
        if !self.is_buffered() {
            options.custom_flags(self.custom);
        }
        options.open(path)
    }

    /// Open `path` read-only with this flag set.
    #[cfg(windows)]
    pub fn open(self, path: &Path) -> io::Result<File> {
        use std::os::windows::fs::OpenOptionsExt;

        let mut options = OpenOptions::new();
        options.read(true);
        if !self.is_buffered() {
            options.custom_flags(self.custom as u32);
        }
        options.open(path)
    }

    #[cfg(not(any(unix, windows)))]
    pub fn open(self, path: &Path) -> io::Result<File> {
        OpenOptions::new().read(true).open(path)
    }
}

/// Resolve the read-mode flag set for a host platform tag
///
/// Linux combines direct and synchronous flags to bypass the page cache
/// and force on-media completion before each read returns. Platforms
/// without resolvable direct-I/O support fall back to synchronous-only.
/// The returned bits are those of the compilation target.
pub fn resolve_read_flags(platform: &str) -> ReadFlags {
    match platform {
        "linux" => ReadFlags::from_bits(DIRECT_FLAG | SYNC_FLAG),
        "windows" => {
            ReadFlags::from_bits((FILE_FLAG_NO_BUFFERING | FILE_FLAG_WRITE_THROUGH) as i32)
        }
        _ => ReadFlags::from_bits(SYNC_FLAG),
    }
}

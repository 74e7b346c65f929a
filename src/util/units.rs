//! Units formatting and conversion utilities
//!
//! Provides human-readable rendering of byte sizes and measured
//! bandwidth figures using binary (1024-based) prefixes.

/// Binary prefix table for bandwidth rendering, indexed by
/// `floor(log_1024(value))`.
pub const SIZE_PREFIXES: [&str; 7] = ["", "K", "M", "G", "T", "E", "P"];

/// Scale a raw bytes-per-second figure to the largest fitting binary prefix
///
/// The prefix index is `floor(log_1024(value))`, clamped to the supported
/// prefix table. Values below one byte per second stay unscaled.
///
/// # Examples
/// ```
/// use rdbench::util::units::scale_bandwidth;
///
/// assert_eq!(scale_bandwidth(512.0), (512.0, ""));
/// assert_eq!(scale_bandwidth(2048.0), (2.0, "K"));
/// ```
pub fn scale_bandwidth(bytes_per_sec: f64) -> (f64, &'static str) {
    if !bytes_per_sec.is_finite() || bytes_per_sec < 1.0 {
        return (bytes_per_sec.max(0.0), SIZE_PREFIXES[0]);
    }

    let exponent = bytes_per_sec.log(1024.0).floor() as usize;
    let exponent = exponent.min(SIZE_PREFIXES.len() - 1);
    let scaled = bytes_per_sec / 1024f64.powi(exponent as i32);

    (scaled, SIZE_PREFIXES[exponent])
}

/// Format a bandwidth figure as a summary string with the given number
/// of decimal digits
///
/// # Examples
/// ```
/// use rdbench::util::units::format_bandwidth;
///
/// assert_eq!(format_bandwidth(1024.0, 2), "1.00 KB/s");
/// assert_eq!(format_bandwidth(1536.0, 1), "1.5 KB/s");
/// ```
pub fn format_bandwidth(bytes_per_sec: f64, decimals: usize) -> String {
    let (value, prefix) = scale_bandwidth(bytes_per_sec);
    format!("{:.*} {}B/s", decimals, value, prefix)
}

/// Format a byte count into a human-readable size
///
/// # Examples
/// ```
/// use rdbench::util::units::format_bytes;
///
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(1048576), "1.0 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

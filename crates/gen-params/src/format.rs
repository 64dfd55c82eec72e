//! Size and date formatting helpers used when reporting on metadata files

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

static SIZE_REX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+\.?\d*)([KMGT]?B)").unwrap()
});

/// Format a byte count with binary units, e.g. `1536` → `"1.50 KB"`
pub fn human_readable_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", size, SIZE_UNITS[unit])
}

/// Parse a size string such as `"1.5KB"` or `"20mb"` back into bytes.
///
/// Only the leading number and unit are read; fractional bytes are truncated.
pub fn parse_size(text: &str) -> Result<u64> {
    let Some(caps) = SIZE_REX.captures(text) else {
        bail!("Invalid file size string '{}'", text);
    };

    let size: f64 = caps[1]
        .parse()
        .with_context(|| format!("Invalid file size string '{}'", text))?;
    let multiplier = match caps[2].to_uppercase().as_str() {
        "KB" => 1024f64,
        "MB" => 1024f64.powi(2),
        "GB" => 1024f64.powi(3),
        "TB" => 1024f64.powi(4),
        _ => 1.0,
    };

    Ok((size * multiplier) as u64)
}

/// Last modification time of a file as `YYYY-MM-DD HH:MM:SS` local time
pub fn modified_date<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to read modification time: {}", path.display()))?;

    Ok(DateTime::<Local>::from(modified).format("%Y-%m-%d %H:%M:%S").to_string())
}

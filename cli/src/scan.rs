//! Batch scanning of metadata sidecar files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gen_params::{human_readable_size, modified_date, parse_many, GenerationParams, ParserConfig};
use serde::Serialize;
use tracing::{debug, warn};

/// Sidecar files written next to generated images
const METADATA_EXTENSIONS: [&str; 1] = ["txt"];

#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub size: String,
    pub modified: Option<String>,
    pub params: GenerationParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub entries: Vec<ScanEntry>,
    pub failures: Vec<ScanFailure>,
}

/// List metadata files directly inside `folder`, sorted by path
pub fn find_metadata_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(anyhow::anyhow!("Path is not a directory: {}", folder.display()));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(folder)
        .with_context(|| format!("Failed to read directory: {}", folder.display()))?
    {
        let path = entry?.path();
        let is_metadata = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| METADATA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if is_metadata && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Read and parse every metadata file in `folder`.
///
/// Files that cannot be read or parsed are recorded as failures; the scan
/// carries on with the rest.
pub fn scan_folder(folder: &Path, config: &ParserConfig) -> Result<ScanReport> {
    let paths = find_metadata_files(folder)?;
    debug!(count = paths.len(), folder = %folder.display(), "found metadata files");

    let mut report = ScanReport::default();
    let mut readable = Vec::new();
    let mut texts = Vec::new();

    for path in paths {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                texts.push(text);
                readable.push(path);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read metadata file");
                report.failures.push(ScanFailure { path, error: e.to_string() });
            }
        }
    }

    for ((path, text), result) in readable.into_iter().zip(&texts).zip(parse_many(&texts, config)) {
        match result {
            Ok(params) => {
                let modified = modified_date(&path)
                    .inspect_err(|e| {
                        warn!(path = %path.display(), error = %e, "no modification time")
                    })
                    .ok();
                report.entries.push(ScanEntry {
                    size: human_readable_size(text.len() as u64),
                    modified,
                    params,
                    path,
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse metadata");
                report.failures.push(ScanFailure { path, error: e.to_string() });
            }
        }
    }

    Ok(report)
}

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bininfo_core::{DecodeError, ScanConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

pub mod commands;

/// Image inspected when no path is given: the merged build output of the
/// project the tool is run from.
pub const DEFAULT_IMAGE_PATH: &str = "build/merged-binary.bin";

/// Failures the CLI maps to distinct exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{stage} decoding failed", stage = .0.stage().as_str())]
    Decode(#[from] DecodeError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::NotFound(_) => 2,
            CliError::Decode(_) => 1,
        }
    }
}

/// Exit code for any error bubbling out of a command.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

/// Install the stderr log subscriber. `verbose` turns on per-stage debug events.
pub fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// The image path to inspect, falling back to [`DEFAULT_IMAGE_PATH`].
pub fn resolve_image_path(arg: Option<&Path>) -> PathBuf {
    arg.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_PATH))
}

/// Read the whole image into memory.
pub fn load_image(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(CliError::NotFound(path.to_path_buf()).into());
    }
    fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))
}

/// Load a scan config JSON file, or the defaults when none is given.
pub fn load_scan_config(path: Option<&Path>) -> Result<ScanConfig> {
    let Some(path) = path else {
        return Ok(ScanConfig::default());
    };
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scan config at {}", path.display()))?;
    let config: ScanConfig =
        serde_json::from_str(&body).context("Failed to parse scan config JSON")?;
    Ok(config)
}

/// Filesystem facts about the inspected image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetadata {
    pub path: String,
    pub size: u64,
    /// Modification time as RFC 3339, when the platform reports one.
    pub modified: Option<String>,
}

pub fn file_metadata(path: &Path) -> Result<FileMetadata> {
    let meta =
        fs::metadata(path).with_context(|| format!("Failed to stat image: {}", path.display()))?;
    let modified = meta.modified().ok().map(|t| DateTime::<Utc>::from(t).to_rfc3339());
    Ok(FileMetadata { path: path.display().to_string(), size: meta.len(), modified })
}

/// Compute the SHA-256 hash of a file and return it as uppercase hex.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open image for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read image for hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode_upper(hasher.finalize()))
}

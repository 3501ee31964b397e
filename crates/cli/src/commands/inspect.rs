use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::commands::report::{write_text_report, Report};
use crate::{file_metadata, load_image, load_scan_config, sha256_file, CliError};

/// Decode `image` and print its build provenance.
///
/// A missing image is reported before anything else is read, including the
/// scan config.
pub fn inspect_command(image: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let bytes = load_image(image)?;
    debug!(path = %image.display(), len = bytes.len(), "loaded image");
    let config = load_scan_config(config)?;

    let inspection = bininfo_core::inspect(&bytes, &config).map_err(CliError::from)?;
    let file = file_metadata(image)?;
    let sha256 = sha256_file(image)?;

    let report = Report { inspection, file, sha256 };
    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report).context("Failed to write report")?;
        writeln!(out).context("Failed to write report")?;
    } else {
        write_text_report(&mut out, &report).context("Failed to write report")?;
    }
    out.flush().context("Failed to write report")?;

    Ok(())
}

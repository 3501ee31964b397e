use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use esp_bininfo::commands::inspect_command;
use esp_bininfo::{exit_code_for, init_logging, resolve_image_path};

/// Build-provenance inspector for merged ESP flash images.
///
/// Finds the app partition in the partition table, walks the app image's
/// segments and prints the app descriptor (project, version, build time,
/// IDF version, ELF SHA-256) along with file metadata and the image's own
/// SHA-256.
#[derive(Parser, Debug)]
#[command(
    name = "esp-bininfo",
    version,
    about = "Print build provenance embedded in a merged ESP flash image",
    long_about = None
)]
struct Cli {
    /// Path to the merged image. Defaults to build/merged-binary.bin.
    #[arg(value_name = "IMAGE")]
    path: Option<PathBuf>,

    /// Emit JSON instead of human-readable text.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// JSON file overriding the partition table scan window or app type.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log each decoding stage to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let image = resolve_image_path(cli.path.as_deref());
    match inspect_command(&image, cli.config.as_deref(), cli.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

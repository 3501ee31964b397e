//! bininfo-core
//!
//! Decoding pipeline for merged ESP flash images.
//!
//! A merged image is the bootloader, the partition table at 0x8000 and one or
//! more app images laid out at their flash offsets. This crate finds the app
//! partition, walks the app image's segments and decodes the app descriptor
//! from the first segment, yielding the build provenance recorded there.
//!
//! All substantive logic lives here so it can be tested without touching the
//! filesystem; the CLI only loads bytes, hashes files and prints.

pub mod config;
pub mod cursor;
pub mod decoded;
pub mod descriptor;
pub mod error;
pub mod image;
pub mod inspect;
pub mod partition;
pub mod text;

pub use config::ScanConfig;
pub use decoded::{Decoded, DecodeWarning};
pub use descriptor::AppDescriptor;
pub use error::{DecodeError, DecodeResult, Stage};
pub use inspect::{inspect, Inspection, SegmentInfo};
pub use partition::PartitionEntry;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

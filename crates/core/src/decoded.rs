use std::fmt;

use serde::{Deserialize, Serialize};

/// Non-fatal anomaly noticed while decoding.
///
/// Decoding continues past all of these; they are surfaced in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeWarning {
    /// First byte of the app image is not the image magic.
    ImageMagicMismatch { found: u8, expected: u8 },
    /// App descriptor magic word is wrong; its fields may be garbage.
    DescriptorMagicMismatch { found: u32, expected: u32 },
    /// A text field held invalid UTF-8 and was decoded lossily.
    LossyText { field: String },
    /// The app partition extends past the end of the image and was clamped.
    PartitionTruncated { declared_size: u32, available: usize },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::ImageMagicMismatch { found, expected } => write!(
                f,
                "App data does not look like a valid image (first byte 0x{found:02x} != 0x{expected:02x})"
            ),
            DecodeWarning::DescriptorMagicMismatch { found, expected } => {
                write!(f, "app_desc magic mismatch: 0x{found:08x} (expected 0x{expected:08x})")
            }
            DecodeWarning::LossyText { field } => {
                write!(f, "field '{field}' contains invalid UTF-8; decoded lossily")
            }
            DecodeWarning::PartitionTruncated { declared_size, available } => write!(
                f,
                "app partition declares 0x{declared_size:x} bytes but only 0x{available:x} are present in the image"
            ),
        }
    }
}

/// A decoded value together with the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub warnings: Vec<DecodeWarning>,
}

impl<T> Decoded<T> {
    pub fn clean(value: T) -> Self {
        Self { value, warnings: Vec::new() }
    }

    pub fn with_warnings(value: T, warnings: Vec<DecodeWarning>) -> Self {
        Self { value, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Split into the value, moving the warnings onto `sink`.
    pub fn drain_into(self, sink: &mut Vec<DecodeWarning>) -> T {
        sink.extend(self.warnings);
        self.value
    }
}

use thiserror::Error;

/// Pipeline stage a decode failure was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PartitionTable,
    ImageHeader,
    Segments,
    Descriptor,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::PartitionTable => "partition table",
            Stage::ImageHeader => "image header",
            Stage::Segments => "segments",
            Stage::Descriptor => "app descriptor",
        }
    }
}

/// Structural failures that abort the decoding pipeline.
///
/// Soft anomalies (wrong magic bytes, undecodable text) are not errors; they
/// travel alongside the decoded value as [`crate::DecodeWarning`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read of `len` bytes at `offset` would run past the end of the buffer
    /// `stage` was decoding.
    #[error("read of {len} bytes at offset 0x{offset:x} exceeds buffer of {available} bytes")]
    OutOfBounds { stage: Stage, offset: usize, len: usize, available: usize },

    /// No entry in the partition table window carries the app signature.
    #[error("No app partition found in partition table window 0x{start:x}..0x{end:x}")]
    AppPartitionNotFound { start: usize, end: usize },

    /// The app partition starts past the end of the image.
    #[error("App partition offset 0x{offset:08x} lies outside image of {image_len} bytes")]
    PartitionOutsideImage { offset: u32, image_len: usize },

    /// Too few bytes in the app partition for an image header.
    #[error("App data too small: {len} bytes, image header needs {needed}")]
    AppDataTooSmall { len: usize, needed: usize },

    /// The image header declares zero segments.
    #[error("No segments found in app image")]
    NoSegments,

    /// A segment header or payload extends past the end of the app data.
    #[error(
        "Segment {index} out of bounds: {len} bytes at offset 0x{offset:x}, app data is {available} bytes"
    )]
    SegmentOutOfBounds { index: usize, offset: usize, len: usize, available: usize },

    /// Segment 0 cannot hold an app descriptor record.
    #[error("First segment too small for app descriptor: {len} bytes, need {needed}")]
    SegmentTooSmall { len: usize, needed: usize },
}

impl DecodeError {
    /// The stage that detected this failure.
    pub fn stage(&self) -> Stage {
        match self {
            DecodeError::OutOfBounds { stage, .. } => *stage,
            DecodeError::AppPartitionNotFound { .. } | DecodeError::PartitionOutsideImage { .. } => {
                Stage::PartitionTable
            }
            DecodeError::AppDataTooSmall { .. } => Stage::ImageHeader,
            DecodeError::NoSegments | DecodeError::SegmentOutOfBounds { .. } => Stage::Segments,
            DecodeError::SegmentTooSmall { .. } => Stage::Descriptor,
        }
    }
}

/// Convenience result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

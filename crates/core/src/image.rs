//! App image header and segment framing.
//!
//! An app image starts with a 0x18 byte header (8 byte common header plus a
//! 16 byte extended header), followed by `segment_count` segments, each an
//! 8 byte sub-header (load address, size) and its payload.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cursor::{u16_le_at, ByteCursor};
use crate::decoded::{Decoded, DecodeWarning};
use crate::error::{DecodeError, DecodeResult, Stage};

/// First byte of every app image.
pub const IMAGE_MAGIC: u8 = 0xE9;
/// Size of the image header (common + extended).
pub const IMAGE_HEADER_LEN: usize = 0x18;
/// Size of each segment's sub-header.
pub const SEGMENT_HEADER_LEN: usize = 8;

const CHIP_ID_OFFSET: usize = 0x0C;
const HASH_APPENDED_OFFSET: usize = 0x17;

/// Decoded image header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHeader {
    pub magic: u8,
    pub segment_count: u8,
    pub spi_mode: u8,
    /// High nibble: flash size, low nibble: flash frequency.
    pub spi_size_freq: u8,
    pub entry_addr: u32,
    pub chip_id: u16,
    pub hash_appended: bool,
}

impl ImageHeader {
    pub fn parse(app: &[u8]) -> DecodeResult<Decoded<Self>> {
        if app.len() < IMAGE_HEADER_LEN {
            return Err(DecodeError::AppDataTooSmall { len: app.len(), needed: IMAGE_HEADER_LEN });
        }

        let mut cur = ByteCursor::new(app, Stage::ImageHeader);
        let magic = cur.read_u8()?;
        let segment_count = cur.read_u8()?;
        let spi_mode = cur.read_u8()?;
        let spi_size_freq = cur.read_u8()?;
        let entry_addr = cur.read_u32_le()?;
        let chip_id = u16_le_at(app, CHIP_ID_OFFSET, Stage::ImageHeader)?;
        let hash_appended = app[HASH_APPENDED_OFFSET] == 1;

        let mut warnings = Vec::new();
        if magic != IMAGE_MAGIC {
            warnings.push(DecodeWarning::ImageMagicMismatch { found: magic, expected: IMAGE_MAGIC });
        }

        let header = ImageHeader {
            magic,
            segment_count,
            spi_mode,
            spi_size_freq,
            entry_addr,
            chip_id,
            hash_appended,
        };
        Ok(Decoded::with_warnings(header, warnings))
    }
}

/// One segment of an app image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub load_addr: u32,
    /// Offset of the payload inside the app data.
    pub data_offset: usize,
    pub payload: &'a [u8],
}

/// Result of framing an app image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedImage<'a> {
    pub header: ImageHeader,
    pub segments: Vec<Segment<'a>>,
    /// Offset just past the last segment payload.
    pub end_offset: usize,
}

/// Parse the image header and carve out every segment in on-disk order.
///
/// A bad image magic only raises a warning; the layout is still walked since
/// the rest of it may be intact. Zero segments, or any segment reaching past
/// `app`, is a hard failure.
pub fn frame(app: &[u8]) -> DecodeResult<Decoded<FramedImage<'_>>> {
    let Decoded { value: header, warnings } = ImageHeader::parse(app)?;
    if header.segment_count == 0 {
        return Err(DecodeError::NoSegments);
    }

    let mut cur = ByteCursor::at(app, IMAGE_HEADER_LEN, Stage::Segments);
    let mut segments = Vec::with_capacity(header.segment_count as usize);
    for index in 0..header.segment_count as usize {
        let header_offset = cur.position();
        let out_of_bounds = |offset: usize, len: usize| DecodeError::SegmentOutOfBounds {
            index,
            offset,
            len,
            available: app.len(),
        };

        let load_addr =
            cur.read_u32_le().map_err(|_| out_of_bounds(header_offset, SEGMENT_HEADER_LEN))?;
        let size =
            cur.read_u32_le().map_err(|_| out_of_bounds(header_offset, SEGMENT_HEADER_LEN))?
                as usize;
        let data_offset = cur.position();
        let payload = cur.read_bytes(size).map_err(|_| out_of_bounds(data_offset, size))?;

        debug!(index, load_addr, data_offset, size, "segment");
        segments.push(Segment { load_addr, data_offset, payload });
    }

    let framed = FramedImage { header, segments, end_offset: cur.position() };
    Ok(Decoded::with_warnings(framed, warnings))
}

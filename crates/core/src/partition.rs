//! Partition table scanning.
//!
//! Each entry is 32 bytes:
//!
//! | off | len | field                  |
//! |-----|-----|------------------------|
//! | 0   | 2   | magic `AA 50`          |
//! | 2   | 1   | type                   |
//! | 3   | 1   | subtype                |
//! | 4   | 4   | offset (LE)            |
//! | 8   | 4   | size (LE)              |
//! | 12  | 16  | label, NUL padded      |
//! | 28  | 4   | flags (LE)             |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ScanConfig, PARTITION_ENTRY_SIZE};
use crate::cursor::ByteCursor;
use crate::decoded::{Decoded, DecodeWarning};
use crate::error::{DecodeError, DecodeResult, Stage};
use crate::text::decode_padded;

/// Magic bytes opening every partition table entry.
pub const PARTITION_MAGIC: [u8; 2] = [0xAA, 0x50];

const LABEL_LEN: usize = 16;

/// One decoded partition table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionEntry {
    /// Absolute offset of this entry inside the image.
    pub table_offset: usize,
    #[serde(rename = "type")]
    pub ptype: u8,
    pub subtype: u8,
    /// Flash offset of the partition contents.
    pub offset: u32,
    /// Declared partition size.
    pub size: u32,
    pub label: String,
    pub flags: u32,
}

impl PartitionEntry {
    pub fn type_name(&self) -> &'static str {
        match self.ptype {
            0x00 => "app",
            0x01 => "data",
            _ => "custom",
        }
    }

    pub fn subtype_name(&self) -> String {
        match (self.ptype, self.subtype) {
            (0x00, 0x00) => "factory".into(),
            (0x00, s @ 0x10..=0x1F) => format!("ota_{}", s - 0x10),
            (0x00, 0x20) => "test".into(),
            (0x01, 0x00) => "ota".into(),
            (0x01, 0x01) => "phy".into(),
            (0x01, 0x02) => "nvs".into(),
            (0x01, 0x03) => "coredump".into(),
            (0x01, 0x04) => "nvs_keys".into(),
            (0x01, 0x05) => "efuse".into(),
            (0x01, 0x06) => "undefined".into(),
            (0x01, 0x80) => "esphttpd".into(),
            (0x01, 0x81) => "fat".into(),
            (0x01, 0x82) => "spiffs".into(),
            (0x01, 0x83) => "littlefs".into(),
            (_, s) => format!("0x{s:02x}"),
        }
    }

    /// Slice this partition's contents out of the full image.
    ///
    /// Merged images usually end with the last written app, well before the
    /// declared end of its partition, so a range running past the image is
    /// clamped and reported. A partition starting past the image is an error.
    pub fn contents<'a>(&self, image: &'a [u8]) -> DecodeResult<Decoded<&'a [u8]>> {
        let start = self.offset as usize;
        if start > image.len() {
            return Err(DecodeError::PartitionOutsideImage {
                offset: self.offset,
                image_len: image.len(),
            });
        }
        let available = image.len() - start;
        let size = self.size as usize;
        if size <= available {
            return Ok(Decoded::clean(&image[start..start + size]));
        }
        let warning = DecodeWarning::PartitionTruncated { declared_size: self.size, available };
        Ok(Decoded::with_warnings(&image[start..], vec![warning]))
    }
}

/// Decode the entry starting at `pos`, if it is fully inside `image` and
/// carries the partition magic.
fn entry_at(image: &[u8], pos: usize) -> Option<Decoded<PartitionEntry>> {
    let mut cur = ByteCursor::at(image, pos, Stage::PartitionTable);
    let raw = cur.read_bytes(PARTITION_ENTRY_SIZE).ok()?;
    if raw[..2] != PARTITION_MAGIC {
        return None;
    }

    let mut cur = ByteCursor::new(raw, Stage::PartitionTable);
    cur.skip(2).ok()?;
    let ptype = cur.read_u8().ok()?;
    let subtype = cur.read_u8().ok()?;
    let offset = cur.read_u32_le().ok()?;
    let size = cur.read_u32_le().ok()?;
    let label = decode_padded(cur.read_bytes(LABEL_LEN).ok()?);
    let flags = cur.read_u32_le().ok()?;

    let mut warnings = Vec::new();
    if label.lossy {
        warnings.push(DecodeWarning::LossyText { field: "label".into() });
    }
    let entry = PartitionEntry {
        table_offset: pos,
        ptype,
        subtype,
        offset,
        size,
        label: label.text,
        flags,
    };
    Some(Decoded::with_warnings(entry, warnings))
}

fn candidates(image: &[u8], config: &ScanConfig) -> impl Iterator<Item = usize> {
    let end = config.table_end().min(image.len());
    (config.table_offset..end).step_by(PARTITION_ENTRY_SIZE)
}

/// Find the app partition: the first entry whose type byte matches
/// `config.app_type`.
///
/// Only the literal type byte is compared; every app subtype (factory, OTA
/// slots, test) shares type `0x00`, so the first one in table order wins.
pub fn scan(image: &[u8], config: &ScanConfig) -> DecodeResult<Decoded<PartitionEntry>> {
    for pos in candidates(image, config) {
        let Some(found) = entry_at(image, pos) else { continue };
        if found.value.ptype != config.app_type {
            continue;
        }
        debug!(
            table_offset = pos,
            offset = found.value.offset,
            size = found.value.size,
            label = %found.value.label,
            "found app partition"
        );
        return Ok(found);
    }

    Err(DecodeError::AppPartitionNotFound { start: config.table_offset, end: config.table_end() })
}

/// List every magic-bearing entry in the table window, in table order.
pub fn entries(image: &[u8], config: &ScanConfig) -> Vec<PartitionEntry> {
    candidates(image, config).filter_map(|pos| entry_at(image, pos)).map(|d| d.value).collect()
}

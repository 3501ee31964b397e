//! The app descriptor record embedded at the start of the first segment.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cursor::{slice_at, u32_le_at};
use crate::decoded::{Decoded, DecodeWarning};
use crate::error::{DecodeError, DecodeResult, Stage};
use crate::text::decode_padded;

/// Expected value of the descriptor's magic word.
pub const APP_DESC_MAGIC: u32 = 0xABCD_5432;
/// Bytes of the descriptor this decoder reads.
pub const APP_DESC_LEN: usize = 0xB0;

const SECURE_VERSION: usize = 0x04;
const VERSION: (usize, usize) = (0x10, 32);
const PROJECT_NAME: (usize, usize) = (0x30, 32);
const COMPILE_TIME: (usize, usize) = (0x50, 16);
const COMPILE_DATE: (usize, usize) = (0x60, 16);
const IDF_VERSION: (usize, usize) = (0x70, 32);
const ELF_SHA256: (usize, usize) = (0x90, 32);

/// Build provenance carried by an app image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub magic: u32,
    pub secure_version: u32,
    pub version: String,
    pub project_name: String,
    pub compile_time: String,
    pub compile_date: String,
    /// Toolchain (ESP-IDF) version string.
    pub idf_version: String,
    /// SHA-256 of the linked ELF, as stored.
    #[serde(with = "hex::serde")]
    pub elf_sha256: [u8; 32],
}

impl AppDescriptor {
    /// `<date>T<time>`, exactly as stored; not validated as a real timestamp.
    pub fn compile_timestamp(&self) -> String {
        format!("{}T{}", self.compile_date, self.compile_time)
    }

    pub fn elf_sha256_hex(&self) -> String {
        hex::encode(self.elf_sha256)
    }

    pub fn magic_ok(&self) -> bool {
        self.magic == APP_DESC_MAGIC
    }
}

/// Decode the descriptor from the first segment's payload.
///
/// A wrong magic word is a warning: the text fields are decoded regardless.
pub fn decode(segment: &[u8]) -> DecodeResult<Decoded<AppDescriptor>> {
    if segment.len() < APP_DESC_LEN {
        return Err(DecodeError::SegmentTooSmall { len: segment.len(), needed: APP_DESC_LEN });
    }

    let mut warnings = Vec::new();
    let magic = u32_le_at(segment, 0, Stage::Descriptor)?;
    if magic != APP_DESC_MAGIC {
        warnings
            .push(DecodeWarning::DescriptorMagicMismatch { found: magic, expected: APP_DESC_MAGIC });
    }

    let mut text = |name: &str, (offset, len): (usize, usize)| -> DecodeResult<String> {
        let decoded = decode_padded(slice_at(segment, offset, len, Stage::Descriptor)?);
        if decoded.lossy {
            warnings.push(DecodeWarning::LossyText { field: name.to_string() });
        }
        Ok(decoded.text)
    };

    let version = text("version", VERSION)?;
    let project_name = text("project_name", PROJECT_NAME)?;
    let compile_time = text("compile_time", COMPILE_TIME)?;
    let compile_date = text("compile_date", COMPILE_DATE)?;
    let idf_version = text("idf_version", IDF_VERSION)?;

    let (sha_offset, sha_len) = ELF_SHA256;
    let mut elf_sha256 = [0u8; 32];
    elf_sha256.copy_from_slice(slice_at(segment, sha_offset, sha_len, Stage::Descriptor)?);

    let desc = AppDescriptor {
        magic,
        secure_version: u32_le_at(segment, SECURE_VERSION, Stage::Descriptor)?,
        version,
        project_name,
        compile_time,
        compile_date,
        idf_version,
        elf_sha256,
    };
    debug!(project = %desc.project_name, version = %desc.version, "decoded app descriptor");
    Ok(Decoded::with_warnings(desc, warnings))
}

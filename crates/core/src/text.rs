//! Fixed-width, NUL-padded text fields.
//!
//! Partition labels and every string in the app descriptor share this layout.

use std::borrow::Cow;

/// A decoded fixed-width text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedText {
    pub text: String,
    /// True when invalid UTF-8 had to be replaced.
    pub lossy: bool,
}

/// Decode a NUL-padded field.
///
/// Trailing NUL bytes are stripped; interior NULs are kept. Invalid UTF-8 is
/// replaced with U+FFFD rather than failing the decode.
pub fn decode_padded(field: &[u8]) -> PaddedText {
    let end = field.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    match String::from_utf8_lossy(&field[..end]) {
        Cow::Borrowed(s) => PaddedText { text: s.to_string(), lossy: false },
        Cow::Owned(s) => PaddedText { text: s, lossy: true },
    }
}

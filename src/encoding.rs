//! Byte-level text encoding with byte-order marks.
//!
//! Encoded text always starts with the byte-order mark of its encoding, so the
//! encoding can be recovered when reading. Bytes without a mark are read as
//! UTF-8.
//!
//! | Encoding | Mark |
//! |----------|------|
//! | UTF-8 | `EF BB BF` |
//! | UTF-16 (big endian) | `FE FF` |
//! | UTF-16 reverse (little endian) | `FF FE` |
//! | UTF-32 (big endian) | `00 00 FE FF` |
//!
//! For text-only transports the encoded bytes can be wrapped as
//! `Base64|<standard base64>|`.
//!
//! ```rust
//! use tbl::encoding::{self, Encoding};
//!
//! let bytes = encoding::encode("Table", Encoding::Utf16);
//! assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
//! assert_eq!(encoding::decode(&bytes).unwrap(), ("Table".to_string(), Encoding::Utf16));
//! ```

use crate::{Error, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

const BASE64_PREFIX: &str = "Base64|";
const BASE64_SUFFIX: &str = "|";

/// Text encodings a document can be stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16,
    Utf16Reverse,
    Utf32,
}

impl Encoding {
    #[must_use]
    pub const fn preamble(&self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            Encoding::Utf16 => &[0xFE, 0xFF],
            Encoding::Utf16Reverse => &[0xFF, 0xFE],
            Encoding::Utf32 => &[0x00, 0x00, 0xFE, 0xFF],
        }
    }

    /// Detects the encoding from a leading byte-order mark.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Option<Encoding> {
        // UTF-32 first: its mark is not a prefix of any other.
        [
            Encoding::Utf32,
            Encoding::Utf8,
            Encoding::Utf16,
            Encoding::Utf16Reverse,
        ]
        .into_iter()
        .find(|encoding| bytes.starts_with(encoding.preamble()))
    }
}

/// Encodes `text` including the byte-order mark.
#[must_use]
pub fn encode(text: &str, encoding: Encoding) -> Vec<u8> {
    let mut bytes = encoding.preamble().to_vec();
    match encoding {
        Encoding::Utf8 => bytes.extend_from_slice(text.as_bytes()),
        Encoding::Utf16 => text
            .encode_utf16()
            .for_each(|unit| bytes.extend_from_slice(&unit.to_be_bytes())),
        Encoding::Utf16Reverse => text
            .encode_utf16()
            .for_each(|unit| bytes.extend_from_slice(&unit.to_le_bytes())),
        Encoding::Utf32 => text
            .chars()
            .for_each(|ch| bytes.extend_from_slice(&u32::from(ch).to_be_bytes())),
    }
    bytes
}

/// Decodes bytes written by [`encode`], returning the text and its encoding.
///
/// # Errors
///
/// Returns [`Error::Encoding`] for truncated code units, unpaired surrogates,
/// invalid code points or invalid UTF-8.
pub fn decode(bytes: &[u8]) -> Result<(String, Encoding)> {
    let detected = Encoding::detect(bytes);
    let encoding = detected.unwrap_or_default();
    let body = match detected {
        Some(encoding) => &bytes[encoding.preamble().len()..],
        None => bytes,
    };
    tracing::trace!(?encoding, with_preamble = detected.is_some(), "decoding text");

    let text = match encoding {
        Encoding::Utf8 => decode_with(encoding_rs::UTF_8, body)
            .ok_or_else(|| Error::encoding("Invalid UTF-8 text"))?,
        Encoding::Utf16 => decode_with(encoding_rs::UTF_16BE, body)
            .ok_or_else(|| Error::encoding("Invalid UTF-16 text"))?,
        Encoding::Utf16Reverse => decode_with(encoding_rs::UTF_16LE, body)
            .ok_or_else(|| Error::encoding("Invalid UTF-16 text"))?,
        Encoding::Utf32 => {
            if body.len() % 4 != 0 {
                return Err(Error::encoding("Byte count of UTF-32 text is not a multiple of 4"));
            }
            body.chunks_exact(4)
                .map(|quad| {
                    let code_point = u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]);
                    char::from_u32(code_point)
                        .ok_or_else(|| Error::encoding("Invalid UTF-32 code point"))
                })
                .collect::<Result<String>>()?
        }
    };

    Ok((text, encoding))
}

/// Strict decoding after the mark has been stripped; `None` on malformed input.
fn decode_with(codec: &'static encoding_rs::Encoding, body: &[u8]) -> Option<String> {
    codec
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
}

/// Encodes `text` and wraps the bytes as `Base64|...|`.
#[must_use]
pub fn to_base64_string(text: &str, encoding: Encoding) -> String {
    let raw = general_purpose::STANDARD.encode(encode(text, encoding));
    format!("{}{}{}", BASE64_PREFIX, raw, BASE64_SUFFIX)
}

/// Unwraps a `Base64|...|` string into the encoded bytes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the markers are missing or the payload is
/// not valid base64.
pub fn base64_to_bytes(base64: &str) -> Result<Vec<u8>> {
    let raw = base64
        .strip_prefix(BASE64_PREFIX)
        .and_then(|rest| rest.strip_suffix(BASE64_SUFFIX))
        .ok_or_else(|| Error::encoding("Base64 string must be of the form Base64|...|"))?;
    general_purpose::STANDARD
        .decode(raw)
        .map_err(|e| Error::encoding(&format!("Invalid base64: {}", e)))
}

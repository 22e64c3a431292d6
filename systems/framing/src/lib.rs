#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Binary and text framing shared by level and eigenstate tokens.
//!
//! Compression codes are written as fixed-width big-endian 16-bit words and
//! the resulting bytes are rendered as padding-free base64url text. The
//! [`checksum`] module provides the two integrity tags carried by tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tracing::trace;
use xodex_core::CodecError;

pub mod checksum;

/// Number of bytes used to frame a single compression code.
pub const CODE_WIDTH: usize = 2;

/// Largest compression code representable in a frame.
pub const MAX_FRAMED_CODE: u32 = u16::MAX as u32;

/// Packs compression codes into big-endian 16-bit words.
///
/// Codes above [`MAX_FRAMED_CODE`] are rejected with
/// [`CodecError::CodeOverflow`] instead of being truncated.
pub fn pack_codes(codes: &[u32]) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::with_capacity(codes.len() * CODE_WIDTH);
    for &code in codes {
        let word = u16::try_from(code).map_err(|_| CodecError::CodeOverflow { code })?;
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    Ok(bytes)
}

/// Splits big-endian 16-bit words back into compression codes.
pub fn unpack_codes(bytes: &[u8]) -> Result<Vec<u32>, CodecError> {
    if bytes.len() % CODE_WIDTH != 0 {
        return Err(CodecError::CorruptPayload {
            reason: "odd number of payload bytes",
        });
    }

    Ok(bytes
        .chunks_exact(CODE_WIDTH)
        .map(|pair| u32::from(u16::from_be_bytes([pair[0], pair[1]])))
        .collect())
}

/// Renders bytes as base64url text with the trailing padding stripped.
#[must_use]
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes padding-free base64url text.
///
/// The padding length is implied by the text length modulo four; a remainder
/// of one cannot come from any byte string and is rejected.
pub fn from_base64url(text: &str) -> Result<Vec<u8>, CodecError> {
    let bytes = URL_SAFE_NO_PAD.decode(text)?;
    trace!(text = text.len(), bytes = bytes.len(), "base64url decoded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_pack_big_endian() {
        let bytes = pack_codes(&[0x7b, 0x0103, 0xffff]).expect("codes fit");
        assert_eq!(bytes, vec![0x00, 0x7b, 0x01, 0x03, 0xff, 0xff]);
        assert_eq!(unpack_codes(&bytes).expect("even"), vec![0x7b, 0x0103, 0xffff]);
    }

    #[test]
    fn oversized_code_is_rejected() {
        assert!(matches!(
            pack_codes(&[12, MAX_FRAMED_CODE + 1]),
            Err(CodecError::CodeOverflow { code: 65_536 })
        ));
    }

    #[test]
    fn odd_byte_count_is_corrupt() {
        assert!(matches!(
            unpack_codes(&[0, 1, 2]),
            Err(CodecError::CorruptPayload { .. })
        ));
    }

    #[test]
    fn base64url_uses_url_safe_alphabet_without_padding() {
        assert_eq!(to_base64url(&[0xfb, 0xff]), "-_8");
        assert_eq!(to_base64url(b"ab"), "YWI");
        assert_eq!(from_base64url("-_8").expect("valid"), vec![0xfb, 0xff]);
    }

    #[test]
    fn base64url_rejects_impossible_lengths_and_foreign_symbols() {
        assert!(matches!(
            from_base64url("AAAAA"),
            Err(CodecError::InvalidEncoding(_))
        ));
        assert!(matches!(
            from_base64url("+/8"),
            Err(CodecError::InvalidEncoding(_))
        ));
        assert!(matches!(
            from_base64url("YWI="),
            Err(CodecError::InvalidEncoding(_))
        ));
    }
}

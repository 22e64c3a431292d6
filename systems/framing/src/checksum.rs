//! Integrity tags carried by tokens.
//!
//! Level tokens use a truncated SHA-256 digest; eigenstate tokens and seed
//! derivation use 32-bit FNV-1a. The two are kept separate: the level tag is
//! part of the fixed `XDX1` wire format and FNV-1a sits on the seeding path.

use sha2::{Digest, Sha256};
use xodex_core::CodecError;

/// Number of hex characters in every checksum field.
pub const CHECKSUM_LEN: usize = 8;

const CONTENT_DIGEST_PREFIX: usize = CHECKSUM_LEN / 2;
const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// First four bytes of the SHA-256 digest of `text`, as lowercase hex.
#[must_use]
pub fn content_checksum(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(&digest[..CONTENT_DIGEST_PREFIX])
}

/// 32-bit FNV-1a over the UTF-16 code units of `text`.
#[must_use]
pub fn fnv1a32(text: &str) -> u32 {
    text.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// [`fnv1a32`] rendered as eight lowercase hex digits.
#[must_use]
pub fn fast_checksum(text: &str) -> String {
    format!("{:08x}", fnv1a32(text))
}

/// Compares a recomputed checksum against the one received in a token.
pub fn verify(expected: &str, received: &str) -> Result<(), CodecError> {
    if expected.as_bytes() == received.as_bytes() {
        Ok(())
    } else {
        Err(CodecError::ChecksumMismatch)
    }
}

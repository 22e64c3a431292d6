#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level token codec used by the editor and the player.
//!
//! Encoding validates the level, serializes it to the canonical compact
//! text, compresses its UTF-16 code units, frames the codes as base64url and appends a content
//! checksum. Decoding verifies the checksum before touching the payload and
//! re-validates the reconstructed level.

use serde_json::Value;
use tracing::debug;
use xodex_core::{CodecError, Level, Limits};
use xodex_system_compression::{compress, decompress};
use xodex_system_framing::{
    checksum::{content_checksum, verify},
    from_base64url, pack_codes, to_base64url, unpack_codes,
};
use xodex_system_seeding::seed_from_token;
use xodex_system_validation::{validate, validate_level};

pub mod compact;
pub mod token;

pub use compact::CompactLevel;
pub use token::{parse_fragment, LevelToken};

use token::split_token;

/// Level decoded from a share fragment, ready to be played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedLevel {
    /// Normalized level.
    pub level: Level,
    /// Token text without the version tag.
    pub token: String,
    /// Deterministic gameplay seed derived from the token.
    pub seed: u32,
}

/// Encoder and decoder for level tokens bound to a [`Limits`] table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelCodec {
    limits: Limits,
}

impl LevelCodec {
    /// Creates a codec enforcing the provided limits.
    #[must_use]
    pub const fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Limits enforced by the codec.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Validates untrusted level data and encodes it into a token.
    pub fn encode(&self, raw: &Value) -> Result<LevelToken, CodecError> {
        let level = validate(raw, &self.limits)?;
        self.assemble(&level)
    }

    /// Re-validates a typed level and encodes it into a token.
    pub fn encode_level(&self, level: &Level) -> Result<LevelToken, CodecError> {
        let level = validate_level(level, &self.limits)?;
        self.assemble(&level)
    }

    /// Decodes a token (without version tag) back into a normalized level.
    ///
    /// The checksum is verified before any other decoding step.
    pub fn decode(&self, token: &str) -> Result<Level, CodecError> {
        let outcome = self.disassemble(token);
        if let Err(error) = &outcome {
            debug!(%error, rejection = ?error.rejection(), "level token rejected");
        }
        outcome
    }

    /// Decodes a share fragment (`#XDX1.<token>`) and derives its gameplay seed.
    pub fn decode_fragment(&self, fragment: &str) -> Result<SharedLevel, CodecError> {
        let token = parse_fragment(fragment)?;
        let level = self.decode(token)?;
        Ok(SharedLevel {
            level,
            token: token.to_owned(),
            seed: seed_from_token(token),
        })
    }

    fn assemble(&self, level: &Level) -> Result<LevelToken, CodecError> {
        let text = CompactLevel::from_level(level).to_text()?;
        let units: Vec<u16> = text.encode_utf16().collect();
        let codes = compress(&units)?;
        let payload = to_base64url(&pack_codes(&codes)?);
        let token = LevelToken::assemble(&payload, &content_checksum(&payload));

        let length = token.as_str().len();
        let limit = self.limits.max_encoded_length();
        if length > limit {
            debug!(length, limit, "encoded level exceeds length limit");
            return Err(CodecError::TokenTooLarge { length, limit });
        }

        debug!(
            units = units.len(),
            codes = codes.len(),
            length,
            "level encoded"
        );
        Ok(token)
    }

    fn disassemble(&self, token: &str) -> Result<Level, CodecError> {
        let limit = self.limits.max_encoded_length();
        if token.len() > limit {
            return Err(CodecError::TokenTooLarge {
                length: token.len(),
                limit,
            });
        }

        let (payload, checksum) = split_token(token)?;
        verify(&content_checksum(payload), checksum)?;

        let codes = unpack_codes(&from_base64url(payload)?)?;
        let text = String::from_utf16(&decompress(&codes)?).map_err(|_| {
            CodecError::CorruptPayload {
                reason: "payload is not valid UTF-16",
            }
        })?;
        let level = CompactLevel::from_text(&text)?.into_level();
        Ok(validate_level(&level, &self.limits)?)
    }
}

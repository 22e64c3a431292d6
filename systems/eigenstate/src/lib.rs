#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-layout binary codec for [`Eigenstate`] snapshots.
//!
//! The six fields are written in declaration order as big-endian IEEE-754
//! `f32` values and shipped as `XDX1.<base64url>.<fnv1a-hex8>`. Unlike level
//! data, snapshots are never clamped: a non-finite field is an error.

use tracing::debug;
use xodex_core::{
    CodecError, Eigenstate, EIGENSTATE_FIELD_NAMES, EIGENSTATE_PACKED_LEN, TOKEN_DELIMITER,
    VERSION,
};
use xodex_system_framing::{
    checksum::{fast_checksum, verify},
    from_base64url, to_base64url,
};

const FIELD_WIDTH: usize = 4;

/// Packs a snapshot into its 24-byte big-endian layout.
pub fn pack(state: &Eigenstate) -> Result<[u8; EIGENSTATE_PACKED_LEN], CodecError> {
    let mut bytes = [0u8; EIGENSTATE_PACKED_LEN];
    let values = state.to_array();
    for ((value, name), slot) in values
        .iter()
        .zip(EIGENSTATE_FIELD_NAMES)
        .zip(bytes.chunks_exact_mut(FIELD_WIDTH))
    {
        if !value.is_finite() {
            return Err(CodecError::NonFiniteEigenstate { field: name });
        }
        slot.copy_from_slice(&value.to_be_bytes());
    }
    Ok(bytes)
}

/// Unpacks a snapshot; `bytes` must be exactly 24 bytes long.
pub fn unpack(bytes: &[u8]) -> Result<Eigenstate, CodecError> {
    if bytes.len() != EIGENSTATE_PACKED_LEN {
        return Err(CodecError::EigenstateLength {
            length: bytes.len(),
        });
    }

    let mut values = [0f32; EIGENSTATE_FIELD_NAMES.len()];
    for (value, word) in values.iter_mut().zip(bytes.chunks_exact(FIELD_WIDTH)) {
        *value = f32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }
    Ok(Eigenstate::from_array(values))
}

/// Encodes a snapshot into a versioned eigenstate token.
pub fn encode_eigenstate(state: &Eigenstate) -> Result<String, CodecError> {
    let payload = to_base64url(&pack(state)?);
    let checksum = fast_checksum(&payload);
    Ok(format!(
        "{VERSION}{TOKEN_DELIMITER}{payload}{TOKEN_DELIMITER}{checksum}"
    ))
}

/// Decodes a versioned eigenstate token.
///
/// Checks, in order: three fields, version tag, checksum, packed length.
pub fn decode_eigenstate(token: &str) -> Result<Eigenstate, CodecError> {
    let outcome = decode_fields(token);
    if let Err(error) = &outcome {
        debug!(%error, rejection = ?error.rejection(), "eigenstate token rejected");
    }
    outcome
}

fn decode_fields(token: &str) -> Result<Eigenstate, CodecError> {
    let mut fields = token.split(TOKEN_DELIMITER);
    let (Some(version), Some(payload), Some(checksum), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(CodecError::MalformedToken);
    };

    if version != VERSION {
        return Err(CodecError::UnsupportedVersion);
    }
    verify(&fast_checksum(payload), checksum)?;
    unpack(&from_base64url(payload)?)
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Xodex level codec.
//!
//! This crate defines the data model exchanged between the editor, the
//! player and the codec systems. Untrusted input flows through the validation
//! system into a normalized [`Level`], which the level codec turns into a
//! [`LevelToken`]-shaped string and back. The [`Limits`] table bounds every
//! structure and is passed explicitly to the systems that enforce it. Errors
//! raised anywhere in the pipeline are expressed through [`ValidationError`]
//! and [`CodecError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed version tag prefixed to shareable level fragments and eigenstate tokens.
pub const VERSION: &str = "XDX1";

/// Delimiter separating the fields of every token.
pub const TOKEN_DELIMITER: char = '.';

/// Lowest wave tier accepted by the codec.
pub const MIN_TIER: u32 = 1;

/// Highest wave tier accepted by the codec.
pub const MAX_TIER: u32 = 9;

/// Maximum number of characters retained from a level remark.
pub const MAX_REMARK_CHARS: usize = 2048;

/// Immutable bounds applied by the validator and the token assembler.
///
/// The codec only ever uses [`Limits::STANDARD`]; changing any bound changes
/// which tokens are accepted, so every encoder and decoder sharing links must
/// agree on the same table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Limits {
    min_size: u32,
    max_size: u32,
    max_path: usize,
    max_waves: usize,
    max_spawn_count: u32,
    max_heat: u32,
    max_encoded_length: usize,
}

impl Limits {
    /// Limits shared by every `XDX1` encoder and decoder.
    pub const STANDARD: Self = Self {
        min_size: 4,
        max_size: 20,
        max_path: 120,
        max_waves: 24,
        max_spawn_count: 200,
        max_heat: 500,
        max_encoded_length: 1200,
    };

    /// Smallest permitted grid side length.
    #[must_use]
    pub const fn min_size(&self) -> u32 {
        self.min_size
    }

    /// Largest permitted grid side length.
    #[must_use]
    pub const fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Longest permitted path measured in tiles.
    #[must_use]
    pub const fn max_path(&self) -> usize {
        self.max_path
    }

    /// Largest permitted number of waves.
    #[must_use]
    pub const fn max_waves(&self) -> usize {
        self.max_waves
    }

    /// Largest permitted number of spawns within a single wave.
    #[must_use]
    pub const fn max_spawn_count(&self) -> u32 {
        self.max_spawn_count
    }

    /// Largest permitted heat value.
    #[must_use]
    pub const fn max_heat(&self) -> u32 {
        self.max_heat
    }

    /// Longest permitted level token measured in characters.
    #[must_use]
    pub const fn max_encoded_length(&self) -> usize {
        self.max_encoded_length
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Location of a single path tile expressed as column and row coordinates.
///
/// Serialized as a two-element `[x, y]` array to match the editor's shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Tile {
    x: u32,
    y: u32,
}

impl Tile {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

impl From<[u32; 2]> for Tile {
    fn from([x, y]: [u32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Tile> for [u32; 2] {
    fn from(tile: Tile) -> Self {
        [tile.x, tile.y]
    }
}

/// A single wave of spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wave {
    /// Difficulty tier governing spawn speed, between 1 and 9.
    #[serde(rename = "t")]
    pub tier: u32,
    /// Number of spawns emitted by the wave.
    #[serde(rename = "c")]
    pub count: u32,
}

impl Wave {
    /// Creates a wave description.
    #[must_use]
    pub const fn new(tier: u32, count: u32) -> Self {
        Self { tier, count }
    }
}

/// Level designed in the editor and shared through a token.
///
/// Values produced by the validator always satisfy the bounds of the
/// [`Limits`] they were validated against. Hand-built values carry no such
/// guarantee and are re-validated before encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Side length of the square tile grid.
    pub size: u32,
    /// Ordered route followed by spawns; tiles never repeat.
    pub path: Vec<Tile>,
    /// Waves played in order.
    pub waves: Vec<Wave>,
    /// Difficulty scalar applied to the whole level.
    pub heat: u32,
    /// Free-form note attached by the author. `Some("")` is a present, empty remark.
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Number of fields carried by an [`Eigenstate`] snapshot.
pub const EIGENSTATE_FIELD_COUNT: usize = 6;

/// Size of a packed [`Eigenstate`] snapshot in bytes.
pub const EIGENSTATE_PACKED_LEN: usize = EIGENSTATE_FIELD_COUNT * 4;

/// Field names of an [`Eigenstate`] in packing order.
pub const EIGENSTATE_FIELD_NAMES: [&str; EIGENSTATE_FIELD_COUNT] = [
    "energy_setpoint",
    "epigenetic_profile",
    "cascade_readiness",
    "stress_resilience",
    "differentiation_axis",
    "mechanical_state",
];

/// Fixed-shape numeric snapshot exchanged with the external simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Eigenstate {
    /// Energy setpoint of the simulated state.
    pub energy_setpoint: f32,
    /// Epigenetic profile of the simulated state.
    pub epigenetic_profile: f32,
    /// Cascade readiness of the simulated state.
    pub cascade_readiness: f32,
    /// Stress resilience of the simulated state.
    pub stress_resilience: f32,
    /// Differentiation axis of the simulated state.
    pub differentiation_axis: f32,
    /// Mechanical state of the simulated state.
    pub mechanical_state: f32,
}

impl Eigenstate {
    /// Builds a snapshot from values listed in packing order.
    #[must_use]
    pub const fn from_array(values: [f32; EIGENSTATE_FIELD_COUNT]) -> Self {
        Self {
            energy_setpoint: values[0],
            epigenetic_profile: values[1],
            cascade_readiness: values[2],
            stress_resilience: values[3],
            differentiation_axis: values[4],
            mechanical_state: values[5],
        }
    }

    /// Returns the field values in packing order.
    #[must_use]
    pub const fn to_array(&self) -> [f32; EIGENSTATE_FIELD_COUNT] {
        [
            self.energy_setpoint,
            self.epigenetic_profile,
            self.cascade_readiness,
            self.stress_resilience,
            self.differentiation_axis,
            self.mechanical_state,
        ]
    }
}

/// Reasons untrusted level data is rejected by the validator.
///
/// The display text is intended to be shown to the author verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// The value is not a level object.
    #[error("Level payload is missing.")]
    MissingLevel,
    /// The path is not a list or its length is outside the permitted range.
    #[error("Path length is invalid.")]
    InvalidPathLength,
    /// A path entry is not a two-element coordinate.
    #[error("Path contains malformed coordinates.")]
    MalformedCoordinate,
    /// The path visits the same tile twice.
    #[error("Path cannot revisit the same tile ({x},{y}).")]
    RevisitedTile {
        /// Column of the first repeated tile.
        x: u32,
        /// Row of the first repeated tile.
        y: u32,
    },
    /// The wave list is not a list or its length is outside the permitted range.
    #[error("Wave count is invalid.")]
    InvalidWaveCount,
    /// A wave entry is neither an object nor an array.
    #[error("Wave entry is malformed.")]
    MalformedWave,
}

/// Coarse classification of codec failures used by front ends to pick a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The token or its contents do not have the expected shape.
    Schema,
    /// The token carries a missing or unsupported version tag.
    Version,
    /// The token content does not match its checksum.
    Checksum,
    /// The value to encode exceeds a hard codec limit.
    Limit,
}

/// Errors raised while encoding or decoding tokens.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The token does not have the expected number of non-empty fields.
    #[error("Malformed token.")]
    MalformedToken,
    /// The recomputed checksum differs from the one carried by the token.
    #[error("Checksum mismatch.")]
    ChecksumMismatch,
    /// The version tag is missing or not `XDX1`.
    #[error("Unsupported or missing level version.")]
    UnsupportedVersion,
    /// The binary payload cannot be unpacked or decompressed.
    #[error("Corrupt compressed payload ({reason}).")]
    CorruptPayload {
        /// Description of the detected inconsistency.
        reason: &'static str,
    },
    /// The payload text is not valid base64url.
    #[error("payload is not valid base64url: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decompressed payload is not a compact level.
    #[error("could not parse level payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// The level rejected validation.
    #[error(transparent)]
    InvalidLevel(#[from] ValidationError),
    /// The encoded token exceeds the permitted length.
    #[error("Encoded level too large ({length} chars, limit {limit}).")]
    TokenTooLarge {
        /// Length of the token that would have been produced.
        length: usize,
        /// Permitted maximum length.
        limit: usize,
    },
    /// The level text contains a UTF-16 unit outside the literal code range.
    #[error("Character U+{unit:04X} cannot be encoded in a level token.")]
    UnencodableCharacter {
        /// First offending UTF-16 code unit.
        unit: u16,
    },
    /// A compression code does not fit the 16-bit frame width.
    #[error("compression code {code} exceeds the 16-bit frame width")]
    CodeOverflow {
        /// Offending code.
        code: u32,
    },
    /// An eigenstate field is NaN or infinite.
    #[error("Eigenstate fields must be finite numbers ({field} is not).")]
    NonFiniteEigenstate {
        /// Name of the first non-finite field.
        field: &'static str,
    },
    /// The decoded eigenstate payload does not have the packed length.
    #[error("Malformed Eigenstate payload ({length} bytes).")]
    EigenstateLength {
        /// Number of decoded bytes.
        length: usize,
    },
}

impl CodecError {
    /// Classifies the error for front-end handling.
    #[must_use]
    pub const fn rejection(&self) -> Rejection {
        match self {
            Self::UnsupportedVersion => Rejection::Version,
            Self::ChecksumMismatch => Rejection::Checksum,
            Self::TokenTooLarge { .. }
            | Self::UnencodableCharacter { .. }
            | Self::CodeOverflow { .. }
            | Self::NonFiniteEigenstate { .. } => Rejection::Limit,
            Self::MalformedToken
            | Self::CorruptPayload { .. }
            | Self::InvalidEncoding(_)
            | Self::InvalidPayload(_)
            | Self::InvalidLevel(_)
            | Self::EigenstateLength { .. } => Rejection::Schema,
        }
    }
}

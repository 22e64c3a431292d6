//! Short-keyed level form used as the compression input.

use serde::{Deserialize, Serialize};
use xodex_core::{CodecError, Level, Tile, Wave};

/// Structural mirror of [`Level`] with single-letter keys.
///
/// Field order is the canonical key order of the text form
/// (`s`, `p`, `w`, `h`, then `r` only when a remark is present). Compression
/// is byte-exact, so this order is part of the wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactLevel {
    /// Grid side length.
    #[serde(rename = "s")]
    pub size: u32,
    /// Path tiles as `[x, y]` pairs.
    #[serde(rename = "p")]
    pub path: Vec<Tile>,
    /// Waves as `[tier, count]` pairs.
    #[serde(rename = "w")]
    pub waves: Vec<[u32; 2]>,
    /// Heat scalar.
    #[serde(rename = "h")]
    pub heat: u32,
    /// Optional remark.
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl CompactLevel {
    /// Mirrors a level without validating it.
    #[must_use]
    pub fn from_level(level: &Level) -> Self {
        Self {
            size: level.size,
            path: level.path.clone(),
            waves: level
                .waves
                .iter()
                .map(|wave| [wave.tier, wave.count])
                .collect(),
            heat: level.heat,
            remark: level.remark.clone(),
        }
    }

    /// Rebuilds the level-shaped value without validating it.
    #[must_use]
    pub fn into_level(self) -> Level {
        Level {
            size: self.size,
            path: self.path,
            waves: self
                .waves
                .into_iter()
                .map(|[tier, count]| Wave::new(tier, count))
                .collect(),
            heat: self.heat,
            remark: self.remark,
        }
    }

    /// Canonical compact JSON text.
    pub fn to_text(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses canonical compact JSON text.
    pub fn from_text(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Level {
        Level {
            size: 8,
            path: vec![Tile::new(0, 0), Tile::new(0, 7), Tile::new(7, 7)],
            waves: vec![Wave::new(1, 12)],
            heat: 120,
            remark: None,
        }
    }

    #[test]
    fn text_form_uses_canonical_key_order() {
        let text = CompactLevel::from_level(&sample()).to_text().expect("text");
        assert_eq!(text, r#"{"s":8,"p":[[0,0],[0,7],[7,7]],"w":[[1,12]],"h":120}"#);
    }

    #[test]
    fn remark_is_emitted_last_when_present() {
        let mut level = sample();
        level.remark = Some(String::new());
        let text = CompactLevel::from_level(&level).to_text().expect("text");
        assert!(text.ends_with(r#""h":120,"r":""}"#), "{text}");
    }

    #[test]
    fn latin1_remark_is_written_verbatim() {
        let mut level = sample();
        level.remark = Some("café".to_owned());
        let text = CompactLevel::from_level(&level).to_text().expect("text");
        assert!(text.ends_with(r#""r":"café"}"#), "{text}");
        assert_eq!(
            CompactLevel::from_text(&text).expect("parses").into_level(),
            level
        );
    }

    #[test]
    fn mapping_is_structural_inverse() {
        let mut level = sample();
        level.remark = Some("zig".to_owned());
        assert_eq!(CompactLevel::from_level(&level).into_level(), level);
    }

    #[test]
    fn wrongly_shaped_text_is_rejected() {
        assert!(matches!(
            CompactLevel::from_text(r#"{"s":8,"p":[[0,0]],"w":[[1]],"h":1}"#),
            Err(CodecError::InvalidPayload(_))
        ));
        assert!(matches!(
            CompactLevel::from_text(r#"{"s":8,"p":"#),
            Err(CodecError::InvalidPayload(_))
        ));
    }
}

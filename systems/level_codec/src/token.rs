//! Level token text and shareable fragments.

use std::fmt;

use xodex_core::{CodecError, TOKEN_DELIMITER, VERSION};
use xodex_system_seeding::seed_from_token;

/// Encoded level in the form `<base64url-payload>.<checksum-hex8>`.
///
/// Tokens are immutable; decoding is the only operation performed on them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LevelToken {
    text: String,
    delimiter: usize,
}

impl LevelToken {
    pub(crate) fn assemble(payload: &str, checksum: &str) -> Self {
        Self {
            text: format!("{payload}{TOKEN_DELIMITER}{checksum}"),
            delimiter: payload.len(),
        }
    }

    /// Full token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Base64url payload field.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.text[..self.delimiter]
    }

    /// Checksum field.
    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.text[self.delimiter + TOKEN_DELIMITER.len_utf8()..]
    }

    /// Versioned fragment (`XDX1.<token>`) placed after `#` in share links.
    #[must_use]
    pub fn share_fragment(&self) -> String {
        format!("{VERSION}{TOKEN_DELIMITER}{}", self.text)
    }

    /// Gameplay seed derived from the token text.
    #[must_use]
    pub fn seed(&self) -> u32 {
        seed_from_token(&self.text)
    }

    /// Consumes the token, yielding its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for LevelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for LevelToken {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Strips the optional leading `#` and the `XDX1.` version tag from a fragment.
///
/// The remainder is returned unchanged; its grammar is checked when decoding.
pub fn parse_fragment(fragment: &str) -> Result<&str, CodecError> {
    let normalized = fragment.strip_prefix('#').unwrap_or(fragment);
    normalized
        .strip_prefix(VERSION)
        .and_then(|rest| rest.strip_prefix(TOKEN_DELIMITER))
        .ok_or(CodecError::UnsupportedVersion)
}

pub(crate) fn split_token(token: &str) -> Result<(&str, &str), CodecError> {
    let mut fields = token.split(TOKEN_DELIMITER);
    match (fields.next(), fields.next(), fields.next()) {
        (Some(payload), Some(checksum), None) if !payload.is_empty() && !checksum.is_empty() => {
            Ok((payload, checksum))
        }
        _ => Err(CodecError::MalformedToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_exposes_its_fields() {
        let token = LevelToken::assemble("AHsA", "ce770eed");
        assert_eq!(token.as_str(), "AHsA.ce770eed");
        assert_eq!(token.payload(), "AHsA");
        assert_eq!(token.checksum(), "ce770eed");
        assert_eq!(token.share_fragment(), "XDX1.AHsA.ce770eed");
        assert_eq!(token.to_string(), token.as_str());
    }

    #[test]
    fn fragment_requires_version_tag() {
        assert_eq!(parse_fragment("#XDX1.abc.def").expect("tagged"), "abc.def");
        assert_eq!(parse_fragment("XDX1.abc.def").expect("tagged"), "abc.def");
        assert_eq!(parse_fragment("#XDX1.").expect("tagged"), "");
        for fragment in ["", "#", "##XDX1.abc.def", "XDX2.abc.def", "xdx1.abc", "XDX1abc"] {
            assert!(
                matches!(parse_fragment(fragment), Err(CodecError::UnsupportedVersion)),
                "{fragment:?}"
            );
        }
    }

    #[test]
    fn token_needs_exactly_two_fields() {
        assert_eq!(split_token("abc.def").expect("two"), ("abc", "def"));
        for token in ["", "abc", "abc.", ".def", "a.b.c"] {
            assert!(
                matches!(split_token(token), Err(CodecError::MalformedToken)),
                "{token:?}"
            );
        }
    }
}

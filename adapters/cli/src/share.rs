use xodex_core::{CodecError, TOKEN_DELIMITER, VERSION};
use xodex_system_level_codec::{parse_fragment, LevelToken};

/// Builds a link that opens `token` on the page at `base`.
#[must_use]
pub(crate) fn share_link(base: &str, token: &LevelToken) -> String {
    format!("{base}#{}", token.share_fragment())
}

/// Accepts a share link, a `#XDX1.` fragment, or a bare level token and
/// returns the bare token.
pub(crate) fn extract_token(input: &str) -> Result<&str, CodecError> {
    let input = input.trim();
    if let Some(index) = input.rfind('#') {
        return parse_fragment(&input[index..]);
    }

    let versioned = input
        .strip_prefix(VERSION)
        .is_some_and(|rest| rest.starts_with(TOKEN_DELIMITER));
    if versioned {
        parse_fragment(input)
    } else {
        Ok(input)
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adaptive dictionary (LZW) compression tuned for compact level text.
//!
//! The input is a sequence of UTF-16 code units. Units below 256 are their
//! own literal codes; larger units would collide with phrase codes and are
//! rejected. Every time the current match cannot be extended, the match
//! extended by one unit is assigned the next free code starting at
//! [`FIRST_PHRASE_CODE`]. The encoder keeps a phrase-to-code map and the
//! decoder a code-to-phrase table; both grow by exactly one entry per emitted
//! code after the first, which keeps them in lockstep.

use std::collections::HashMap;

use tracing::trace;
use xodex_core::CodecError;

/// First code assigned to a multi-unit phrase.
pub const FIRST_PHRASE_CODE: u32 = 256;

/// Compresses UTF-16 `input` into a sequence of LZW codes.
///
/// Fails with [`CodecError::UnencodableCharacter`] when a unit is not a
/// literal. The dictionary is unbounded, so long inputs can yield codes
/// beyond the 16-bit range; framing rejects those explicitly.
pub fn compress(input: &[u16]) -> Result<Vec<u32>, CodecError> {
    if let Some(&unit) = input
        .iter()
        .find(|&&unit| u32::from(unit) >= FIRST_PHRASE_CODE)
    {
        return Err(CodecError::UnencodableCharacter { unit });
    }
    let Some((&first, rest)) = input.split_first() else {
        return Ok(Vec::new());
    };

    let mut phrases: HashMap<Vec<u16>, u32> = HashMap::new();
    let mut codes = Vec::new();
    let mut next_code = FIRST_PHRASE_CODE;
    let mut phrase = vec![first];
    let mut current = u32::from(first);

    for &unit in rest {
        phrase.push(unit);
        if let Some(&code) = phrases.get(&phrase) {
            current = code;
            continue;
        }

        codes.push(current);
        let _ = phrases.insert(std::mem::replace(&mut phrase, vec![unit]), next_code);
        next_code += 1;
        current = u32::from(unit);
    }
    codes.push(current);

    trace!(
        input = input.len(),
        codes = codes.len(),
        dictionary = phrases.len(),
        "lzw compressed"
    );
    Ok(codes)
}

/// Rebuilds the UTF-16 units produced by [`compress`].
///
/// Fails with [`CodecError::CorruptPayload`] when the first code is not a
/// literal or a code refers past the phrase currently being defined.
pub fn decompress(codes: &[u32]) -> Result<Vec<u16>, CodecError> {
    let Some((&first, rest)) = codes.split_first() else {
        return Ok(Vec::new());
    };
    let first = literal(first).ok_or(CodecError::CorruptPayload {
        reason: "first code is not a literal",
    })?;

    let mut phrases: Vec<Vec<u16>> = Vec::new();
    let mut previous = vec![first];
    let mut output = previous.clone();

    for &code in rest {
        let current = match literal(code) {
            Some(unit) => vec![unit],
            None => {
                let index = (code - FIRST_PHRASE_CODE) as usize;
                match phrases.get(index) {
                    Some(phrase) => phrase.clone(),
                    // The code being defined right now: previous + previous[0].
                    None if index == phrases.len() => {
                        let mut phrase = previous.clone();
                        phrase.push(previous[0]);
                        phrase
                    }
                    None => {
                        return Err(CodecError::CorruptPayload {
                            reason: "code refers to an undefined phrase",
                        })
                    }
                }
            }
        };

        output.extend_from_slice(&current);
        let mut entry = previous;
        entry.push(current[0]);
        phrases.push(entry);
        previous = current;
    }

    trace!(
        codes = codes.len(),
        output = output.len(),
        "lzw decompressed"
    );
    Ok(output)
}

fn literal(code: u32) -> Option<u16> {
    if code < FIRST_PHRASE_CODE {
        u16::try_from(code).ok()
    } else {
        None
    }
}

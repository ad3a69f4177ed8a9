//! Reversible byte ↔ visible-codepoint mapping (the GPT-2 byte encoder).
//!
//! BPE vocabularies are keyed by printable text, but pre-tokens can contain
//! arbitrary bytes. This module maintains a bijection between the 256 byte
//! values and a set of visible codepoints so that raw bytes can travel
//! through text-only tokenizer interfaces and back.
//!
//! The mapping keeps three visible ASCII/Latin-1 ranges as identity
//! (`0x21..=0x7E`, `0xA1..=0xAC`, `0xAE..=0xFF`) and assigns each remaining
//! byte, in ascending order, the next unused codepoint starting at `U+0100`.
//! Space (`0x20`) therefore becomes `Ġ` (`U+0120`).

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use super::error::{PreTokenizerError, Result};
use super::utf8::{cpts_from_utf8, cpts_to_utf8};

/// Byte value → visible codepoint, for all 256 bytes.
static BYTE_TO_CHAR: LazyLock<[char; 256]> = LazyLock::new(|| {
    let mut mapping = ['\0'; 256];
    let mut assigned = [false; 256];

    for b in (0x21u16..=0x7E).chain(0xA1..=0xAC).chain(0xAE..=0xFF) {
        mapping[b as usize] = char::from_u32(b as u32).unwrap();
        assigned[b as usize] = true;
    }

    let mut next = 256u32;
    for b in 0..256 {
        if !assigned[b] {
            mapping[b] = char::from_u32(next).unwrap();
            next += 1;
        }
    }

    mapping
});

/// Visible codepoint → byte value; exact inverse of [`BYTE_TO_CHAR`].
static CHAR_TO_BYTE: LazyLock<FxHashMap<char, u8>> = LazyLock::new(|| {
    BYTE_TO_CHAR
        .iter()
        .enumerate()
        .map(|(byte, &ch)| (ch, byte as u8))
        .collect()
});

/// The visible-codepoint UTF-8 string assigned to `byte`.
#[inline]
pub fn byte_to_utf8(byte: u8) -> String {
    BYTE_TO_CHAR[byte as usize].to_string()
}

/// Inverse of [`byte_to_utf8`].
///
/// Fails with [`PreTokenizerError::UnknownEncodedByte`] unless the input is
/// exactly one of the 256 mapped single-codepoint strings.
pub fn utf8_to_byte(utf8: &str) -> Result<u8> {
    let mut chars = utf8.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if let Some(&byte) = CHAR_TO_BYTE.get(&ch) {
            return Ok(byte);
        }
    }
    Err(PreTokenizerError::UnknownEncodedByte(utf8.to_string()))
}

/// Byte-encode a list of pre-tokens.
///
/// Each pre-token is first normalized through the codec (decode to
/// codepoints, re-encode; malformed sequences fail here), then every byte
/// of the normalized form is replaced by its visible codepoint.
pub fn byte_encoding_process(pre_tokens: &[String]) -> Result<Vec<String>> {
    let mut encoded = Vec::with_capacity(pre_tokens.len());
    for token in pre_tokens {
        let cpts = cpts_from_utf8(token.as_bytes())?;
        let normalized = cpts_to_utf8(&cpts)?;
        let mut out = String::with_capacity(normalized.len() * 2);
        for &b in &normalized {
            out.push(BYTE_TO_CHAR[b as usize]);
        }
        encoded.push(out);
    }
    Ok(encoded)
}

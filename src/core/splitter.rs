//! Top-level driver: apply an ordered list of splitter patterns to a text
//! and return byte-encoded pre-tokens.
//!
//! Each pattern refines a list of segment offsets (lengths in codepoints).
//! The two recognized pattern strings dispatch to the hand-written state
//! machines; everything else goes through the generic regex fallback. The
//! sum of the offsets equals the codepoint count of the input after every
//! stage.

use super::byte_level::byte_encoding_process;
use super::error::{PreTokenizerError, Result};
use super::fallback::{collapse_text, split_collapsed, split_wide, uses_category};
use super::gpt2::split_gpt2;
use super::llama3::split_llama3;
use super::utf8::{cpts_from_utf8, cpts_to_utf8};

/// The GPT-2 pre-token pattern, dispatched to the hand-written machine on
/// exact match.
pub const GPT2_SPLIT_PATTERN: &str =
    r"'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)";

/// The LLaMA-3 pre-token pattern, dispatched to the hand-written machine on
/// exact match.
pub const LLAMA3_SPLIT_PATTERN: &str = r"(?i:'s|'t|'re|'ve|'m|'ll|'d)|[^\r\n\p{L}\p{N}]?\p{L}+|\p{N}{1,3}| ?[^\s\p{L}\p{N}]+[\r\n]*|\s*[\r\n]+|\s+(?!\S)|\s+";

/// Second accepted spelling of the LLaMA-3 pattern, with the
/// case-insensitive group written out explicitly.
pub const LLAMA3_SPLIT_PATTERN_EXPANDED: &str = r"(?:'[sS]|'[tT]|'[rR][eE]|'[vV][eE]|'[mM]|'[lL][lL]|'[dD])|[^\r\n\p{L}\p{N}]?\p{L}+|\p{N}{1,3}| ?[^\s\p{L}\p{N}]+[\r\n]*|\s*[\r\n]+|\s+(?!\S)|\s+";

/// Split `text` into byte-encoded pre-tokens by applying `patterns` in
/// order.
///
/// The text is decoded once; every splitter stage partitions the same
/// codepoint range. Pattern strings equal to one of the recognized
/// constants run on the hand-written machines; any other pattern runs
/// through the regex fallback, collapsed when it mentions `\p{N}`, `\p{L}`
/// or `\p{P}`.
pub fn regex_split(text: &str, patterns: &[&str]) -> Result<Vec<String>> {
    let cpts = cpts_from_utf8(text.as_bytes())?;

    // Built lazily, at most once each: the collapsed buffer for category
    // patterns, the codepoint → byte-offset index for direct patterns.
    let mut collapsed: Option<Vec<u8>> = None;
    let mut byte_starts: Option<Vec<usize>> = None;

    let mut offsets = vec![cpts.len()];
    for &pattern in patterns {
        offsets = if pattern == GPT2_SPLIT_PATTERN {
            split_gpt2(&cpts, &offsets)
        } else if pattern == LLAMA3_SPLIT_PATTERN || pattern == LLAMA3_SPLIT_PATTERN_EXPANDED {
            split_llama3(&cpts, &offsets)
        } else if uses_category(pattern) {
            let collapsed = collapsed.get_or_insert_with(|| collapse_text(&cpts));
            split_collapsed(collapsed, pattern, &offsets)?
        } else {
            let byte_starts = byte_starts.get_or_insert_with(|| {
                text.char_indices()
                    .map(|(i, _)| i)
                    .chain([text.len()])
                    .collect()
            });
            split_wide(text, byte_starts, pattern, &offsets)?
        };
        debug_assert_eq!(offsets.iter().sum::<usize>(), cpts.len());
    }

    let mut words = Vec::with_capacity(offsets.len());
    let mut start = 0;
    for len in offsets {
        let bytes = cpts_to_utf8(&cpts[start..start + len])?;
        let word = String::from_utf8(bytes)
            .map_err(|e| PreTokenizerError::InvalidUtf8(e.utf8_error().valid_up_to()))?;
        words.push(word);
        start += len;
    }

    byte_encoding_process(&words)
}

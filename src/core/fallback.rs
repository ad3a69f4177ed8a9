//! Generic regex fallback with category collapse.
//!
//! Regex engines disagree on `\p{…}` support and on the encoding their
//! character classes assume. For patterns that mention `\p{N}`, `\p{L}` or
//! `\p{P}`, the text is "collapsed" to one byte per codepoint: ASCII keeps
//! its value and every other codepoint becomes a category stand-in byte
//! (`0xD1` number, `0xD2` letter, `0xD3` punctuation, `0xD0` otherwise).
//! The pattern is rewritten in parallel, so a plain byte-oriented engine
//! can evaluate the category classes, and match positions in the collapsed
//! buffer are codepoint offsets in the original text.
//!
//! The stand-ins are UTF-8 lead bytes and never ASCII, so an ASCII-only
//! pattern cannot capture them by accident. A pattern that mixes `\p{…}`
//! with non-ASCII literals is rejected: the collapse would erase the
//! literal.
//!
//! Patterns without those classes skip the collapse and run directly over
//! the text through an engine with native Unicode support.

use super::error::{PreTokenizerError, Result};
use super::flags::{cpt_flags, CodepointFlags};

/// Stand-in bytes for collapsed non-ASCII codepoints.
const COLLAPSE_NUMBER: u8 = 0xD1;
const COLLAPSE_LETTER: u8 = 0xD2;
const COLLAPSE_PUNCTUATION: u8 = 0xD3;
const COLLAPSE_OTHER: u8 = 0xD0;

/// The three rewritten category classes, with their stand-in escape and the
/// ASCII ranges that belong to the class.
const CATEGORY_SUBSTITUTIONS: [(&str, &str, &str); 3] = [
    (r"\p{N}", r"\xD1", "0-9"),
    (r"\p{L}", r"\xD2", "A-Za-z"),
    (r"\p{P}", r"\xD3", r"!-#%-*,-/:-;?-@\[-\]_\{\}"),
];

/// Whether `pattern` mentions a category class the collapse can express.
pub(crate) fn uses_category(pattern: &str) -> bool {
    CATEGORY_SUBSTITUTIONS
        .iter()
        .any(|(class, _, _)| pattern.contains(class))
}

/// Collapse `cpts` to one byte per codepoint.
pub(crate) fn collapse_text(cpts: &[u32]) -> Vec<u8> {
    cpts.iter()
        .map(|&cp| {
            if cp < 128 {
                return cp as u8;
            }
            match cpt_flags(cp).category() {
                CodepointFlags::NUMBER => COLLAPSE_NUMBER,
                CodepointFlags::LETTER => COLLAPSE_LETTER,
                CodepointFlags::PUNCTUATION => COLLAPSE_PUNCTUATION,
                _ => COLLAPSE_OTHER,
            }
        })
        .collect()
}

/// Rewrite `pattern` for matching over collapsed text.
///
/// The scanner tracks whether it is inside a `[…]` class (`\[` and `\]` do
/// not toggle) and replaces exactly the 5-character form `\p{X}` for the
/// recognized categories, wrapping the substitution in a fresh class when
/// outside one. Everything else is copied through.
fn collapse_pattern(pattern: &str) -> Result<String> {
    if !pattern.is_ascii() {
        return Err(PreTokenizerError::MixedCategoryAndLiteral);
    }

    let bytes = pattern.as_bytes();
    let mut collapsed = String::with_capacity(pattern.len() + 16);
    let mut inside = false;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' && (i == 0 || bytes[i - 1] != b'\\') {
            collapsed.push('[');
            inside = true;
            i += 1;
            continue;
        }
        if inside && bytes[i] == b']' && bytes[i - 1] != b'\\' {
            collapsed.push(']');
            inside = false;
            i += 1;
            continue;
        }
        if bytes[i] == b'\\'
            && i + 4 < bytes.len()
            && bytes[i + 1] == b'p'
            && bytes[i + 2] == b'{'
            && bytes[i + 4] == b'}'
        {
            let class = &pattern[i..i + 5];
            if let Some((_, stand_in, ascii)) = CATEGORY_SUBSTITUTIONS
                .iter()
                .find(|(name, _, _)| *name == class)
            {
                if !inside {
                    collapsed.push('[');
                }
                collapsed.push_str(stand_in);
                collapsed.push_str(ascii);
                if !inside {
                    collapsed.push(']');
                }
                i += 5;
                continue;
            }
        }
        collapsed.push(bytes[i] as char);
        i += 1;
    }

    Ok(collapsed)
}

fn regex_failure(pattern: &str, message: impl std::fmt::Display) -> PreTokenizerError {
    let message = message.to_string();
    log::error!("failed to process regex {pattern:?}: {message}");
    PreTokenizerError::RegexFailure {
        pattern: pattern.to_string(),
        message,
    }
}

/// Emit the matches of one segment as offsets, with unmatched gaps (and the
/// unmatched tail) emitted as offsets of their own.
fn push_matches<I>(out: &mut Vec<usize>, matches: I, segment_len: usize)
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut start_idx = 0;
    for (match_start, match_end) in matches {
        if match_start > start_idx {
            out.push(match_start - start_idx);
        }
        out.push(match_end - match_start);
        start_idx = match_end;
    }
    if start_idx < segment_len {
        out.push(segment_len - start_idx);
    }
}

/// Split over the collapsed buffer with a byte-oriented engine.
///
/// One byte per codepoint, so match byte offsets are codepoint offsets.
pub(crate) fn split_collapsed(
    collapsed: &[u8],
    pattern: &str,
    offsets: &[usize],
) -> Result<Vec<usize>> {
    let rewritten = collapse_pattern(pattern)?;
    let re = regex::bytes::RegexBuilder::new(&rewritten)
        .unicode(false)
        .build()
        .map_err(|e| regex_failure(pattern, e))?;

    let mut out = Vec::with_capacity(offsets.len());
    let mut start = 0;
    for &offset in offsets {
        let segment = &collapsed[start..start + offset];
        start += offset;
        push_matches(
            &mut out,
            re.find_iter(segment).map(|m| (m.start(), m.end())),
            offset,
        );
    }
    Ok(out)
}

/// Split directly over the original text with a Unicode-aware engine.
///
/// `cpt_byte_starts` maps codepoint index to byte offset (with a final
/// entry at `text.len()`), used both to slice segments and to convert match
/// byte offsets back into codepoint counts.
pub(crate) fn split_wide(
    text: &str,
    cpt_byte_starts: &[usize],
    pattern: &str,
    offsets: &[usize],
) -> Result<Vec<usize>> {
    let re = fancy_regex::Regex::new(pattern).map_err(|e| regex_failure(pattern, e))?;

    let mut out = Vec::with_capacity(offsets.len());
    let mut start = 0;
    for &offset in offsets {
        let seg_starts = &cpt_byte_starts[start..=start + offset];
        let seg_base = seg_starts[0];
        let segment = &text[seg_base..seg_starts[offset]];
        start += offset;

        let mut matches = Vec::new();
        for m in re.find_iter(segment) {
            let m = m.map_err(|e| regex_failure(pattern, e))?;
            let cp_start = seg_starts.partition_point(|&s| s < seg_base + m.start());
            let cp_end = seg_starts.partition_point(|&s| s < seg_base + m.end());
            matches.push((cp_start, cp_end));
        }
        push_matches(&mut out, matches, offset);
    }
    Ok(out)
}

//! Hand-written state machine for the GPT-2 pre-token pattern:
//!
//! ```text
//! 's|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+
//! ```
//!
//! Regex engines disagree on Unicode category semantics, so the pattern is
//! evaluated directly against the flag table. Each input segment is scanned
//! left to right; rules are tried in the order above and the first match
//! consumes.

use super::flags::{cpt_flags, CodepointFlags};

const SPACE: u32 = ' ' as u32;
const APOSTROPHE: u32 = '\'' as u32;

/// Refine `offsets` (segment lengths in codepoints over `cpts`) with the
/// GPT-2 rules. The returned offsets partition the same codepoint range.
pub(crate) fn split_gpt2(cpts: &[u32], offsets: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(offsets.len());

    let mut start = 0;
    for &offset in offsets {
        let offset_ini = start;
        let offset_end = start + offset;
        debug_assert!(offset_end <= cpts.len());
        start = offset_end;

        // Reads outside the segment yield codepoint 0 / UNDEFINED, which no
        // rule matches, so runs stop at segment boundaries.
        let get_cpt = |pos: usize| -> u32 {
            if (offset_ini..offset_end).contains(&pos) {
                cpts[pos]
            } else {
                0
            }
        };
        let get_flags = |pos: usize| -> CodepointFlags {
            if (offset_ini..offset_end).contains(&pos) {
                cpt_flags(cpts[pos])
            } else {
                CodepointFlags::undefined()
            }
        };

        let mut prev_end = offset_ini;
        let mut push_token = |out: &mut Vec<usize>, end: usize| {
            debug_assert!(prev_end <= end && end <= offset_end);
            if end > prev_end {
                out.push(end - prev_end);
            }
            prev_end = end;
        };

        let mut pos = offset_ini;
        while pos < offset_end {
            let cpt = get_cpt(pos);
            let flags = get_flags(pos);

            // 's|'t|'re|'ve|'m|'ll|'d
            if cpt == APOSTROPHE && pos + 1 < offset_end {
                let cpt_next = get_cpt(pos + 1);
                if matches!(cpt_next, 0x73 | 0x74 | 0x6D | 0x64) {
                    // 's 't 'm 'd
                    pos += 2;
                    push_token(&mut out, pos);
                    continue;
                }
                if pos + 2 < offset_end {
                    let cpt_next_next = get_cpt(pos + 2);
                    let two = (cpt_next, cpt_next_next);
                    if two == (0x72, 0x65) || two == (0x76, 0x65) || two == (0x6C, 0x6C) {
                        // 're 've 'll
                        pos += 3;
                        push_token(&mut out, pos);
                        continue;
                    }
                }
            }

            let mut flags2 = if cpt == SPACE { get_flags(pos + 1) } else { flags };

            // <space>?\p{L}+
            if flags2.is_letter() {
                if cpt == SPACE {
                    pos += 1;
                }
                while flags2.is_letter() {
                    pos += 1;
                    flags2 = get_flags(pos);
                }
                push_token(&mut out, pos);
                continue;
            }

            // <space>?\p{N}+
            if flags2.is_number() {
                if cpt == SPACE {
                    pos += 1;
                }
                while flags2.is_number() {
                    pos += 1;
                    flags2 = get_flags(pos);
                }
                push_token(&mut out, pos);
                continue;
            }

            // <space>?[^\s\p{L}\p{N}]+
            if !(flags2.is_whitespace()
                || flags2.is_letter()
                || flags2.is_number()
                || flags2.is_undefined())
            {
                if cpt == SPACE {
                    pos += 1;
                }
                while !(flags2.is_whitespace()
                    || flags2.is_letter()
                    || flags2.is_number()
                    || flags2.is_undefined())
                {
                    pos += 1;
                    flags2 = get_flags(pos);
                }
                push_token(&mut out, pos);
                continue;
            }

            let mut num_whitespaces = 0;
            while get_flags(pos + num_whitespaces).is_whitespace() {
                num_whitespaces += 1;
            }

            // \s+(?!\S): keep the last whitespace for the following token.
            if num_whitespaces > 1 && get_cpt(pos + num_whitespaces) != 0 {
                pos += num_whitespaces - 1;
                push_token(&mut out, pos);
                continue;
            }

            // \s+
            if num_whitespaces > 0 {
                pos += num_whitespaces;
                push_token(&mut out, pos);
                continue;
            }

            // no match: single codepoint token
            pos += 1;
            push_token(&mut out, pos);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        let cpts: Vec<u32> = text.chars().map(|c| c as u32).collect();
        let offsets = split_gpt2(&cpts, &[cpts.len()]);
        assert_eq!(offsets.iter().sum::<usize>(), cpts.len());
        let mut tokens = Vec::new();
        let mut start = 0;
        for len in offsets {
            tokens.push(cpts[start..start + len].iter().map(|&c| char::from_u32(c).unwrap()).collect());
            start += len;
        }
        tokens
    }

    #[test]
    fn test_hello_world() {
        assert_eq!(split("Hello, world!"), vec!["Hello", ",", " world", "!"]);
    }

    #[test]
    fn test_contractions() {
        assert_eq!(split("it's"), vec!["it", "'s"]);
        assert_eq!(split("we're you've I'll he'd I'm"), vec![
            "we", "'re", " you", "'ve", " I", "'ll", " he", "'d", " I", "'m"
        ]);
        // Uppercase contractions are not recognized by the GPT-2 rule.
        assert_eq!(split("IT'S"), vec!["IT", "'", "S"]);
    }

    #[test]
    fn test_apostrophe_without_contraction() {
        // No contraction suffix: the apostrophe falls through to the
        // symbol-run rule and the letter starts a fresh token.
        assert_eq!(split("'x"), vec!["'", "x"]);
        assert_eq!(split("can't'"), vec!["can", "'t", "'"]);
    }

    #[test]
    fn test_whitespace_keeps_one_for_next_token() {
        assert_eq!(split("  a"), vec![" ", " a"]);
        assert_eq!(split("   ab"), vec!["  ", " ab"]);
    }

    #[test]
    fn test_trailing_whitespace_consumed_whole() {
        assert_eq!(split("a  "), vec!["a", "  "]);
        assert_eq!(split("   "), vec!["   "]);
    }

    #[test]
    fn test_number_runs() {
        assert_eq!(split("abc 123 x4"), vec!["abc", " 123", " x", "4"]);
        assert_eq!(split("99bottles"), vec!["99", "bottles"]);
    }

    #[test]
    fn test_symbol_run_with_leading_space() {
        assert_eq!(split("a !!!"), vec!["a", " !!!"]);
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(split("héllo wörld"), vec!["héllo", " wörld"]);
        assert_eq!(split("日本語 text"), vec!["日本語", " text"]);
    }

    #[test]
    fn test_segments_are_independent() {
        // A segment boundary splits what would otherwise be one letter run.
        let cpts: Vec<u32> = "abcd".chars().map(|c| c as u32).collect();
        let offsets = split_gpt2(&cpts, &[2, 2]);
        assert_eq!(offsets, vec![2, 2]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split("").is_empty());
    }
}

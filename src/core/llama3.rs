//! Hand-written state machine for the LLaMA-3 pre-token pattern:
//!
//! ```text
//! (?i:'s|'t|'re|'ve|'m|'ll|'d)|[^\r\n\p{L}\p{N}]?\p{L}+|\p{N}{1,3}| ?[^\s\p{L}\p{N}]+[\r\n]*|\s*[\r\n]+|\s+(?!\S)|\s+
//! ```
//!
//! Same cursor discipline as the GPT-2 machine, with three differences:
//! contractions match case-insensitively, digit runs are chunked in groups
//! of three, and CR/LF get dedicated handling in the symbol and whitespace
//! rules.
//!
//! The letter rule reproduces a quirk of the reference pattern: its first
//! advance is unconditional, so a leading letter is admitted just like a
//! single non-letter prefix. Bit-exact output requires keeping it.

use super::flags::{cpt_flags, tolower, CodepointFlags};

const SPACE: u32 = ' ' as u32;
const APOSTROPHE: u32 = '\'' as u32;
const CR: u32 = '\r' as u32;
const LF: u32 = '\n' as u32;

/// Refine `offsets` (segment lengths in codepoints over `cpts`) with the
/// LLaMA-3 rules. The returned offsets partition the same codepoint range.
pub(crate) fn split_llama3(cpts: &[u32], offsets: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(offsets.len());

    let mut start = 0;
    for &offset in offsets {
        let offset_ini = start;
        let offset_end = start + offset;
        debug_assert!(offset_end <= cpts.len());
        start = offset_end;

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

            // (?i:'s|'t|'re|'ve|'m|'ll|'d)
            if cpt == APOSTROPHE && pos + 1 < offset_end {
                let cpt_next = tolower(get_cpt(pos + 1));
                if matches!(cpt_next, 0x73 | 0x74 | 0x6D | 0x64) {
                    // 's 't 'm 'd
                    pos += 2;
                    push_token(&mut out, pos);
                    continue;
                }
                if pos + 2 < offset_end {
                    let cpt_next_next = tolower(get_cpt(pos + 2));
                    let two = (cpt_next, cpt_next_next);
                    if two == (0x72, 0x65) || two == (0x76, 0x65) || two == (0x6C, 0x6C) {
                        // 're 've 'll
                        pos += 3;
                        push_token(&mut out, pos);
                        continue;
                    }
                }
            }

            // [^\r\n\p{L}\p{N}]?\p{L}+ (the first advance is unconditional,
            // so a leading letter also enters here)
            if !(cpt == CR || cpt == LF || flags.is_number())
                && (flags.is_letter() || get_flags(pos + 1).is_letter())
            {
                pos += 1;
                while get_flags(pos).is_letter() {
                    pos += 1;
                }
                push_token(&mut out, pos);
                continue;
            }

            // \p{N}{1,3}: emit an intermediate token every third digit.
            if flags.is_number() {
                let mut ini = pos;
                while get_flags(pos).is_number() {
                    pos += 1;
                    if pos - ini >= 3 {
                        push_token(&mut out, pos);
                        ini = pos;
                    }
                }
                push_token(&mut out, pos);
                continue;
            }

            // <space>?[^\s\p{L}\p{N}]+[\r\n]*
            let mut flags2 = if cpt == SPACE { get_flags(pos + 1) } else { flags };
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
                let mut cpt2 = get_cpt(pos);
                while cpt2 == CR || cpt2 == LF {
                    pos += 1;
                    cpt2 = get_cpt(pos);
                }
                push_token(&mut out, pos);
                continue;
            }

            let mut num_whitespaces = 0;
            let mut last_end_r_or_n = 0;
            while get_flags(pos + num_whitespaces).is_whitespace() {
                let cpt2 = get_cpt(pos + num_whitespaces);
                if cpt2 == CR || cpt2 == LF {
                    last_end_r_or_n = pos + num_whitespaces + 1;
                }
                num_whitespaces += 1;
            }

            // \s*[\r\n]+: cut right after the last CR/LF of the run.
            if last_end_r_or_n > 0 {
                pos = last_end_r_or_n;
                push_token(&mut out, pos);
                continue;
            }

            // \s+(?!\S)
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

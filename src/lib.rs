//! pretok - Unicode-aware pre-tokenization core for BPE tokenizers
//!
//! Given raw text and an ordered list of splitter patterns, `pretok`
//! partitions the text into the pre-token strings that BPE merging
//! operates on:
//!
//! - Hand-written state machines for the GPT-2 and LLaMA-3 splitter
//!   patterns, evaluated against a process-wide Unicode property table
//!   instead of a regex engine
//! - A category-collapse fallback that lets plain regex engines evaluate
//!   `\p{L}`/`\p{N}`/`\p{P}` classes portably for any other pattern
//! - A permissive UTF-8 ↔ codepoint codec
//! - The reversible GPT-2 byte encoder mapping raw bytes to visible
//!   codepoints
//!
//! ```
//! use pretok::{regex_split, GPT2_SPLIT_PATTERN};
//!
//! let tokens = regex_split("Hello, world!", &[GPT2_SPLIT_PATTERN]).unwrap();
//! assert_eq!(tokens, vec!["Hello", ",", "Ġworld", "!"]);
//! ```

pub mod core;

pub use crate::core::{
    byte_encoding_process, byte_to_utf8, cpt_flags, cpt_flags_from_utf8, cpt_to_utf8,
    cpts_from_utf8, cpts_to_utf8, normalize_nfd, regex_split, tolower, toupper, utf8_to_byte,
    CodepointFlags, PreTokenizerError, Result, GPT2_SPLIT_PATTERN, LLAMA3_SPLIT_PATTERN,
    LLAMA3_SPLIT_PATTERN_EXPANDED, MAX_CODEPOINTS,
};

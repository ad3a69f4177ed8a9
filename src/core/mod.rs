//! Pre-tokenization core.
//!
//! The pipeline turns raw text into byte-encoded pre-tokens for BPE
//! merging:
//!
//! ```text
//! text → codepoints → offsets ← (each splitter refines) → pre-tokens → byte-encoded
//! ```
//!
//! # Architecture
//!
//! - [`utf8`]: UTF-8 ↔ codepoint codec, deliberately permissive on decode
//! - [`flags`]: per-codepoint property flags backed by process-wide tables
//! - [`byte_level`]: reversible byte ↔ visible-codepoint mapping
//! - `gpt2` / `llama3`: hand-written splitter state machines for the two
//!   recognized patterns
//! - `fallback`: category-collapse regex fallback for everything else
//! - `splitter`: the [`regex_split`] driver tying the stages together
//!
//! The property and byte tables are built on first use and immutable
//! afterwards; every public function is a pure function of its inputs plus
//! those tables.

pub mod byte_level;
pub mod error;
pub mod flags;
pub mod utf8;

mod fallback;
mod gpt2;
mod llama3;
mod splitter;

pub use byte_level::{byte_encoding_process, byte_to_utf8, utf8_to_byte};
pub use error::{PreTokenizerError, Result};
pub use flags::{cpt_flags, cpt_flags_from_utf8, normalize_nfd, tolower, toupper, CodepointFlags};
pub use splitter::{
    regex_split, GPT2_SPLIT_PATTERN, LLAMA3_SPLIT_PATTERN, LLAMA3_SPLIT_PATTERN_EXPANDED,
};
pub use utf8::{cpt_to_utf8, cpts_from_utf8, cpts_to_utf8, MAX_CODEPOINTS};

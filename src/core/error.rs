//! Error types for the pre-tokenization core.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PreTokenizerError>;

/// Errors surfaced by the pre-tokenization core.
///
/// All errors propagate to the caller; a failed stage aborts the whole
/// [`regex_split`](crate::regex_split) call.
#[derive(Error, Debug)]
pub enum PreTokenizerError {
    /// Malformed byte sequence encountered while decoding UTF-8.
    #[error("invalid UTF-8 sequence at byte offset {0}")]
    InvalidUtf8(usize),

    /// Codepoint outside `0..=0x10FFFF` passed to the encoder.
    #[error("codepoint {0:#X} is out of range")]
    InvalidCodepoint(u32),

    /// Reverse byte-map lookup failed: the string is not one of the 256
    /// visible-codepoint encodings.
    #[error("unknown encoded byte: {0:?}")]
    UnknownEncodedByte(String),

    /// The fallback regex could not be compiled or executed.
    #[error("failed to process regex {pattern:?}: {message}")]
    RegexFailure { pattern: String, message: String },

    /// A pattern combines `\p{...}` categories with non-ASCII literals,
    /// which the collapsed representation cannot express.
    #[error("regex combines unicode categories and non-ASCII literals")]
    MixedCategoryAndLiteral,
}

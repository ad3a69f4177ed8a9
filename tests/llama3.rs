//! Integration tests for the LLaMA-3 splitter path.
//!
//! Both recognized spellings of the pattern must dispatch to the same
//! hand-written machine and therefore agree on every input.

use pretok::{
    regex_split, utf8_to_byte, LLAMA3_SPLIT_PATTERN, LLAMA3_SPLIT_PATTERN_EXPANDED,
};

#[test]
fn test_case_insensitive_contractions() {
    assert_eq!(split("It'S a Test\n"), vec!["It", "'S", " a", " Test", "\n"]);
    assert_eq!(split("YOU'RE"), vec!["YOU", "'RE"]);
    assert_eq!(split("i'M"), vec!["i", "'M"]);
}

#[test]
fn test_contraction_token_is_two_codepoints() {
    for text in ["it's", "it'S", "IT'd", "IT'D"] {
        let tokens = split(text);
        assert_eq!(tokens.len(), 2, "input {text:?}");
        assert_eq!(tokens[1].chars().count(), 2, "input {text:?}");
    }
}

#[test]
fn test_digit_runs_chunk_in_threes() {
    assert_eq!(split("1234567"), vec!["123", "456", "7"]);
    assert_eq!(split("42"), vec!["42"]);
    assert_eq!(split("phone 5551234"), vec!["phone", " ", "555", "123", "4"]);
}

#[test]
fn test_letter_run_takes_one_prefix_codepoint() {
    assert_eq!(split("#tag"), vec!["#tag"]);
    // A space is an admissible prefix too.
    assert_eq!(split("one two"), vec!["one", " two"]);
    // Only one prefix codepoint: the rule looks a single position ahead,
    // so " @user" leaves the letters to their own token.
    assert_eq!(split(" @user"), vec![" @", "user"]);
}

#[test]
fn test_crlf_runs_swallowed() {
    assert_eq!(split("Hello\r\n\r\n"), vec!["Hello", "\r\n\r\n"]);
    assert_eq!(split("Hello\n  \nWorld"), vec!["Hello", "\n  \n", "World"]);
}

#[test]
fn test_symbol_run_takes_trailing_newlines() {
    assert_eq!(split("end.\n\nNext"), vec!["end", ".\n\n", "Next"]);
}

#[test]
fn test_whitespace_before_non_whitespace() {
    assert_eq!(split("a   b"), vec!["a", "  ", " b"]);
}

#[test]
fn test_unicode_text() {
    assert_eq!(split("Grüße, 世界"), vec!["Grüße", ",", " 世界"]);
}

#[test]
fn test_both_spellings_agree() {
    for text in [
        "It'S a Test\n",
        "numbers 1234567 here",
        "mixed\r\ncase'LL input  ",
        "日本語123テキスト",
    ] {
        let compact = regex_split(text, &[LLAMA3_SPLIT_PATTERN]).unwrap();
        let expanded = regex_split(text, &[LLAMA3_SPLIT_PATTERN_EXPANDED]).unwrap();
        assert_eq!(compact, expanded, "input {text:?}");
    }
}

#[test]
fn test_concatenation_reproduces_input() {
    for text in [
        "The quick brown fox jumps over the lazy dog.",
        "it's   been \t a 'long'   day\r\n\r\n",
        "Ünïcødé テキスト 123456  !!",
    ] {
        assert_eq!(split(text).concat(), text, "input {text:?}");
    }
}

// Helper: split with the LLaMA-3 pattern and undo the byte encoding.
fn split(text: &str) -> Vec<String> {
    decode_tokens(&regex_split(text, &[LLAMA3_SPLIT_PATTERN]).unwrap())
}

fn decode_tokens(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| {
            let bytes: Vec<u8> = token
                .chars()
                .map(|ch| utf8_to_byte(&ch.to_string()).unwrap())
                .collect();
            String::from_utf8(bytes).unwrap()
        })
        .collect()
}

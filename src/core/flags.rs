//! Per-codepoint property flags and the static Unicode tables behind them.
//!
//! A dense array with one entry per codepoint (`0..0x110000`) is built on
//! first use and shared for the life of the process. Each entry packs a
//! mutually exclusive general category into the low byte and independent
//! whitespace/case/NFD overlay bits into the high byte.
//!
//! The tables are derived from pinned UCD data shipped by the
//! `unicode-properties` and `unicode-normalization` crates, with one
//! exception: the whitespace set is a literal table, because it follows
//! `\s` semantics (White_Space plus the four ASCII separators
//! `0x1C..=0x1F`) rather than the White_Space property alone.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use unicode_normalization::char::decompose_canonical;
use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

use super::error::Result;
use super::utf8::{cpt_from_utf8, MAX_CODEPOINTS};

/// Packed property flags for a single codepoint.
///
/// The low byte holds exactly one category bit; `category()` masks it out.
/// The high byte holds the independent overlay bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointFlags(u16);

impl CodepointFlags {
    /// Codepoint is unassigned (general category `Cn`), or out of range.
    pub const UNDEFINED: u16 = 0x0001;
    /// `\p{N}`: any numeric category.
    pub const NUMBER: u16 = 0x0002;
    /// `\p{L}`: any letter category.
    pub const LETTER: u16 = 0x0004;
    /// `\p{Z}`: space/line/paragraph separators.
    pub const SEPARATOR: u16 = 0x0008;
    /// `\p{M}`: combining marks.
    pub const ACCENT_MARK: u16 = 0x0010;
    /// `\p{P}`: any punctuation category.
    pub const PUNCTUATION: u16 = 0x0020;
    /// `\p{S}`: any symbol category.
    pub const SYMBOL: u16 = 0x0040;
    /// `\p{C}` minus `Cn`: control, format, private use, surrogate.
    pub const CONTROL: u16 = 0x0080;

    const MASK_CATEGORIES: u16 = 0x00FF;

    const WHITESPACE: u16 = 0x0100;
    const LOWERCASE: u16 = 0x0200;
    const UPPERCASE: u16 = 0x0400;
    const NFD: u16 = 0x0800;

    /// Flags of an unassigned codepoint.
    pub const fn undefined() -> Self {
        Self(Self::UNDEFINED)
    }

    const fn from_category(category: u16) -> Self {
        Self(category)
    }

    /// The mutually exclusive category bit, without the overlay bits.
    #[inline]
    pub fn category(self) -> u16 {
        self.0 & Self::MASK_CATEGORIES
    }

    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 & Self::UNDEFINED != 0
    }

    #[inline]
    pub fn is_number(self) -> bool {
        self.0 & Self::NUMBER != 0
    }

    #[inline]
    pub fn is_letter(self) -> bool {
        self.0 & Self::LETTER != 0
    }

    #[inline]
    pub fn is_separator(self) -> bool {
        self.0 & Self::SEPARATOR != 0
    }

    #[inline]
    pub fn is_accent_mark(self) -> bool {
        self.0 & Self::ACCENT_MARK != 0
    }

    #[inline]
    pub fn is_punctuation(self) -> bool {
        self.0 & Self::PUNCTUATION != 0
    }

    #[inline]
    pub fn is_symbol(self) -> bool {
        self.0 & Self::SYMBOL != 0
    }

    #[inline]
    pub fn is_control(self) -> bool {
        self.0 & Self::CONTROL != 0
    }

    #[inline]
    pub fn is_whitespace(self) -> bool {
        self.0 & Self::WHITESPACE != 0
    }

    #[inline]
    pub fn is_lowercase(self) -> bool {
        self.0 & Self::LOWERCASE != 0
    }

    #[inline]
    pub fn is_uppercase(self) -> bool {
        self.0 & Self::UPPERCASE != 0
    }

    /// Codepoint appears as the target of an NFD range.
    #[inline]
    pub fn is_nfd(self) -> bool {
        self.0 & Self::NFD != 0
    }
}

impl Default for CodepointFlags {
    fn default() -> Self {
        Self::undefined()
    }
}

/// A run of codepoints `first..=last` that all map to `nfd` under the
/// single-table decomposition.
#[derive(Debug, Clone, Copy)]
struct RangeNfd {
    first: u32,
    last: u32,
    nfd: u32,
}

/// Whitespace codepoints, `\s` semantics: the White_Space set plus the
/// ASCII file/group/record/unit separators `0x1C..=0x1F`.
static WHITESPACE: [u32; 29] = [
    0x0009, 0x000A, 0x000B, 0x000C, 0x000D, 0x001C, 0x001D, 0x001E, 0x001F, 0x0020, 0x0085,
    0x00A0, 0x1680, 0x2000, 0x2001, 0x2002, 0x2003, 0x2004, 0x2005, 0x2006, 0x2007, 0x2008,
    0x2009, 0x200A, 0x2028, 0x2029, 0x202F, 0x205F, 0x3000,
];

fn category_of(c: char) -> CodepointFlags {
    let category = match c.general_category_group() {
        GeneralCategoryGroup::Letter => CodepointFlags::LETTER,
        GeneralCategoryGroup::Mark => CodepointFlags::ACCENT_MARK,
        GeneralCategoryGroup::Number => CodepointFlags::NUMBER,
        GeneralCategoryGroup::Punctuation => CodepointFlags::PUNCTUATION,
        GeneralCategoryGroup::Symbol => CodepointFlags::SYMBOL,
        GeneralCategoryGroup::Separator => CodepointFlags::SEPARATOR,
        GeneralCategoryGroup::Other => match c.general_category() {
            GeneralCategory::Unassigned => CodepointFlags::UNDEFINED,
            // Cc, Cf, Co; Cs is unreachable through `char`.
            _ => CodepointFlags::CONTROL,
        },
    };
    CodepointFlags::from_category(category)
}

/// Run-length encoded category boundaries. Strictly increasing; the first
/// entry is `(0, ...)` and a `(0x110000, UNDEFINED)` terminator closes the
/// final half-open range.
fn category_range_boundaries() -> Vec<(u32, CodepointFlags)> {
    let mut boundaries: Vec<(u32, CodepointFlags)> = Vec::with_capacity(4096);
    for cp in 0..MAX_CODEPOINTS {
        let flags = match char::from_u32(cp) {
            Some(c) => category_of(c),
            // The surrogate block: category Cs.
            None => CodepointFlags::from_category(CodepointFlags::CONTROL),
        };
        match boundaries.last() {
            Some(&(_, prev)) if prev == flags => {}
            _ => boundaries.push((cp, flags)),
        }
    }
    boundaries.push((MAX_CODEPOINTS, CodepointFlags::undefined()));
    boundaries
}

/// One-to-one lowercase map: the single-scalar subset of the full lowercase
/// mapping. Codepoints whose lowercase form expands to several scalars keep
/// their identity.
static LOWERCASE_MAP: LazyLock<FxHashMap<u32, u32>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    for cp in 0..MAX_CODEPOINTS {
        let Some(c) = char::from_u32(cp) else { continue };
        let mut lower = c.to_lowercase();
        if let (Some(l), None) = (lower.next(), lower.next()) {
            if l != c {
                map.insert(cp, l as u32);
            }
        }
    }
    map
});

/// One-to-one uppercase map, same construction as [`LOWERCASE_MAP`].
static UPPERCASE_MAP: LazyLock<FxHashMap<u32, u32>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    for cp in 0..MAX_CODEPOINTS {
        let Some(c) = char::from_u32(cp) else { continue };
        let mut upper = c.to_uppercase();
        if let (Some(u), None) = (upper.next(), upper.next()) {
            if u != c {
                map.insert(cp, u as u32);
            }
        }
    }
    map
});

/// NFD ranges: maximal runs of consecutive codepoints whose canonical
/// decomposition starts with the same codepoint. Sorted by `first`.
static NFD_RANGES: LazyLock<Vec<RangeNfd>> = LazyLock::new(|| {
    let mut ranges: Vec<RangeNfd> = Vec::with_capacity(1024);
    for cp in 0..MAX_CODEPOINTS {
        let Some(c) = char::from_u32(cp) else { continue };
        let mut first_scalar = None;
        decompose_canonical(c, |d| {
            if first_scalar.is_none() {
                first_scalar = Some(d as u32);
            }
        });
        let Some(nfd) = first_scalar else { continue };
        if nfd == cp {
            continue;
        }
        match ranges.last_mut() {
            Some(range) if range.last + 1 == cp && range.nfd == nfd => range.last = cp,
            _ => ranges.push(RangeNfd { first: cp, last: cp, nfd }),
        }
    }
    ranges
});

/// The dense flag table: category ranges flattened, then the whitespace,
/// case-target and NFD-target overlays applied.
static FLAGS: LazyLock<Vec<CodepointFlags>> = LazyLock::new(|| {
    let boundaries = category_range_boundaries();
    let mut flags = vec![CodepointFlags::undefined(); MAX_CODEPOINTS as usize];

    debug_assert_eq!(boundaries.first().map(|&(cp, _)| cp), Some(0));
    debug_assert_eq!(boundaries.last().map(|&(cp, _)| cp), Some(MAX_CODEPOINTS));
    for pair in boundaries.windows(2) {
        let (ini, range_flags) = pair[0];
        let (end, _) = pair[1];
        for cp in ini..end {
            flags[cp as usize] = range_flags;
        }
    }

    for &cp in WHITESPACE.iter() {
        flags[cp as usize].0 |= CodepointFlags::WHITESPACE;
    }
    for &to in LOWERCASE_MAP.values() {
        flags[to as usize].0 |= CodepointFlags::LOWERCASE;
    }
    for &to in UPPERCASE_MAP.values() {
        flags[to as usize].0 |= CodepointFlags::UPPERCASE;
    }
    for range in NFD_RANGES.iter() {
        flags[range.nfd as usize].0 |= CodepointFlags::NFD;
    }

    flags
});

/// Look up the flags of a codepoint. Out-of-range values are UNDEFINED.
#[inline]
pub fn cpt_flags(cp: u32) -> CodepointFlags {
    FLAGS
        .get(cp as usize)
        .copied()
        .unwrap_or_else(CodepointFlags::undefined)
}

/// Flags of the first codepoint of `utf8`, or UNDEFINED when empty.
pub fn cpt_flags_from_utf8(utf8: &[u8]) -> Result<CodepointFlags> {
    if utf8.is_empty() {
        return Ok(CodepointFlags::undefined());
    }
    let mut offset = 0;
    Ok(cpt_flags(cpt_from_utf8(utf8, &mut offset)?))
}

/// Lowercase a codepoint through the one-to-one map; identity when unmapped.
#[inline]
pub fn tolower(cp: u32) -> u32 {
    LOWERCASE_MAP.get(&cp).copied().unwrap_or(cp)
}

/// Uppercase a codepoint through the one-to-one map; identity when unmapped.
#[inline]
pub fn toupper(cp: u32) -> u32 {
    UPPERCASE_MAP.get(&cp).copied().unwrap_or(cp)
}

/// Replace each codepoint falling inside an NFD range with that range's
/// target. The result always has the same length as the input.
pub fn normalize_nfd(cpts: &[u32]) -> Vec<u32> {
    let ranges = &*NFD_RANGES;
    cpts.iter()
        .map(|&cp| {
            let idx = ranges.partition_point(|r| r.first <= cp);
            if idx == 0 {
                return cp;
            }
            let range = &ranges[idx - 1];
            if cp <= range.last {
                range.nfd
            } else {
                cp
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_categories() {
        assert!(cpt_flags('a' as u32).is_letter());
        assert!(cpt_flags('Z' as u32).is_letter());
        assert!(cpt_flags('7' as u32).is_number());
        assert!(cpt_flags(',' as u32).is_punctuation());
        assert!(cpt_flags('+' as u32).is_symbol());
        assert!(cpt_flags(' ' as u32).is_separator());
        assert!(cpt_flags(0x0A).is_control());
    }

    #[test]
    fn test_non_ascii_categories() {
        assert!(cpt_flags(0x4E16).is_letter()); // 世
        assert!(cpt_flags(0x0301).is_accent_mark()); // combining acute
        assert!(cpt_flags(0x0660).is_number()); // arabic-indic digit zero
        assert!(cpt_flags(0x20AC).is_symbol()); // €
        assert!(cpt_flags(0x3001).is_punctuation()); // 、
    }

    #[test]
    fn test_categories_are_exclusive() {
        for cp in [0x41u32, 0x4E16, 0x0301, 0x20AC, 0x2028, 0x10FFFF] {
            let category = cpt_flags(cp).category();
            assert_eq!(category.count_ones(), 1, "cp {cp:#X}");
        }
    }

    #[test]
    fn test_whitespace_overlay() {
        for &cp in WHITESPACE.iter() {
            assert!(cpt_flags(cp).is_whitespace(), "cp {cp:#X}");
        }
        // NBSP stays a separator by category; whitespace is an overlay bit.
        assert!(cpt_flags(0xA0).is_separator());
        assert!(cpt_flags(0xA0).is_whitespace());
        assert!(!cpt_flags('x' as u32).is_whitespace());
    }

    #[test]
    fn test_surrogates_are_control() {
        assert!(cpt_flags(0xD800).is_control());
        assert!(cpt_flags(0xDFFF).is_control());
    }

    #[test]
    fn test_out_of_range_is_undefined() {
        assert!(cpt_flags(MAX_CODEPOINTS).is_undefined());
        assert!(cpt_flags(u32::MAX).is_undefined());
    }

    #[test]
    fn test_flags_from_utf8() {
        assert!(cpt_flags_from_utf8(b"").unwrap().is_undefined());
        assert!(cpt_flags_from_utf8("héllo".as_bytes()).unwrap().is_letter());
        assert!(cpt_flags_from_utf8("世界".as_bytes()).unwrap().is_letter());
        assert!(cpt_flags_from_utf8(&[0x80]).is_err());
    }

    #[test]
    fn test_range_boundaries_shape() {
        let boundaries = category_range_boundaries();
        assert_eq!(boundaries.first().map(|&(cp, _)| cp), Some(0));
        assert_eq!(boundaries.last().map(|&(cp, _)| cp), Some(MAX_CODEPOINTS));
        assert!(boundaries.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_tolower_toupper() {
        assert_eq!(tolower('A' as u32), 'a' as u32);
        assert_eq!(tolower('a' as u32), 'a' as u32);
        assert_eq!(toupper('a' as u32), 'A' as u32);
        assert_eq!(tolower(0x0401), 0x0451); // Ё → ё
        assert_eq!(toupper(0x00E9), 0x00C9); // é → É
        // Unmapped codepoints are identity.
        assert_eq!(tolower(0x4E16), 0x4E16);
        assert_eq!(toupper('7' as u32), '7' as u32);
    }

    #[test]
    fn test_case_overlay_bits() {
        assert!(cpt_flags('a' as u32).is_lowercase());
        assert!(cpt_flags('A' as u32).is_uppercase());
        assert!(!cpt_flags('a' as u32).is_uppercase());
        assert!(!cpt_flags('7' as u32).is_lowercase());
    }

    #[test]
    fn test_normalize_nfd_basic() {
        // é → e, À..Å → A
        assert_eq!(normalize_nfd(&[0x00E9]), vec![0x65]);
        assert_eq!(normalize_nfd(&[0x00C0, 0x00C5]), vec![0x41, 0x41]);
        // Unaffected codepoints pass through.
        assert_eq!(normalize_nfd(&[0x41, 0x4E16]), vec![0x41, 0x4E16]);
    }

    #[test]
    fn test_normalize_nfd_preserves_length() {
        let input: Vec<u32> = "Ångström 123 世界".chars().map(|c| c as u32).collect();
        assert_eq!(normalize_nfd(&input).len(), input.len());
    }

    #[test]
    fn test_normalize_nfd_idempotent() {
        let input: Vec<u32> = "Crème Brûlée — Ångström"
            .chars()
            .map(|c| c as u32)
            .collect();
        let once = normalize_nfd(&input);
        let twice = normalize_nfd(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nfd_targets_flagged() {
        // 'e' is the decomposition target of é and friends.
        assert!(cpt_flags('e' as u32).is_nfd());
        assert!(cpt_flags('A' as u32).is_nfd());
    }

    #[test]
    fn test_nfd_ranges_sorted_and_disjoint() {
        let ranges = &*NFD_RANGES;
        assert!(!ranges.is_empty());
        assert!(ranges.iter().all(|r| r.first <= r.last));
        assert!(ranges.windows(2).all(|w| w[0].last < w[1].first));
    }
}

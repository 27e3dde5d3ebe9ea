//! Sort stage: stable reordering of a filtered product sequence.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::product::Product;

/// Listing sort order.
///
/// Parsing never fails: an unrecognised key is treated as [`SortKey::Relevance`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    /// Catalog order (no reordering).
    #[default]
    Relevance,
    PriceLowHigh,
    PriceHighLow,
    Rating,
    Newest,
    NameAZ,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Relevance,
        SortKey::PriceLowHigh,
        SortKey::PriceHighLow,
        SortKey::Rating,
        SortKey::Newest,
        SortKey::NameAZ,
    ];

    /// Wire name, e.g. `"price-low-high"`.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceLowHigh => "price-low-high",
            SortKey::PriceHighLow => "price-high-low",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
            SortKey::NameAZ => "name-a-z",
        }
    }

    /// Human-readable label for sort controls.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Relevance => "Relevance",
            SortKey::PriceLowHigh => "Price: Low to High",
            SortKey::PriceHighLow => "Price: High to Low",
            SortKey::Rating => "Customer Rating",
            SortKey::Newest => "Newest First",
            SortKey::NameAZ => "Name: A to Z",
        }
    }

    /// Parse a wire name, falling back to `Relevance` for anything unknown.
    pub fn parse(raw: &str) -> SortKey {
        match SortKey::ALL.into_iter().find(|k| k.as_str() == raw) {
            Some(key) => key,
            None => {
                tracing::warn!(sort_key = raw, "unknown sort key; using relevance");
                SortKey::Relevance
            }
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SortKey {
    fn from(raw: &str) -> Self {
        SortKey::parse(raw)
    }
}

impl From<String> for SortKey {
    fn from(raw: String) -> Self {
        SortKey::parse(&raw)
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

/// Reorder `products` by `key`.
///
/// Every ordering is stable: products comparing equal keep their input order.
/// `Relevance` returns the input untouched.
pub fn sort(mut products: Vec<&Product>, key: SortKey) -> Vec<&Product> {
    match key {
        SortKey::Relevance => {}
        SortKey::PriceLowHigh => products.sort_by_key(|p| p.price()),
        SortKey::PriceHighLow => products.sort_by(|a, b| b.price().cmp(&a.price())),
        SortKey::Rating => products.sort_by(|a, b| b.rating().total_cmp(&a.rating())),
        SortKey::Newest => products.sort_by_key(|p| !p.is_new()),
        SortKey::NameAZ => products.sort_by_cached_key(|p| CollationKey::new(p.name())),
    }
    products
}

/// Locale-aware string comparison (natural reading order rather than raw
/// code points).
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

/// Multi-level sort key in the spirit of the Unicode collation algorithm.
///
/// Each character is lowercased and decomposed (NFD); combining marks are
/// split off from their base letter. Levels, compared in field order:
/// 1. base letters, case- and accent-insensitive (`"É"`, `"e\u{301}"` and `"e"` tie);
/// 2. accents: the marks attached to each base letter (unaccented first);
/// 3. case of each base letter (lowercase first);
/// 4. raw code points.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct CollationKey {
    base: Vec<char>,
    accents: Vec<Vec<char>>,
    case: Vec<u8>,
    raw: String,
}

impl CollationKey {
    fn new(s: &str) -> Self {
        let mut base = Vec::with_capacity(s.len());
        let mut accents: Vec<Vec<char>> = Vec::with_capacity(s.len());
        let mut case = Vec::with_capacity(s.len());

        for c in s.chars() {
            let upper = u8::from(c.is_uppercase());
            for d in c.to_lowercase().nfd() {
                if is_combining_mark(d) {
                    if let Some(marks) = accents.last_mut() {
                        marks.push(d);
                        continue;
                    }
                }
                match expand(d) {
                    Some(letters) => {
                        // The original letter ranks as an accent on the first expanded letter.
                        for (i, letter) in letters.chars().enumerate() {
                            base.push(letter);
                            accents.push(if i == 0 { vec![d] } else { Vec::new() });
                            case.push(upper);
                        }
                    }
                    None => {
                        base.push(d);
                        accents.push(Vec::new());
                        case.push(upper);
                    }
                }
            }
        }

        Self {
            base,
            accents,
            case,
            raw: s.to_string(),
        }
    }
}

/// Base letters of lowercase Latin letters that have no canonical
/// decomposition (ligatures, stroked letters).
fn expand(c: char) -> Option<&'static str> {
    let letters = match c {
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'ø' => "o",
        'ł' => "l",
        'đ' => "d",
        'ð' => "d",
        'ħ' => "h",
        'ı' => "i",
        'ŧ' => "t",
        'þ' => "th",
        _ => return None,
    };
    Some(letters)
}

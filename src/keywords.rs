//! Keyword tables generated from `config/funding_keywords.toml`.

use regex::Regex;

include!(concat!(env!("OUT_DIR"), "/keywords.rs"));

/// Build a case-insensitive, word-bounded alternation over `words`.
///
/// Spaces inside a keyword match any run of whitespace or hyphens, so
/// "series a" also hits "Series-A". Hyphens match an optional hyphen or
/// whitespace, so "pre-seed" also hits "pre seed" and "preseed". Longer
/// keywords are tried first.
pub(crate) fn alternation(words: &[&str]) -> Regex {
    build(words, "(?i)")
}

/// Like [`alternation`] but case-sensitive, for acronyms such as "SAM".
pub(crate) fn exact_alternation(words: &[&str]) -> Regex {
    build(words, "")
}

/// Month names by three-letter stem plus an optional abbreviation dot, so
/// "Sep", "Sept." and "September" all match. Use under `(?i)`.
pub(crate) fn month_pattern() -> String {
    let stems: Vec<&str> = MONTHS.iter().map(|m| &m[..3]).collect();
    format!(r"(?:{})[a-z]*\.?", stems.join("|"))
}

fn build(words: &[&str], flags: &str) -> Regex {
    let mut sorted: Vec<&str> = words.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));

    let parts: Vec<String> = sorted.iter().map(|w| keyword_pattern(w)).collect();
    let pattern = format!(r"{flags}\b(?:{})\b", parts.join("|"));
    Regex::new(&pattern).expect("keyword tables compile to a valid regex")
}

fn keyword_pattern(word: &str) -> String {
    word.split_whitespace()
        .map(|chunk| {
            chunk
                .split('-')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[-\s]?")
        })
        .collect::<Vec<_>>()
        .join(r"[-\s]+")
}

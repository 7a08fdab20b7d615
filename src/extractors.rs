//! Round label, lead investor and date matchers.
//!
//! Each matcher looks at the whole snippet text on its own and returns
//! `None` (or an empty list) when it finds nothing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::keywords::{self, ROUND_VOCABULARY};
use crate::names;

static ROUND_PATTERN: Lazy<Regex> = Lazy::new(|| keywords::alternation(ROUND_VOCABULARY));

// "led by X" up to the end of the clause
static LEAD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bled\s+by\s+([^.;,\n]+)").unwrap());

static PARTICIPATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bwith\s+participation\s+from\b").unwrap());

// Co-investor separators. "and" is matched case-sensitively so names such as
// "AND Capital" survive.
static LEAD_SPLIT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\band\b|,|;").unwrap());

// ISO date | "May 23, 2023" / "Sept. 4 2021" | bare year
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b\d{{4}}-\d{{2}}-\d{{2}}\b|\b{}\s+\d{{1,2}},?\s+\d{{4}}\b|\b(?:19|20)\d{{2}}\b",
        keywords::month_pattern()
    ))
    .unwrap()
});

/// First funding-round label in `text`, normalised for display.
pub fn extract_round(text: &str) -> Option<String> {
    ROUND_PATTERN
        .find(text)
        .map(|m| normalize_round_label(m.as_str()))
}

/// Canonical display form of a round label: `Series C`, `Seed`, `Pre-Seed`,
/// otherwise title case.
pub fn normalize_round_label(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
        .collect();

    match words.as_slice() {
        ["series", letter] => format!("Series {}", letter.to_uppercase()),
        ["pre", "seed"] | ["preseed"] => "Pre-Seed".to_string(),
        ["seed"] => "Seed".to_string(),
        _ => words
            .iter()
            .map(|w| title_case(w))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lead investors named by "led by" clauses, discovery order, no duplicates.
///
/// Only the lead entity is kept: the clause is cut at "with participation
/// from", then at the first "and", comma or semicolon.
pub fn extract_leads(text: &str) -> Vec<String> {
    let mut leads = Vec::new();
    for cap in LEAD_PATTERN.captures_iter(text) {
        if let Some(chunk) = cap.get(1) {
            if let Some(lead) = clean_lead_chunk(chunk.as_str()) {
                names::push_unique(&mut leads, &lead);
            }
        }
    }
    leads
}

fn clean_lead_chunk(chunk: &str) -> Option<String> {
    let head = match PARTICIPATION_PATTERN.find(chunk) {
        Some(m) => &chunk[..m.start()],
        None => chunk,
    };
    let lead = LEAD_SPLIT_PATTERN.split(head).next().unwrap_or("").trim();
    if lead.is_empty() {
        None
    } else {
        Some(lead.to_string())
    }
}

/// First date-like token: `2023-05-23`, `May 23, 2023` or a bare year.
pub fn extract_date(text: &str) -> Option<String> {
    DATE_PATTERN.find(text).map(|m| m.as_str().to_string())
}

//! Context classification — is a located amount a funding amount?
//!
//! Money shows up in prose for all sorts of reasons. A candidate is only
//! accepted when the text around it talks about raising money and does not
//! talk about valuations, revenue or market sizing.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::amount::AmountMatch;
use crate::keywords::{self, NEGATIVE_ACRONYMS, NEGATIVE_CONTEXT, POSITIVE_CONTEXT};

pub const DEFAULT_RADIUS: usize = 80;
pub const DEFAULT_FALLBACK_RADIUS: usize = 120;

static POSITIVE_PATTERN: Lazy<Regex> = Lazy::new(|| keywords::alternation(POSITIVE_CONTEXT));

static NEGATIVE_PATTERN: Lazy<Regex> = Lazy::new(|| keywords::alternation(NEGATIVE_CONTEXT));

static NEGATIVE_ACRONYM_PATTERN: Lazy<Regex> =
    Lazy::new(|| keywords::exact_alternation(NEGATIVE_ACRONYMS));

static ROUND_ANCHOR_PATTERN: Lazy<Regex> = Lazy::new(|| keywords::alternation(&["series", "round"]));

// "May 23", "Sept. 4", "Jan $5": a month name directly followed by a day
static MONTH_DAY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b{}\s+\$?\d{{1,2}}\b", keywords::month_pattern())).unwrap()
});

/// Outcome of classifying one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    /// A valuation, revenue or market-size keyword is nearby.
    NegativeContext,
    /// The candidate is the day part of a date.
    DateFragment,
    /// Nothing nearby talks about raising money.
    NoFundingContext,
}

/// Keyword-window classifier over amount candidates.
#[derive(Debug, Clone, Copy)]
pub struct ContextClassifier {
    radius: usize,
    fallback_radius: usize,
}

impl Default for ContextClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS, DEFAULT_FALLBACK_RADIUS)
    }
}

impl ContextClassifier {
    pub fn new(radius: usize, fallback_radius: usize) -> Self {
        Self {
            radius,
            fallback_radius,
        }
    }

    /// Apply the negative, date-fragment and positive rules in that order.
    pub fn classify(&self, text: &str, candidate: &AmountMatch) -> Verdict {
        let (lo, hi) = window(text, candidate.start, candidate.end, self.radius);
        if let Some(verdict) = reject_reason(text, lo, hi, candidate) {
            return verdict;
        }
        if !POSITIVE_PATTERN.is_match(&text[lo..hi]) {
            return Verdict::NoFundingContext;
        }
        Verdict::Accept
    }

    /// Largest accepted candidate, if any.
    pub fn best_amount(&self, text: &str, candidates: &[AmountMatch]) -> Option<u64> {
        candidates
            .iter()
            .filter(|c| {
                let verdict = self.classify(text, c);
                if verdict != Verdict::Accept {
                    debug!(value = c.value, ?verdict, "rejected amount candidate");
                }
                verdict == Verdict::Accept
            })
            .map(|c| c.value)
            .max()
    }

    /// Looser second pass for snippets that named a round but gave no
    /// accepted amount: the first candidate within the wider radius of
    /// "series" or "round" wins. Negative context and date fragments still
    /// disqualify.
    pub fn fallback_amount(&self, text: &str, candidates: &[AmountMatch]) -> Option<u64> {
        candidates
            .iter()
            .find(|c| {
                let (lo, hi) = window(text, c.start, c.end, self.fallback_radius);
                reject_reason(text, lo, hi, c).is_none()
                    && ROUND_ANCHOR_PATTERN.is_match(&text[lo..hi])
            })
            .map(|c| c.value)
    }
}

fn reject_reason(text: &str, lo: usize, hi: usize, candidate: &AmountMatch) -> Option<Verdict> {
    let near = &text[lo..hi];
    if NEGATIVE_PATTERN.is_match(near) || NEGATIVE_ACRONYM_PATTERN.is_match(near) {
        return Some(Verdict::NegativeContext);
    }
    let overlaps_date = MONTH_DAY_PATTERN.find_iter(near).any(|m| {
        let (start, end) = (lo + m.start(), lo + m.end());
        start < candidate.end && end > candidate.start
    });
    if overlaps_date {
        return Some(Verdict::DateFragment);
    }
    None
}

/// Byte range of `text` covering `radius` characters either side of the
/// match `[start, end)`. Both offsets must be char boundaries.
pub fn window(text: &str, start: usize, end: usize, radius: usize) -> (usize, usize) {
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let hi = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::{find_amounts, AmountLimits};

    fn best(text: &str) -> Option<u64> {
        let candidates = find_amounts(text, &AmountLimits::funding());
        ContextClassifier::default().best_amount(text, &candidates)
    }

    fn verdicts(text: &str) -> Vec<Verdict> {
        let classifier = ContextClassifier::default();
        find_amounts(text, &AmountLimits::funding())
            .iter()
            .map(|c| classifier.classify(text, c))
            .collect()
    }

    #[test]
    fn test_valuation_rejected() {
        assert_eq!(best("valued at $4.2 billion"), None);
        assert_eq!(verdicts("valued at $4.2 billion"), vec![Verdict::NegativeContext]);
    }

    #[test]
    fn test_raised_accepted() {
        assert_eq!(best("raised $4.2 billion in Series C"), Some(4_200_000_000));
    }

    #[test]
    fn test_date_not_amount() {
        assert_eq!(best("announced on May 23 raised $50 million"), Some(50_000_000));
    }

    #[test]
    fn test_requires_funding_keyword() {
        assert_eq!(best("the bridge cost $40 million to build"), None);
        assert_eq!(verdicts("spent $40 million"), vec![Verdict::NoFundingContext]);
    }

    #[test]
    fn test_negative_keywords() {
        for text in [
            "raised $5 million on revenue of $3 million",
            "a funding round with ARR of $12 million",
            "TAM of $30 billion, says the funding deck",
            "market cap hit $2 billion after the round",
        ] {
            assert_eq!(best(text), None, "{text}");
        }
    }

    #[test]
    fn test_keyword_is_word_bounded() {
        assert_eq!(best("Samsung led the $20 million funding"), Some(20_000_000));
        assert_eq!(best("raised $20 million led by Sam Altman"), Some(20_000_000));
        assert_eq!(best("raised $20 million against a SAM of $1 billion"), None);
    }

    #[test]
    fn test_max_of_accepted() {
        assert_eq!(
            best("raised a further $10M, bringing the total funding to $450M"),
            Some(450_000_000)
        );
    }

    #[test]
    fn test_window_counts_chars() {
        let text = "€€€€ raised $5 million ééé";
        let (lo, hi) = window(text, 13, 24, 3);
        assert_eq!(&text[lo..13], "€€ ");
        assert_eq!(&text[24..hi], "ill");
        assert_eq!(window(text, 0, text.len(), 500), (0, text.len()));
        assert_eq!(window(text, 13, 24, 0), (13, 24));
    }

    #[test]
    fn test_non_ascii_prose_keeps_full_radius() {
        // 68 characters but well over 80 bytes between keyword and amount
        let text = format!("raised {} $5 million", "é".repeat(60));
        assert_eq!(best(&text), Some(5_000_000));
    }

    #[test]
    fn test_fallback_near_round_word() {
        let text = "Acme closed its Series B at $30 million";
        let classifier = ContextClassifier::default();
        let candidates = find_amounts(text, &AmountLimits::funding());
        assert_eq!(classifier.fallback_amount(text, &candidates), Some(30_000_000));
        let text = "Acme's Series B: revenue now $30 million";
        let candidates = find_amounts(text, &AmountLimits::funding());
        assert_eq!(classifier.fallback_amount(text, &candidates), None);
    }
}

//! Amount parsing — currency magnitudes in free text.
//!
//! Recognises `$450M`, `$4.2 billion`, `USD 12 mm` and fully grouped figures
//! such as `$450,000,000`, and converts them to whole currency units.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Alternative 1: "$1,234,567" with an optional scale word
// Alternative 2: "$4.2 billion" / "12mm" where the scale word is mandatory
static AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:US\$|USD|\$)\s*(?P<grouped>\d{1,3}(?:,\d{3})+(?:\.\d+)?)(?:\s?(?P<grouped_unit>trillion|tn|t|billion|bn|b|million|mm|m|thousand|k)\b)?|(?:(?:US\$|USD|\$)\s*|\b)(?P<scaled>\d+(?:\.\d+)?)\s?(?P<scaled_unit>trillion|tn|t|billion|bn|b|million|mm|m|thousand|k)\b"
    ).unwrap()
});

/// Scale word or abbreviation following a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Thousand,
    Million,
    Billion,
    Trillion,
}

impl Scale {
    /// Case-insensitive lookup of a unit word (`k`, `mm`, `bn`, `trillion`, ...).
    pub fn from_unit(unit: &str) -> Option<Self> {
        match unit.trim().to_lowercase().as_str() {
            "thousand" | "k" => Some(Scale::Thousand),
            "million" | "mm" | "m" => Some(Scale::Million),
            "billion" | "bn" | "b" => Some(Scale::Billion),
            "trillion" | "tn" | "t" => Some(Scale::Trillion),
            _ => None,
        }
    }

    pub fn multiplier(self) -> u64 {
        match self {
            Scale::Thousand => 1_000,
            Scale::Million => 1_000_000,
            Scale::Billion => 1_000_000_000,
            Scale::Trillion => 1_000_000_000_000,
        }
    }
}

/// Plausibility bounds applied after scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountLimits {
    /// Smallest accepted value when no scale word was present.
    pub min_unitless: u64,
    /// Largest accepted value; anything above is treated as mis-parsed.
    pub max: u64,
}

impl AmountLimits {
    /// Loose bounds for arbitrary currency figures.
    pub const fn general() -> Self {
        Self {
            min_unitless: 1_000_000,
            max: 10_000_000_000_000,
        }
    }

    /// Venture rounds sit well under $10B.
    pub const fn funding() -> Self {
        Self {
            min_unitless: 1_000_000,
            max: 10_000_000_000,
        }
    }
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self::funding()
    }
}

/// Convert a numeric token and optional unit into whole currency units.
///
/// Returns `None` when the token does not parse, the result rounds to zero or
/// below, exceeds `limits.max`, or is a small unscaled figure (a bare "$23"
/// is almost always a date fragment, not money).
pub fn parse_amount(number: &str, unit: Option<&str>, limits: &AmountLimits) -> Option<u64> {
    let cleaned = number.trim().replace(',', "");
    let base: f64 = cleaned.parse().ok()?;
    if !base.is_finite() {
        return None;
    }

    let scale = unit.and_then(Scale::from_unit);
    let multiplier = scale.map_or(1, Scale::multiplier);
    let value = (base * multiplier as f64).round();

    if value <= 0.0 || value > limits.max as f64 {
        return None;
    }
    let value = value as u64;
    if scale.is_none() && value < limits.min_unitless {
        return None;
    }
    Some(value)
}

/// An amount expression located in a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountMatch {
    /// Byte offset of the first character of the expression.
    pub start: usize,
    /// Byte offset one past the expression.
    pub end: usize,
    pub value: u64,
}

/// All amount expressions in `text` that survive [`parse_amount`], in order.
pub fn find_amounts(text: &str, limits: &AmountLimits) -> Vec<AmountMatch> {
    AMOUNT_PATTERN
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let value = value_of(&cap, limits)?;
            Some(AmountMatch {
                start: whole.start(),
                end: whole.end(),
                value,
            })
        })
        .collect()
}

fn value_of(cap: &Captures<'_>, limits: &AmountLimits) -> Option<u64> {
    if let Some(num) = cap.name("grouped") {
        let unit = cap.name("grouped_unit").map(|m| m.as_str());
        return parse_amount(num.as_str(), unit, limits);
    }
    let num = cap.name("scaled")?;
    let unit = cap.name("scaled_unit").map(|m| m.as_str());
    parse_amount(num.as_str(), unit, limits)
}

//! Investor name normalisation and order-preserving dedup.

/// Casefold and collapse whitespace, for comparing names only.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

/// Two spellings of the same investor ("Spark Capital" / "spark  capital").
pub fn same_name(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Append `name` unless blank or already present. The first-seen spelling
/// is kept. Returns whether the list grew.
pub fn push_unique(names: &mut Vec<String>, name: &str) -> bool {
    let cleaned = name.split_whitespace().collect::<Vec<&str>>().join(" ");
    if cleaned.is_empty() || names.iter().any(|n| same_name(n, &cleaned)) {
        return false;
    }
    names.push(cleaned);
    true
}

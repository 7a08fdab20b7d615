//! Curated funding rounds known ahead of time, keyed by company.

use std::collections::HashMap;

use crate::error::Result;
use crate::reconcile::RoundRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedBook {
    companies: HashMap<String, Vec<RoundRecord>>,
}

fn company_key(company: &str) -> String {
    company.trim().to_lowercase()
}

impl SeedBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `{"<company>": [<round>, ...], ...}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, Vec<RoundRecord>> = serde_json::from_str(raw)?;
        let mut book = Self::new();
        for (company, rounds) in parsed {
            book.insert(&company, rounds);
        }
        Ok(book)
    }

    /// Add rounds for `company`, after any already known.
    pub fn insert(&mut self, company: &str, rounds: Vec<RoundRecord>) {
        self.companies
            .entry(company_key(company))
            .or_default()
            .extend(rounds);
    }

    #[must_use]
    pub fn with_company(mut self, company: &str, rounds: Vec<RoundRecord>) -> Self {
        self.insert(company, rounds);
        self
    }

    /// Rounds for `company`, matched case-insensitively.
    pub fn rounds_for(&self, company: &str) -> &[RoundRecord] {
        self.companies
            .get(&company_key(company))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEEDS: &str = r#"{
        "Anthropic": [
            {
                "round": "Series C",
                "date": "2023-05-23",
                "amount_usd": 450000000,
                "lead_investors": ["Spark Capital"],
                "other_investors": ["Google", "Salesforce Ventures"],
                "source": "https://techcrunch.com/"
            },
            {"round": "Series B", "amount_usd": 580000000}
        ]
    }"#;

    #[test]
    fn test_from_json_case_insensitive() {
        let book = SeedBook::from_json(SEEDS).unwrap();
        assert_eq!(book.len(), 1);
        let rounds = book.rounds_for("  anthropic ");
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].lead_investors, vec!["Spark Capital"]);
        assert_eq!(rounds[1].source, None);
        assert!(book.rounds_for("acme").is_empty());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            SeedBook::from_json("[1, 2]"),
            Err(crate::error::Error::Seed(_))
        ));
    }
}

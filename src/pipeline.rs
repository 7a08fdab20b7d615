//! End-to-end extraction: queries → snippets → facts → rounds → profile.
//!
//! Synchronous and stateless between runs. Callers wanting parallel
//! multi-company extraction run one `extract` per company; nothing is
//! shared but the read-only extractor.

use tracing::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::fact::Snippet;
use crate::merge::RecordMerger;
use crate::provider::SnippetProvider;
use crate::reconcile::{merge_into, reconcile, FundingProfile, FundingRound};
use crate::seed::SeedBook;
use crate::snippet::SnippetParser;
use crate::source::canonicalize_source;

#[derive(Debug, Clone, Default)]
pub struct FundingExtractor {
    config: ExtractionConfig,
    parser: SnippetParser,
    merger: RecordMerger,
}

impl FundingExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        let parser = SnippetParser::new(config.amount_limits(), config.classifier());
        let merger = RecordMerger::new(config.source_trust());
        Self {
            config,
            parser,
            merger,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run every query template against `provider` and build the profile.
    ///
    /// A failing query counts as zero results; the remaining queries still
    /// run.
    pub fn extract<P: SnippetProvider>(
        &self,
        company: &str,
        provider: &P,
        seeds: &SeedBook,
    ) -> FundingProfile {
        let mut snippets = Vec::new();
        for query in self.config.queries(company) {
            match provider.search(&query, self.config.results_per_query) {
                Ok(hits) => {
                    debug!(query = %query, hits = hits.len(), "snippet query");
                    snippets.extend(hits);
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "snippet query failed; continuing");
                }
            }
        }
        self.extract_from_snippets(company, &snippets, seeds)
    }

    /// Build the profile from snippets already in hand.
    pub fn extract_from_snippets(
        &self,
        company: &str,
        snippets: &[Snippet],
        seeds: &SeedBook,
    ) -> FundingProfile {
        let seed_rounds: Vec<FundingRound> = seeds
            .rounds_for(company)
            .iter()
            .map(FundingRound::from_record)
            .collect();
        let mut sources: Vec<String> = seed_rounds
            .iter()
            .flat_map(|r| r.sources().map(str::to_string))
            .collect();

        let mut facts = Vec::new();
        for snippet in snippets.iter().filter(|s| !s.is_blank()) {
            sources.push(canonicalize_source(&snippet.source_id));
            facts.push(self.parser.parse(snippet));
        }

        let parsed = reconcile(facts, &self.merger);
        let rounds = merge_into(seed_rounds, parsed, &self.merger);
        let profile = FundingProfile::new(rounds, sources);

        info!(
            company,
            snippets = snippets.len(),
            rounds = profile.rounds().len(),
            investors = profile.investors().len(),
            "funding extraction finished"
        );
        profile
    }
}

/// Extract with the default configuration.
pub fn extract_funding<P: SnippetProvider>(
    company: &str,
    provider: &P,
    seeds: &SeedBook,
) -> FundingProfile {
    FundingExtractor::default().extract(company, provider, seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_queries_issued_with_limit() {
        let seen = RefCell::new(Vec::new());
        let provider = |query: &str, limit: usize| -> Result<Vec<Snippet>, String> {
            seen.borrow_mut().push((query.to_string(), limit));
            Ok(Vec::new())
        };
        let profile = extract_funding("Acme", &provider, &SeedBook::new());
        assert!(profile.is_empty());
        let seen = seen.into_inner();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|(q, n)| q.starts_with("Acme ") && *n == 3));
    }

    #[test]
    fn test_failed_query_does_not_abort() {
        let provider = |query: &str, _limit: usize| -> Result<Vec<Snippet>, String> {
            if query.ends_with("funding Series") {
                return Err("timeout".to_string());
            }
            Ok(vec![Snippet::new(
                "Acme raises $12M Series A",
                "The round was led by Lux.",
                "https://techcrunch.com/acme",
            )])
        };
        let profile = extract_funding("Acme", &provider, &SeedBook::new());
        assert_eq!(profile.rounds().len(), 1);
        assert_eq!(profile.rounds()[0].provenance().len(), 1);
        assert_eq!(profile.rounds()[0].amount(), Some(12_000_000));
        assert_eq!(profile.investors().to_vec(), vec!["Lux"]);
        assert_eq!(profile.sources().to_vec(), vec!["https://techcrunch.com/acme"]);
    }

    #[test]
    fn test_blank_snippets_skipped() {
        let snippets = vec![Snippet::new("", "  ", "https://blank.example/")];
        let profile =
            FundingExtractor::default().extract_from_snippets("Acme", &snippets, &SeedBook::new());
        assert!(profile.is_empty());
    }

    #[test]
    fn test_custom_config_limits() {
        let config = ExtractionConfig {
            max_amount: 100_000_000,
            ..ExtractionConfig::default()
        };
        let snippets = vec![Snippet::new("Acme raises $450M Series C", "", "s1")];
        let profile =
            FundingExtractor::new(config).extract_from_snippets("Acme", &snippets, &SeedBook::new());
        assert_eq!(profile.rounds()[0].amount(), None);
        assert_eq!(profile.rounds()[0].round_label(), Some("Series C"));
    }
}

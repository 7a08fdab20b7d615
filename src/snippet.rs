//! Snippet parsing — runs every matcher over one snippet.

use tracing::trace;

use crate::amount::{find_amounts, AmountLimits};
use crate::context::ContextClassifier;
use crate::extractors::{extract_date, extract_leads, extract_round};
use crate::fact::{PartialFundingFact, Snippet};
use crate::source::canonicalize_source;

/// Turns one snippet into one partial fact.
#[derive(Debug, Clone, Default)]
pub struct SnippetParser {
    limits: AmountLimits,
    classifier: ContextClassifier,
}

impl SnippetParser {
    pub fn new(limits: AmountLimits, classifier: ContextClassifier) -> Self {
        Self { limits, classifier }
    }

    /// Parse title and body as one text. The result may be empty; callers
    /// drop empty facts before merging.
    pub fn parse(&self, snippet: &Snippet) -> PartialFundingFact {
        let text = format!("{} {}", snippet.title, snippet.body);
        let mut fact = PartialFundingFact::new(canonicalize_source(&snippet.source_id));

        fact.round_label = extract_round(&text);

        let candidates = find_amounts(&text, &self.limits);
        fact.amount = self.classifier.best_amount(&text, &candidates);
        if fact.amount.is_none() && fact.round_label.is_some() {
            fact.amount = self.classifier.fallback_amount(&text, &candidates);
        }

        fact.lead_investors = extract_leads(&text);
        fact.date = extract_date(&text);

        trace!(
            source = fact.source_id(),
            round = ?fact.round_label,
            amount = ?fact.amount,
            "parsed snippet"
        );
        fact
    }
}

/// Parse with default limits and context radii.
pub fn parse_snippet(snippet: &Snippet) -> PartialFundingFact {
    SnippetParser::default().parse(snippet)
}

//! Runtime tuning for an extraction run.

use serde::Deserialize;

use crate::amount::AmountLimits;
use crate::context::{ContextClassifier, DEFAULT_FALLBACK_RADIUS, DEFAULT_RADIUS};
use crate::error::{Error, Result};
use crate::keywords::{QUERY_TEMPLATES, TRUSTED_DOMAINS};
use crate::source::SourceTrust;

/// Placeholder replaced by the company name in query templates.
pub const COMPANY_PLACEHOLDER: &str = "{company}";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Bytes either side of an amount searched for context keywords.
    pub context_radius: usize,
    /// Wider radius for the round-anchored second pass.
    pub fallback_radius: usize,
    /// Results requested from the provider per query.
    pub results_per_query: usize,
    pub min_unitless_amount: u64,
    pub max_amount: u64,
    pub trusted_domains: Vec<String>,
    pub query_templates: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        let limits = AmountLimits::funding();
        Self {
            context_radius: DEFAULT_RADIUS,
            fallback_radius: DEFAULT_FALLBACK_RADIUS,
            results_per_query: 3,
            min_unitless_amount: limits.min_unitless,
            max_amount: limits.max,
            trusted_domains: TRUSTED_DOMAINS.iter().map(|d| d.to_string()).collect(),
            query_templates: QUERY_TEMPLATES.iter().map(|q| q.to_string()).collect(),
        }
    }
}

impl ExtractionConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.context_radius == 0 {
            return Err(invalid("context_radius must be positive"));
        }
        if self.fallback_radius < self.context_radius {
            return Err(invalid("fallback_radius must be at least context_radius"));
        }
        if self.results_per_query == 0 {
            return Err(invalid("results_per_query must be positive"));
        }
        if self.max_amount == 0 || self.max_amount < self.min_unitless_amount {
            return Err(invalid("max_amount must be positive and not below min_unitless_amount"));
        }
        if let Some(t) = self
            .query_templates
            .iter()
            .find(|t| !t.contains(COMPANY_PLACEHOLDER))
        {
            return Err(Error::InvalidConfig {
                reason: format!("query template {t:?} has no {COMPANY_PLACEHOLDER} placeholder"),
            });
        }
        Ok(())
    }

    pub fn amount_limits(&self) -> AmountLimits {
        AmountLimits {
            min_unitless: self.min_unitless_amount,
            max: self.max_amount,
        }
    }

    pub fn classifier(&self) -> ContextClassifier {
        ContextClassifier::new(self.context_radius, self.fallback_radius)
    }

    pub fn source_trust(&self) -> SourceTrust {
        SourceTrust::new(&self.trusted_domains)
    }

    /// Search queries for `company`, in template order.
    pub fn queries(&self, company: &str) -> Vec<String> {
        let company = company.trim();
        self.query_templates
            .iter()
            .map(|t| t.replace(COMPANY_PLACEHOLDER, company))
            .collect()
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidConfig {
        reason: reason.to_string(),
    }
}

//! Funding-round extraction and reconciliation from search snippets.
//!
//! Turns noisy search-result text about a company into a consistent set of
//! funding rounds:
//! 1. Amount parsing (`$450M`, `$4.2 billion`, `$450,000,000`)
//! 2. Context classification (funding amount vs valuation, revenue, dates)
//! 3. Round label, lead investor and date matching
//! 4. Merging and deduplication of partial observations into rounds
//!
//! The core does no I/O. Snippets come in through a [`SnippetProvider`] and
//! a [`FundingProfile`] comes out. With the `python` feature the crate also
//! builds as a Python extension module.

pub mod amount;
pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod fact;
mod keywords;
pub mod merge;
pub mod names;
pub mod pipeline;
pub mod provider;
pub mod reconcile;
pub mod seed;
pub mod snippet;
pub mod source;

#[cfg(feature = "python")]
mod python;

pub use amount::{find_amounts, parse_amount, AmountLimits, AmountMatch, Scale};
pub use config::ExtractionConfig;
pub use context::{ContextClassifier, Verdict};
pub use error::{Error, Result};
pub use extractors::{extract_date, extract_leads, extract_round, normalize_round_label};
pub use fact::{Field, PartialFundingFact, Snippet};
pub use merge::RecordMerger;
pub use pipeline::{extract_funding, FundingExtractor};
pub use provider::{CachedProvider, SnippetProvider};
pub use reconcile::{bucket_key, merge_into, reconcile, FundingProfile, FundingRound, RoundRecord};
pub use seed::SeedBook;
pub use snippet::{parse_snippet, SnippetParser};
pub use source::{canonicalize_source, SourceTrust};

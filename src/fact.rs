//! Input snippets and the partial facts parsed out of them.

use serde::{Deserialize, Serialize};

/// One search result about a company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "snippet")]
    pub body: String,
    #[serde(default, alias = "url")]
    pub source_id: String,
}

impl Snippet {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            source_id: source_id.into(),
        }
    }

    /// True when there is no text to parse.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }
}

/// Scalar fields whose supplying source is tracked through merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RoundLabel,
    Amount,
    Date,
}

// Source that supplied each scalar. `None` means the first source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Origins {
    round_label: Option<String>,
    amount: Option<String>,
    date: Option<String>,
}

/// Funding facts observed in one snippet, or folded from several.
///
/// Every fact carries at least one source id. A fact built from a single
/// snippet has exactly one; merging unions them in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialFundingFact {
    pub round_label: Option<String>,
    pub amount: Option<u64>,
    pub date: Option<String>,
    pub lead_investors: Vec<String>,
    sources: Vec<String>,
    origins: Origins,
}

impl PartialFundingFact {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            round_label: None,
            amount: None,
            date: None,
            lead_investors: Vec::new(),
            sources: vec![source_id.into()],
            origins: Origins::default(),
        }
    }

    #[must_use]
    pub fn with_round(mut self, label: impl Into<String>) -> Self {
        self.round_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_lead(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        crate::names::push_unique(&mut self.lead_investors, &name);
        self
    }

    /// Where this fact was first observed.
    pub fn source_id(&self) -> &str {
        &self.sources[0]
    }

    /// Every source that contributed, first-seen order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Source that supplied the current value of `field`.
    pub fn origin(&self, field: Field) -> &str {
        let slot = match field {
            Field::RoundLabel => &self.origins.round_label,
            Field::Amount => &self.origins.amount,
            Field::Date => &self.origins.date,
        };
        slot.as_deref().unwrap_or_else(|| self.source_id())
    }

    pub(crate) fn set_origin(&mut self, field: Field, source_id: &str) {
        let slot = match field {
            Field::RoundLabel => &mut self.origins.round_label,
            Field::Amount => &mut self.origins.amount,
            Field::Date => &mut self.origins.date,
        };
        *slot = Some(source_id.to_string());
    }

    pub(crate) fn add_source(&mut self, source_id: &str) {
        if !self.sources.iter().any(|s| s == source_id) {
            self.sources.push(source_id.to_string());
        }
    }

    /// A fact with no round, amount, date or lead carries no information.
    pub fn is_empty(&self) -> bool {
        known(&self.round_label).is_none()
            && self.amount.is_none()
            && known(&self.date).is_none()
            && self.lead_investors.is_empty()
    }
}

/// A scalar string that is neither blank nor the "unknown" placeholder.
pub(crate) fn known(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("unknown"))
}

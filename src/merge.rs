//! Pairwise merging of partial facts that describe the same round.
//!
//! Scalar conflicts follow a fixed tie-break instead of arrival order: a
//! blank or "unknown" value never wins, a value only present on one side is
//! kept, and when both sides disagree the incoming value replaces the
//! existing one only if the source that supplied it is strictly more trusted
//! than the source behind the current value. Otherwise the first-seen value
//! stays.

use crate::fact::{known, Field, PartialFundingFact};
use crate::names;
use crate::source::SourceTrust;

#[derive(Debug, Clone, Default)]
pub struct RecordMerger {
    trust: SourceTrust,
}

impl RecordMerger {
    pub fn new(trust: SourceTrust) -> Self {
        Self { trust }
    }

    pub fn trust(&self) -> &SourceTrust {
        &self.trust
    }

    /// Fold `b` into `a`. Merging the same `b` twice changes nothing.
    pub fn merge(&self, a: &PartialFundingFact, b: &PartialFundingFact) -> PartialFundingFact {
        let mut out = a.clone();
        out.round_label = self
            .resolve(&mut out, a, b, Field::RoundLabel, known(&a.round_label), known(&b.round_label))
            .map(str::to_string);
        out.date = self
            .resolve(&mut out, a, b, Field::Date, known(&a.date), known(&b.date))
            .map(str::to_string);
        out.amount = self.resolve(&mut out, a, b, Field::Amount, a.amount, b.amount);

        out.lead_investors.retain(|n| !n.trim().is_empty());
        for lead in &b.lead_investors {
            names::push_unique(&mut out.lead_investors, lead);
        }
        for source in b.sources() {
            out.add_source(source);
        }
        out
    }

    // Picks the value of one scalar and records on `out` which source backs
    // it. An equal value reported by a more trusted source moves the origin
    // there, so a later less trusted disagreement cannot displace it.
    fn resolve<T: PartialEq>(
        &self,
        out: &mut PartialFundingFact,
        a: &PartialFundingFact,
        b: &PartialFundingFact,
        field: Field,
        x: Option<T>,
        y: Option<T>,
    ) -> Option<T> {
        let b_trusted = self.trust.score(b.origin(field)) > self.trust.score(a.origin(field));
        match (x, y) {
            (Some(x), Some(y)) if x == y => {
                if b_trusted {
                    out.set_origin(field, b.origin(field));
                }
                Some(x)
            }
            (Some(_), Some(y)) if b_trusted => {
                out.set_origin(field, b.origin(field));
                Some(y)
            }
            (Some(x), _) => Some(x),
            (None, Some(y)) => {
                out.set_origin(field, b.origin(field));
                Some(y)
            }
            (None, None) => None,
        }
    }
}

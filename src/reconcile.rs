//! Round deduplication, seed merging and the aggregate profile.

use std::collections::HashMap;

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extractors::normalize_round_label;
use crate::fact::{known, PartialFundingFact};
use crate::merge::RecordMerger;
use crate::names;

/// Bucket used for facts that carry only investor names.
pub const UNKNOWN_BUCKET: &str = "unknown";

/// Wire shape of one round, used for output and for seed data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    #[serde(default)]
    pub round: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub amount_usd: Option<u64>,
    #[serde(default)]
    pub lead_investors: Vec<String>,
    #[serde(default)]
    pub other_investors: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// One distinct funding event and every observation folded into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingRound {
    merged: PartialFundingFact,
    other_investors: Vec<String>,
    provenance: Vec<PartialFundingFact>,
}

impl FundingRound {
    pub fn from_fact(fact: PartialFundingFact) -> Self {
        Self {
            merged: fact.clone(),
            other_investors: Vec::new(),
            provenance: vec![fact],
        }
    }

    /// A curated round. Its label is normalised so it buckets with parsed
    /// observations of the same round. A record without a source keeps an
    /// empty source id, which is never reported.
    pub fn from_record(record: &RoundRecord) -> Self {
        let source = record.source.as_deref().map(str::trim).unwrap_or_default();

        let mut fact = PartialFundingFact::new(source);
        fact.round_label = known(&record.round).map(normalize_round_label);
        fact.amount = record.amount_usd.filter(|a| *a > 0);
        fact.date = known(&record.date).map(str::to_string);
        for lead in &record.lead_investors {
            names::push_unique(&mut fact.lead_investors, lead);
        }

        let mut round = Self::from_fact(fact);
        for other in &record.other_investors {
            names::push_unique(&mut round.other_investors, other);
        }
        round
    }

    pub fn round_label(&self) -> Option<&str> {
        self.merged.round_label.as_deref()
    }

    pub fn amount(&self) -> Option<u64> {
        self.merged.amount
    }

    pub fn date(&self) -> Option<&str> {
        self.merged.date.as_deref()
    }

    pub fn lead_investors(&self) -> &[String] {
        &self.merged.lead_investors
    }

    pub fn other_investors(&self) -> &[String] {
        &self.other_investors
    }

    /// First named source that reported this round.
    pub fn source(&self) -> Option<&str> {
        self.sources().next()
    }

    /// Named sources, first-seen order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.merged
            .sources()
            .iter()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// The merged view of all observations.
    pub fn merged(&self) -> &PartialFundingFact {
        &self.merged
    }

    /// Individual observations, arrival order.
    pub fn provenance(&self) -> &[PartialFundingFact] {
        &self.provenance
    }

    pub fn bucket_key(&self) -> String {
        bucket_key(&self.merged)
    }

    /// Fold another observation of the same round into this one.
    pub fn absorb(&mut self, other: FundingRound, merger: &RecordMerger) {
        self.merged = merger.merge(&self.merged, &other.merged);
        for name in &other.other_investors {
            names::push_unique(&mut self.other_investors, name);
        }
        for fact in other.provenance {
            if !self.provenance.contains(&fact) {
                self.provenance.push(fact);
            }
        }
    }

    pub fn to_record(&self) -> RoundRecord {
        RoundRecord {
            round: self.round_label().map(str::to_string),
            date: self.date().map(str::to_string),
            amount_usd: self.amount(),
            lead_investors: self.lead_investors().to_vec(),
            other_investors: self.other_investors.clone(),
            source: self.source().map(str::to_string),
        }
    }
}

/// Identity of the round a fact describes: the normalised round label, else
/// the amount, else the date, else [`UNKNOWN_BUCKET`].
pub fn bucket_key(fact: &PartialFundingFact) -> String {
    if let Some(label) = known(&fact.round_label) {
        return normalize_round_label(label);
    }
    if let Some(amount) = fact.amount {
        return amount.to_string();
    }
    if let Some(date) = known(&fact.date) {
        return date.to_string();
    }
    UNKNOWN_BUCKET.to_string()
}

/// Group facts into distinct rounds, merging facts that share a bucket key,
/// largest amount first. Empty facts are dropped.
pub fn reconcile(facts: Vec<PartialFundingFact>, merger: &RecordMerger) -> Vec<FundingRound> {
    let mut rounds: Vec<FundingRound> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for fact in facts {
        if fact.is_empty() {
            debug!(source = fact.source_id(), "dropping empty fact");
            continue;
        }
        let key = bucket_key(&fact);
        let incoming = FundingRound::from_fact(fact);
        match index.get(&key) {
            Some(&i) => rounds[i].absorb(incoming, merger),
            None => {
                index.insert(key, rounds.len());
                rounds.push(incoming);
            }
        }
    }

    sort_by_amount(&mut rounds);
    rounds
}

/// Merge reconciled rounds into curated ones. A round whose bucket key
/// matches an existing round is folded into it; the rest are appended.
pub fn merge_into(
    mut base: Vec<FundingRound>,
    incoming: Vec<FundingRound>,
    merger: &RecordMerger,
) -> Vec<FundingRound> {
    for round in incoming {
        let key = round.bucket_key();
        match base.iter().position(|r| r.bucket_key() == key) {
            Some(i) => base[i].absorb(round, merger),
            None => base.push(round),
        }
    }
    sort_by_amount(&mut base);
    base
}

fn sort_by_amount(rounds: &mut [FundingRound]) {
    rounds.sort_by_key(|r| std::cmp::Reverse(r.amount().unwrap_or(0)));
}

/// Result of one extraction run. Built once and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundingProfile {
    rounds: Vec<FundingRound>,
    investors: Vec<String>,
    sources: Vec<String>,
}

impl FundingProfile {
    /// Investors are collected from every round, leads before others, in
    /// round order.
    pub fn new(rounds: Vec<FundingRound>, sources: Vec<String>) -> Self {
        let mut investors = Vec::new();
        for round in &rounds {
            for name in round.lead_investors().iter().chain(round.other_investors()) {
                names::push_unique(&mut investors, name);
            }
        }

        let mut unique_sources: Vec<String> = Vec::new();
        for source in sources {
            if !source.is_empty() && !unique_sources.contains(&source) {
                unique_sources.push(source);
            }
        }

        Self {
            rounds,
            investors,
            sources: unique_sources,
        }
    }

    pub fn rounds(&self) -> &[FundingRound] {
        &self.rounds
    }

    pub fn investors(&self) -> &[String] {
        &self.investors
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty() && self.investors.is_empty() && self.sources.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "rounds": self.rounds.iter().map(FundingRound::to_record).collect::<Vec<_>>(),
            "investors": self.investors,
            "sources": self.sources,
        })
    }
}

impl Serialize for FundingProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let records: Vec<RoundRecord> = self.rounds.iter().map(FundingRound::to_record).collect();
        let mut state = serializer.serialize_struct("FundingProfile", 3)?;
        state.serialize_field("rounds", &records)?;
        state.serialize_field("investors", &self.investors)?;
        state.serialize_field("sources", &self.sources)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merger() -> RecordMerger {
        RecordMerger::default()
    }

    #[test]
    fn test_bucket_key_priority() {
        let f = PartialFundingFact::new("s").with_round("series c").with_amount(5_000_000);
        assert_eq!(bucket_key(&f), "Series C");
        let f = PartialFundingFact::new("s").with_amount(5_000_000).with_date("2021");
        assert_eq!(bucket_key(&f), "5000000");
        let f = PartialFundingFact::new("s").with_date("2021");
        assert_eq!(bucket_key(&f), "2021");
        let f = PartialFundingFact::new("s").with_round("unknown").with_lead("Lux");
        assert_eq!(bucket_key(&f), UNKNOWN_BUCKET);
    }

    #[test]
    fn test_same_bucket_merges() {
        let facts = vec![
            PartialFundingFact::new("s1").with_round("Series C").with_amount(450_000_000),
            PartialFundingFact::new("s2").with_round("Series C").with_lead("Spark Capital"),
        ];
        let rounds = reconcile(facts, &merger());
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].amount(), Some(450_000_000));
        assert_eq!(rounds[0].lead_investors().to_vec(), vec!["Spark Capital"]);
        assert_eq!(rounds[0].provenance().len(), 2);
        assert_eq!(rounds[0].source(), Some("s1"));
    }

    #[test]
    fn test_empty_facts_dropped_and_sorted() {
        let facts = vec![
            PartialFundingFact::new("s0"),
            PartialFundingFact::new("s1").with_round("Seed").with_amount(2_000_000),
            PartialFundingFact::new("s2").with_lead("Lux"),
            PartialFundingFact::new("s3").with_round("Series B").with_amount(80_000_000),
        ];
        let rounds = reconcile(facts, &merger());
        let labels: Vec<Option<&str>> = rounds.iter().map(|r| r.round_label()).collect();
        assert_eq!(labels, vec![Some("Series B"), Some("Seed"), None]);
    }

    #[test]
    fn test_merge_into_seed() {
        let seed = FundingRound::from_record(&RoundRecord {
            round: Some("series c".into()),
            date: Some("2023-05-23".into()),
            amount_usd: Some(450_000_000),
            lead_investors: vec!["Spark Capital".into()],
            other_investors: vec!["Google".into()],
            source: Some("https://techcrunch.com/".into()),
        });
        let parsed = reconcile(
            vec![
                PartialFundingFact::new("s1").with_round("Series C").with_lead("Zoom Ventures"),
                PartialFundingFact::new("s2").with_round("Series D").with_amount(1_000_000_000),
            ],
            &merger(),
        );
        let rounds = merge_into(vec![seed], parsed, &merger());
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].round_label(), Some("Series D"));
        let c = &rounds[1];
        assert_eq!(c.round_label(), Some("Series C"));
        assert_eq!(c.date(), Some("2023-05-23"));
        assert_eq!(c.lead_investors().to_vec(), vec!["Spark Capital", "Zoom Ventures"]);
        assert_eq!(c.other_investors().to_vec(), vec!["Google"]);
        assert_eq!(c.source(), Some("https://techcrunch.com/"));
    }

    #[test]
    fn test_profile_investors_and_sources() {
        let mut seed = FundingRound::from_record(&RoundRecord {
            round: Some("Seed".into()),
            amount_usd: Some(3_000_000),
            lead_investors: vec!["Lux".into()],
            other_investors: vec!["Accel".into(), "lux".into()],
            ..Default::default()
        });
        seed.absorb(
            FundingRound::from_fact(PartialFundingFact::new("s1").with_round("Seed").with_lead("Accel")),
            &merger(),
        );
        let profile = FundingProfile::new(
            vec![seed],
            vec!["s1".into(), String::new(), "s1".into(), "s2".into()],
        );
        assert_eq!(profile.investors().to_vec(), vec!["Lux", "Accel"]);
        assert_eq!(profile.sources().to_vec(), vec!["s1", "s2"]);
        assert_eq!(profile.rounds()[0].source(), Some("s1"));
    }

    #[test]
    fn test_seed_without_source_reports_none() {
        let seed = FundingRound::from_record(&RoundRecord {
            round: Some("Seed".into()),
            amount_usd: Some(3_000_000),
            ..Default::default()
        });
        assert_eq!(seed.source(), None);
        assert_eq!(seed.sources().count(), 0);
        assert_eq!(seed.to_record().source, None);

        let from_blank = FundingRound::from_fact(PartialFundingFact::new("").with_amount(5_000_000));
        assert_eq!(from_blank.to_record().source, None);

        let json = serde_json::to_value(FundingProfile::new(vec![seed], Vec::new())).unwrap();
        assert_eq!(json["rounds"][0]["source"], serde_json::Value::Null);
        assert_eq!(json["sources"], serde_json::json!([]));
    }

    #[test]
    fn test_empty_profile_json() {
        let profile = FundingProfile::new(Vec::new(), Vec::new());
        assert!(profile.is_empty());
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            serde_json::json!({"rounds": [], "investors": [], "sources": []})
        );
        assert_eq!(profile.to_json(), serde_json::to_value(&profile).unwrap());
    }
}

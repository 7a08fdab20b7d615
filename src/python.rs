//! Python bindings, built with `--features python`.
//!
//! The search provider is any Python callable `provider(query, num=N)`
//! returning a list of dicts with `title`, `snippet` and `url` keys.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::amount::{parse_amount as parse_amount_with, AmountLimits};
use crate::fact::Snippet;
use crate::pipeline::FundingExtractor;
use crate::provider::SnippetProvider;
use crate::reconcile::FundingProfile;
use crate::seed::SeedBook;
use crate::snippet;

struct PyProvider<'py> {
    callable: Bound<'py, PyAny>,
}

impl SnippetProvider for PyProvider<'_> {
    type Error = PyErr;

    fn search(&self, query: &str, limit: usize) -> PyResult<Vec<Snippet>> {
        let py = self.callable.py();
        let kwargs = PyDict::new_bound(py);
        kwargs.set_item("num", limit)?;
        let hits = self.callable.call((query,), Some(&kwargs))?;

        let mut snippets = Vec::new();
        for item in hits.iter()? {
            let item = item?;
            let hit = item.downcast::<PyDict>()?;
            snippets.push(Snippet::new(
                text_field(hit, &["title"])?,
                text_field(hit, &["snippet", "body"])?,
                text_field(hit, &["url", "source_id"])?,
            ));
        }
        Ok(snippets)
    }
}

/// First present, non-None key as a string; empty when none is set.
fn text_field(hit: &Bound<'_, PyDict>, keys: &[&str]) -> PyResult<String> {
    for key in keys {
        if let Some(value) = hit.get_item(*key)? {
            if !value.is_none() {
                return value.extract::<String>();
            }
        }
    }
    Ok(String::new())
}

fn profile_to_dict(py: Python<'_>, profile: &FundingProfile) -> PyResult<Py<PyDict>> {
    let rounds = PyList::empty_bound(py);
    for round in profile.rounds() {
        let record = round.to_record();
        let dict = PyDict::new_bound(py);
        dict.set_item("round", record.round)?;
        dict.set_item("date", record.date)?;
        dict.set_item("amount_usd", record.amount_usd)?;
        dict.set_item("lead_investors", record.lead_investors)?;
        dict.set_item("other_investors", record.other_investors)?;
        dict.set_item("source", record.source)?;
        rounds.append(dict)?;
    }

    let out = PyDict::new_bound(py);
    out.set_item("rounds", rounds)?;
    out.set_item("investors", profile.investors().to_vec())?;
    out.set_item("sources", profile.sources().to_vec())?;
    Ok(out.unbind())
}

/// Build a funding profile for `company`.
///
/// Parameters
/// ----------
/// company : str
///     Company name; also the seed-data key (case-insensitive).
/// provider : callable | None
///     `provider(query, num=3) -> list[dict]`. A query that raises counts
///     as zero results.
/// seeds_json : str | None
///     `{"<company>": [<round>, ...]}` curated rounds.
///
/// Returns
/// -------
/// dict
///     `{"rounds": [...], "investors": [...], "sources": [...]}`.
#[pyfunction]
#[pyo3(signature = (company, provider=None, seeds_json=None))]
pub fn extract_funding(
    py: Python<'_>,
    company: &str,
    provider: Option<Bound<'_, PyAny>>,
    seeds_json: Option<&str>,
) -> PyResult<Py<PyDict>> {
    let seeds = match seeds_json {
        Some(raw) => SeedBook::from_json(raw)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?,
        None => SeedBook::new(),
    };
    let extractor = FundingExtractor::default();
    let profile = match provider {
        Some(callable) => extractor.extract(company, &PyProvider { callable }, &seeds),
        None => extractor.extract_from_snippets(company, &[], &seeds),
    };
    profile_to_dict(py, &profile)
}

/// Parse one snippet into its partial funding fact.
#[pyfunction]
pub fn parse_snippet(
    py: Python<'_>,
    title: &str,
    body: &str,
    source_id: &str,
) -> PyResult<Py<PyDict>> {
    let fact = snippet::parse_snippet(&Snippet::new(title, body, source_id));
    let dict = PyDict::new_bound(py);
    dict.set_item("round", fact.round_label.clone())?;
    dict.set_item("amount_usd", fact.amount)?;
    dict.set_item("date", fact.date.clone())?;
    dict.set_item("lead_investors", fact.lead_investors.clone())?;
    dict.set_item("source", fact.source_id())?;
    Ok(dict.unbind())
}

/// Convert `number` (+ optional unit word) to whole currency units.
#[pyfunction]
#[pyo3(signature = (number, unit=None, strict=true))]
pub fn parse_amount(number: &str, unit: Option<&str>, strict: bool) -> Option<u64> {
    let limits = if strict {
        AmountLimits::funding()
    } else {
        AmountLimits::general()
    };
    parse_amount_with(number, unit, &limits)
}

/// funding_core — native funding-round extraction.
#[pymodule]
fn funding_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(extract_funding, m)?)?;
    m.add_function(wrap_pyfunction!(parse_snippet, m)?)?;
    m.add_function(wrap_pyfunction!(parse_amount, m)?)?;
    Ok(())
}

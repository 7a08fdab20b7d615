//! Compiles `config/funding_keywords.toml` into static keyword tables.
//!
//! The generated `keywords.rs` lands in `OUT_DIR` and is pulled in by
//! `src/keywords.rs` with `include!`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const KEYWORDS_FILE: &str = "config/funding_keywords.toml";

/// (table, key, generated constant name)
const TABLES: &[(&str, &str, &str)] = &[
    ("context", "positive", "POSITIVE_CONTEXT"),
    ("context", "negative", "NEGATIVE_CONTEXT"),
    ("context", "negative_acronyms", "NEGATIVE_ACRONYMS"),
    ("rounds", "vocabulary", "ROUND_VOCABULARY"),
    ("dates", "months", "MONTHS"),
    ("queries", "templates", "QUERY_TEMPLATES"),
    ("sources", "trusted", "TRUSTED_DOMAINS"),
];

fn main() {
    println!("cargo:rerun-if-changed={KEYWORDS_FILE}");

    let raw = fs::read_to_string(KEYWORDS_FILE)
        .unwrap_or_else(|e| panic!("cannot read {KEYWORDS_FILE}: {e}"));
    let doc: toml::Table = raw
        .parse()
        .unwrap_or_else(|e| panic!("invalid {KEYWORDS_FILE}: {e}"));

    let mut out = String::from("// @generated by build.rs from config/funding_keywords.toml\n\n");
    for &(table, key, name) in TABLES {
        let words = string_array(&doc, table, key);
        writeln!(out, "pub static {name}: &[&str] = &[").unwrap();
        for word in &words {
            writeln!(out, "    {word:?},").unwrap();
        }
        writeln!(out, "];\n").unwrap();
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("keywords.rs"), out).expect("write keywords.rs");
}

fn string_array(doc: &toml::Table, table: &str, key: &str) -> Vec<String> {
    let values = doc
        .get(table)
        .and_then(|t| t.get(key))
        .and_then(|v| v.as_array())
        .unwrap_or_else(|| panic!("{KEYWORDS_FILE}: missing [{table}].{key} array"));

    values
        .iter()
        .map(|v| {
            v.as_str()
                .unwrap_or_else(|| panic!("{KEYWORDS_FILE}: [{table}].{key} must hold strings"))
                .trim()
        })
        .map(|s| {
            if table == "queries" || key == "negative_acronyms" {
                s.to_string()
            } else {
                s.to_lowercase()
            }
        })
        .filter(|s| !s.is_empty())
        .collect()
}

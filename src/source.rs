//! Source identifiers — canonical form and trust.
//!
//! Source ids that are URLs get tracking params (utm_*, fbclid, gclid, etc.)
//! and fragments stripped, and Google News redirects resolved, so the same
//! article reached through two links counts once. Anything that is not a URL
//! passes through untouched.

use url::Url;

use crate::keywords::TRUSTED_DOMAINS;

static TRACKING_QUERY_PREFIXES: &[&str] = &["utm_"];
static TRACKING_QUERY_KEYS: &[&str] = &["fbclid", "gclid", "oc", "ved", "cid"];

/// Strip tracking parameters and the fragment from a URL.
pub fn strip_tracking_params(source_id: &str) -> String {
    let parsed = match Url::parse(source_id) {
        Ok(u) => u,
        Err(_) => return source_id.to_string(),
    };

    let mut clean = parsed.clone();
    let clean_pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| {
            let lk = key.to_lowercase();
            if TRACKING_QUERY_KEYS.contains(&lk.as_str()) {
                return false;
            }
            !TRACKING_QUERY_PREFIXES.iter().any(|p| lk.starts_with(p))
        })
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    if clean_pairs.is_empty() {
        clean.set_query(None);
    } else {
        let qs: Vec<String> = clean_pairs
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    k.clone()
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect();
        clean.set_query(Some(&qs.join("&")));
    }

    clean.set_fragment(None);
    clean.to_string()
}

/// Canonical form of a snippet's source id.
pub fn canonicalize_source(source_id: &str) -> String {
    let raw = source_id.trim();
    if raw.is_empty() {
        return raw.to_string();
    }

    if let Some(target) = extract_google_target(raw) {
        return strip_tracking_params(&target);
    }

    strip_tracking_params(raw)
}

fn extract_google_target(source_id: &str) -> Option<String> {
    let parsed = Url::parse(source_id).ok()?;
    let host = parsed.host_str()?;
    if !host.contains("news.google.") {
        return None;
    }

    for (key, value) in parsed.query_pairs() {
        let lk = key.to_lowercase();
        if matches!(lk.as_str(), "url" | "u" | "q") {
            let candidate = value.trim().to_string();
            if candidate.starts_with("http://") || candidate.starts_with("https://") {
                return Some(candidate);
            }
        }
    }
    None
}

/// Allow-list of publishers whose figures win conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTrust {
    domains: Vec<String>,
}

impl Default for SourceTrust {
    fn default() -> Self {
        Self::new(TRUSTED_DOMAINS.iter().copied())
    }
}

impl SourceTrust {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().trim_start_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Trust no one; conflicts always keep the first-seen value.
    pub fn none() -> Self {
        Self {
            domains: Vec::new(),
        }
    }

    /// 1 for a source on an allow-listed domain (or a subdomain of one),
    /// 0 otherwise, including non-URL ids.
    pub fn score(&self, source_id: &str) -> u8 {
        let host = match Url::parse(source_id.trim()) {
            Ok(u) => match u.host_str() {
                Some(h) => h.to_lowercase(),
                None => return 0,
            },
            Err(_) => return 0,
        };
        let trusted = self.domains.iter().any(|d| {
            host == *d
                || host
                    .strip_suffix(d.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        });
        u8::from(trusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_utm() {
        let result = strip_tracking_params(
            "https://techcrunch.com/acme-series-c?id=42&utm_source=twitter&utm_medium=social",
        );
        assert_eq!(result, "https://techcrunch.com/acme-series-c?id=42");
    }

    #[test]
    fn test_strip_fbclid_and_fragment() {
        let result = strip_tracking_params("https://example.com/news?fbclid=abc123&page=1#top");
        assert_eq!(result, "https://example.com/news?page=1");
    }

    #[test]
    fn test_non_url_passes_through() {
        assert_eq!(canonicalize_source("s1"), "s1");
        assert_eq!(canonicalize_source("  seed  "), "seed");
        assert_eq!(canonicalize_source(""), "");
    }

    #[test]
    fn test_google_news_redirect() {
        let result = canonicalize_source(
            "https://news.google.com/rss/articles?url=https%3A%2F%2Fexample.com%2Fstory&oc=5",
        );
        assert_eq!(result, "https://example.com/story");
    }

    #[test]
    fn test_trust_score() {
        let trust = SourceTrust::default();
        assert_eq!(trust.score("https://techcrunch.com/2023/05/23/acme"), 1);
        assert_eq!(trust.score("https://www.reuters.com/tech"), 1);
        assert_eq!(trust.score("https://notreuters.com/tech"), 0);
        assert_eq!(trust.score("https://someblog.io/post"), 0);
        assert_eq!(trust.score("s1"), 0);
    }

    #[test]
    fn test_trust_custom_and_none() {
        let trust = SourceTrust::new(["Example.org"]);
        assert_eq!(trust.score("https://news.example.org/a"), 1);
        assert_eq!(SourceTrust::none().score("https://techcrunch.com/"), 0);
    }
}

//! Best-effort extraction of selectors from free-text oracle responses
//!
//! The oracle is a model completion, not a typed API: it is asked for
//! `{"selectors": [...]}` but may wrap it in prose, return a bare array, or
//! return nothing usable. `parse_selectors` is total and lossy. It never
//! fails; anything it cannot use is dropped.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// A set of unique CSS selector strings (exact string equality)
pub type SelectorSet = BTreeSet<String>;

/// Widest greedy `{...}` or `[...]`, whichever starts first
fn json_region() -> &'static Regex {
    static JSON_REGION: OnceLock<Regex> = OnceLock::new();
    JSON_REGION.get_or_init(|| {
        Regex::new(r"(?s)\{.*\}|\[.*\]").expect("JSON region pattern is valid")
    })
}

/// Extracts the candidate selector list from an oracle response
///
/// Takes the first region that looks like a JSON object or array and decodes
/// it. An array is used as-is; for an object, the first list-valued field (in
/// document order) is used. Non-string and blank elements are discarded.
/// Returns an empty set when nothing usable is found.
///
/// # Example
///
/// ```
/// use doc_harvester::oracle::parse_selectors;
///
/// let set = parse_selectors(r#"Sure! {"selectors": ["a.btn", "div#x"]} Hope this helps."#);
/// assert!(set.contains("a.btn") && set.contains("div#x"));
/// assert!(parse_selectors("no json here").is_empty());
/// ```
pub fn parse_selectors(raw_text: &str) -> SelectorSet {
    let Some(region) = json_region().find(raw_text) else {
        tracing::debug!("No JSON object or array found in oracle response");
        return SelectorSet::new();
    };

    let value: Value = match serde_json::from_str(region.as_str()) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Failed to decode JSON from oracle response: {}", e);
            return SelectorSet::new();
        }
    };

    let candidates = match value {
        Value::Array(items) => items,
        Value::Object(fields) => match fields.into_iter().find_map(|(_, v)| match v {
            Value::Array(items) => Some(items),
            _ => None,
        }) {
            Some(items) => items,
            None => {
                tracing::debug!("Oracle returned an object without a list field");
                return SelectorSet::new();
            }
        },
        _ => return SelectorSet::new(),
    };

    candidates
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        })
        .collect()
}

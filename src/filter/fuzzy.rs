//! Fuzzy matching implementation.
//!
//! Uses SkimMatcherV2 for fuzzy matching with scoring.

use std::sync::OnceLock;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::store::ConfigEntry;

/// Global matcher instance, initialised once and reused across calls.
static GLOBAL_MATCHER: OnceLock<SkimMatcherV2> = OnceLock::new();

fn global_matcher() -> &'static SkimMatcherV2 {
    GLOBAL_MATCHER.get_or_init(SkimMatcherV2::default)
}

/// Filter entries by name.
///
/// With `fuzzy` set, names are matched with the skim algorithm; otherwise a
/// case-insensitive substring match is used and every hit scores 0.
///
/// Returns `(index, score)` pairs, best matches first. Ties keep list order.
///
/// # Examples
///
/// ```
/// use dd_switch::filter::filter_entries;
/// use dd_switch::store::ConfigEntry;
///
/// let entries = vec![
///     ConfigEntry::from_path("/c/claude.json"),
///     ConfigEntry::from_path("/c/gpt.json"),
/// ];
///
/// let results = filter_entries("cld", &entries, true);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].0, 0);
/// ```
pub fn filter_entries(query: &str, entries: &[ConfigEntry], fuzzy: bool) -> Vec<(usize, i64)> {
    if query.is_empty() {
        return (0..entries.len()).map(|i| (i, 0)).collect();
    }

    let query_lower = query.to_lowercase();
    let mut name_buffer = String::with_capacity(64);

    let mut hits: Vec<(usize, i64)> = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            name_buffer.clear();
            name_buffer.extend(entry.name().chars().flat_map(|c| c.to_lowercase()));

            if fuzzy {
                global_matcher()
                    .fuzzy_match(&name_buffer, &query_lower)
                    .map(|score| (idx, score))
            } else if name_buffer.contains(&query_lower) {
                Some((idx, 0))
            } else {
                None
            }
        })
        .collect();

    hits.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    hits
}

/// Check if a query fuzzy-matches text, ignoring case.
pub fn matches(query: &str, text: &str) -> bool {
    match_score(query, text).is_some()
}

/// Fuzzy match score of a query against text, ignoring case.
///
/// An empty query matches everything with score 0.
pub fn match_score(query: &str, text: &str) -> Option<i64> {
    if query.is_empty() {
        return Some(0);
    }

    global_matcher().fuzzy_match(&text.to_lowercase(), &query.to_lowercase())
}

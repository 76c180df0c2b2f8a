//! Deterministic fact extraction — regex patterns, keyword lists, and a
//! clean/dedup/filter pipeline. No network, no state.

pub mod clean;
pub mod keywords;
pub mod patterns;

use tracing::debug;

use crate::types::{Category, ClassificationResult, ExtractedItem};
use clean::{clean_value, dedup_substrings, remove_generic, CandidateSet};

/// Categories filled by pattern matching; notes are the input itself.
const MATCHED_CATEGORIES: [Category; 3] =
    [Category::Interest, Category::ImportantDate, Category::Place];

/// Classify `text` using only local pattern matching.
///
/// The caller rejects empty input before reaching this point; notes always
/// holds exactly one item with the original text.
pub fn extract_rules(text: &str) -> ClassificationResult {
    let lowered = text.to_lowercase();
    let mut result = ClassificationResult::default();

    for category in MATCHED_CATEGORIES {
        let values = extract_category(category, text, &lowered);
        result
            .items_mut(category)
            .extend(values.into_iter().map(ExtractedItem::new));
    }

    result.push(Category::Note, ExtractedItem::new(text));

    debug!(
        "Rule extraction: interests={}, dates={}, places={}",
        result.interests.len(),
        result.important_dates.len(),
        result.places.len()
    );

    result
}

/// Run the full pipeline for one category.
pub fn extract_category(category: Category, text: &str, lowered: &str) -> Vec<String> {
    let mut candidates = CandidateSet::new();

    // Regex captures go in first so their phrasing wins on a shared key.
    for raw in patterns::capture_candidates(category, text) {
        let cleaned = clean_value(&raw);
        if cleaned.chars().count() > 1 {
            candidates.insert(cleaned);
        }
    }
    for hit in keywords::keyword_candidates(category, lowered) {
        candidates.insert(hit);
    }

    let filtered = remove_generic(candidates.into_values(), keywords::stoplist_for(category));
    dedup_substrings(filtered)
}

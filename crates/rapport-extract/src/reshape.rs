//! Fan categorized facts out into the four client-facing sequences.

use crate::types::{Category, ClassificationResult, ExtractedItem, Fact};

/// Append each fact's value to every category it names.
///
/// No deduplication happens here; callers dedup upstream.
pub fn reshape(facts: &[Fact]) -> ClassificationResult {
    let mut result = ClassificationResult::default();
    for fact in facts {
        if fact.categories.is_empty() {
            result.push(Category::Note, ExtractedItem::new(fact.value.clone()));
            continue;
        }
        for category in &fact.categories {
            result.push(*category, ExtractedItem::new(fact.value.clone()));
        }
    }
    result
}

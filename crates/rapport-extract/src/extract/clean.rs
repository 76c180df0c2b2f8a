//! Candidate cleaning and the dedup/filter passes.

use std::collections::HashSet;

use crate::types::normalize;

/// Punctuation stripped from the end of a candidate.
const TRAILING_PUNCT: &[char] = &[',', ';', '.', '!', '?'];

/// Strip trailing punctuation, collapse whitespace runs, trim.
///
/// `clean_value(clean_value(x)) == clean_value(x)` for every `x`.
pub fn clean_value(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| TRAILING_PUNCT.contains(&c) || c.is_whitespace())
        .trim()
        .to_string()
}

/// Capitalize the first letter of each word.
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered candidate set keyed by normalized value; the first insertion wins.
#[derive(Debug, Default)]
pub struct CandidateSet {
    seen: HashSet<String>,
    values: Vec<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a display value. Returns `false` when the key already exists.
    pub fn insert(&mut self, value: String) -> bool {
        let key = normalize(&value);
        if key.is_empty() || !self.seen.insert(key) {
            return false;
        }
        self.values.push(value);
        true
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

/// Drop values whose normalized form is in `stoplist`.
pub fn remove_generic(values: Vec<String>, stoplist: &[&str]) -> Vec<String> {
    values
        .into_iter()
        .filter(|v| {
            let key = normalize(v);
            !key.is_empty() && !stoplist.contains(&key.as_str())
        })
        .collect()
}

/// Collapse near-duplicates: visiting values shortest first, a value is
/// dropped when an already-kept value equals it or is contained in it.
/// Survivors keep their original relative order.
pub fn dedup_substrings(values: Vec<String>) -> Vec<String> {
    let keys: Vec<String> = values.iter().map(|v| normalize(v)).collect();

    let mut by_length: Vec<usize> = (0..values.len()).collect();
    // Stable sort keeps first-seen order among equal lengths.
    by_length.sort_by_key(|&i| keys[i].chars().count());

    let mut kept: Vec<usize> = Vec::new();
    for i in by_length {
        let covered = kept.iter().any(|&k| keys[i].contains(keys[k].as_str()));
        if !covered {
            kept.push(i);
        }
    }
    kept.sort_unstable();

    let mut values: Vec<Option<String>> = values.into_iter().map(Some).collect();
    kept.into_iter().filter_map(|i| values[i].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value("  sushi,  "), "sushi");
        assert_eq!(clean_value("rock   climbing!?"), "rock climbing");
        assert_eq!(clean_value("Tokyo . ."), "Tokyo");
        assert_eq!(clean_value("...leading stays"), "...leading stays");
        assert_eq!(clean_value(""), "");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let inputs = [
            "foo . .",
            "  a\t\tb  c;;",
            "New   York!",
            "?!",
            "ends with space ,",
            "multi\nline\r\ntext.",
        ];
        for input in inputs {
            let once = clean_value(input);
            assert_eq!(clean_value(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("video  games"), "Video Games");
        assert_eq!(title_case("café"), "Café");
    }

    #[test]
    fn test_candidate_set_first_wins() {
        let mut set = CandidateSet::new();
        assert!(set.insert("went to Tokyo".into()));
        assert!(set.insert("Tokyo".into()));
        assert!(!set.insert("tokyo ".into()));
        assert!(!set.insert("   ".into()));
        assert_eq!(set.into_values(), vec!["went to Tokyo", "Tokyo"]);
    }

    #[test]
    fn test_remove_generic() {
        let values = vec!["A lot".to_string(), "sushi".to_string(), "often".to_string()];
        assert_eq!(remove_generic(values, &["a lot", "often"]), vec!["sushi"]);
    }

    #[test]
    fn test_dedup_substrings_prefers_shorter() {
        let values = vec!["went to Tokyo".to_string(), "Tokyo".to_string(), "Paris".to_string()];
        assert_eq!(dedup_substrings(values), vec!["Tokyo", "Paris"]);
    }

    #[test]
    fn test_dedup_substrings_no_survivor_contains_another() {
        let values: Vec<String> = ["hiking trips", "Hiking", "board games", "games", "chess", "Chess club"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let kept = dedup_substrings(values);
        assert_eq!(kept, vec!["Hiking", "games", "chess"]);
        for (i, a) in kept.iter().enumerate() {
            for (j, b) in kept.iter().enumerate() {
                if i != j {
                    assert!(!normalize(a).contains(&normalize(b)));
                }
            }
        }
    }
}

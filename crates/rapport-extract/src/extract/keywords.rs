//! Keyword lists and stoplists per category.

use once_cell::sync::Lazy;
use regex::Regex;

use super::clean::title_case;
use crate::types::Category;

const INTEREST_KEYWORDS: &[&str] = &[
    "hiking", "reading", "cooking", "baking", "photography", "painting", "drawing",
    "gardening", "fishing", "camping", "cycling", "swimming", "yoga", "dancing",
    "singing", "tennis", "golf", "soccer", "football", "basketball", "baseball",
    "hockey", "volleyball", "chess", "guitar", "piano", "violin", "drums", "jazz",
    "anime", "video games", "board games", "rock climbing", "surfing", "skiing",
    "snowboarding", "knitting", "sushi", "pizza", "ramen", "tacos", "coffee",
    "craft beer", "wine", "chocolate",
];

const PLACE_KEYWORDS: &[&str] = &[
    "tokyo", "kyoto", "osaka", "paris", "london", "berlin", "rome", "madrid",
    "barcelona", "amsterdam", "lisbon", "dublin", "prague", "vienna", "new york",
    "boston", "chicago", "seattle", "san francisco", "los angeles", "miami",
    "austin", "denver", "toronto", "vancouver", "montreal", "mexico city",
    "sydney", "melbourne", "singapore", "hong kong", "seoul", "bangkok", "dubai",
    "japan", "france", "italy", "spain", "germany", "canada", "mexico",
    "australia", "china", "india", "brazil", "cafe", "beach", "park", "museum",
    "library", "airport", "zoo",
];

const DATE_KEYWORDS: &[&str] = &[
    "birthday", "anniversary", "wedding", "graduation", "deadline", "due date",
    "christmas", "thanksgiving", "halloween", "new year", "retirement",
    "baby shower", "reunion",
];

/// Filler that is never a fact in any category.
pub const GENERIC_FILLER: &[&str] = &[
    "a lot", "lots", "so much", "very much", "much", "often", "sometimes",
    "always", "never", "it", "this", "that", "these", "those", "them", "things",
    "stuff", "something", "everything", "anything", "nothing", "there", "here",
    "too",
];

const INTEREST_STOP: &[&str] = &[
    "to", "the", "doing", "going", "being", "you", "him", "her", "me", "us",
    "people", "when", "how", "what", "with", "lot",
];

const PLACE_STOP: &[&str] = &[
    "restaurant", "home", "work", "school", "the", "i", "i'm", "we", "he",
    "she", "they", "my", "mom", "dad", "monday", "tuesday", "wednesday",
    "thursday", "friday", "saturday", "sunday", "january", "february", "march",
    "april", "may", "june", "july", "august", "september", "october",
    "november", "december",
];

const DATE_STOP: &[&str] = &["today", "now", "soon", "later", "recently"];

/// A compiled whole-word/phrase keyword.
pub struct Keyword {
    pub phrase: &'static str,
    pattern: Regex,
}

impl Keyword {
    fn compile(phrase: &'static str) -> Self {
        // Multi-word keywords tolerate any whitespace run between words.
        let body = phrase
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let pattern = Regex::new(&format!(r"\b{}\b", body)).expect("static keyword pattern");
        Self { phrase, pattern }
    }

    pub fn is_match(&self, lowered: &str) -> bool {
        self.pattern.is_match(lowered)
    }
}

fn compile_all(phrases: &[&'static str]) -> Vec<Keyword> {
    phrases.iter().copied().map(Keyword::compile).collect()
}

static INTERESTS: Lazy<Vec<Keyword>> = Lazy::new(|| compile_all(INTEREST_KEYWORDS));
static PLACES: Lazy<Vec<Keyword>> = Lazy::new(|| compile_all(PLACE_KEYWORDS));
static DATES: Lazy<Vec<Keyword>> = Lazy::new(|| compile_all(DATE_KEYWORDS));

static INTEREST_STOPLIST: Lazy<Vec<&'static str>> = Lazy::new(|| stoplist(INTEREST_STOP));
static PLACE_STOPLIST: Lazy<Vec<&'static str>> = Lazy::new(|| stoplist(PLACE_STOP));
static DATE_STOPLIST: Lazy<Vec<&'static str>> = Lazy::new(|| stoplist(DATE_STOP));

fn stoplist(specific: &[&'static str]) -> Vec<&'static str> {
    GENERIC_FILLER.iter().chain(specific.iter()).copied().collect()
}

pub fn keywords_for(category: Category) -> &'static [Keyword] {
    match category {
        Category::Interest => INTERESTS.as_slice(),
        Category::ImportantDate => DATES.as_slice(),
        Category::Place => PLACES.as_slice(),
        Category::Note => &[],
    }
}

/// Generic words dropped from a category (shared filler plus category terms).
pub fn stoplist_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Interest => INTEREST_STOPLIST.as_slice(),
        Category::ImportantDate => DATE_STOPLIST.as_slice(),
        Category::Place => PLACE_STOPLIST.as_slice(),
        Category::Note => &[],
    }
}

/// Scan the lowercased text for a category's keywords; hits are title-cased.
pub fn keyword_candidates(category: Category, lowered: &str) -> Vec<String> {
    keywords_for(category)
        .iter()
        .filter(|k| k.is_match(lowered))
        .map(|k| title_case(k.phrase))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundary() {
        assert!(keyword_candidates(Category::Place, "lunch at the cafeteria").is_empty());
        assert_eq!(keyword_candidates(Category::Place, "lunch at the cafe"), vec!["Cafe"]);
    }

    #[test]
    fn test_multi_word_flexible_whitespace() {
        let found = keyword_candidates(Category::Place, "she moved to new \t york");
        assert_eq!(found, vec!["New York"]);
        let found = keyword_candidates(Category::Interest, "loves video\ngames");
        assert_eq!(found, vec!["Video Games"]);
    }

    #[test]
    fn test_stoplists_include_generic_filler() {
        for category in [Category::Interest, Category::Place, Category::ImportantDate] {
            assert!(stoplist_for(category).contains(&"a lot"));
            assert!(stoplist_for(category).contains(&"often"));
        }
        assert!(stoplist_for(Category::Place).contains(&"restaurant"));
    }
}

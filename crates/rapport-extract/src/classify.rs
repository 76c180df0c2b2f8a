//! Deterministic category rules applied to a fact's source text.
//!
//! Priority: important date > place > interest > note. Overrides the
//! category an external model assigned.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Category;

static DATE_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:birthdays?|anniversar(?:y|ies)|deadlines?|due\s+date|wedding|graduation|retirement|reunion|appointment|holiday|christmas|thanksgiving|halloween|new\s+year'?s?)\b",
    )
    .unwrap()
});

/// Dates that stand on their own: month + day, day + month, ISO, numeric.
///
/// Month names must be capitalized; numeric forms must be a valid month/day.
static EXPLICIT_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+\d{1,2}(?:st|nd|rd|th)?\b|\d{1,2}(?:st|nd|rd|th)?\s+(?:of\s+)?(?:January|February|March|April|May|June|July|August|September|October|November|December)\b|\d{4}-\d{2}-\d{2}\b|(?:0?[1-9]|1[0-2])/(?:0?[1-9]|[12]\d|3[01])(?:/\d{2,4})?\b)",
    )
    .unwrap()
});

static PLACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:went|go|goes|going|gone|travell?ed|travell?ing|travels?|moved|moving|flew|flying|headed|drove)\s+(?:back\s+)?to|visit(?:ed|ing|s)?|(?:lives?|lived|living|based|stay(?:s|ed|ing)?|grew\s+up|born|raised)\s+(?:in|at|near)|from|(?:works?|worked|working)\s+(?:at|for))\b",
    )
    .unwrap()
});

static INTEREST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:likes?|liked|lov(?:e|es|ed|ing)|enjoy(?:s|ed|ing)?|adores?|plays?|playing|favou?rites?|fan\s+of|passionate\s+about|hobb(?:y|ies))\b|(?:\b(?:is|am|are)|'m|'re|'s)\s+(?:really\s+)?into\b)",
    )
    .unwrap()
});

/// True when the text names a dated event or an explicit date.
///
/// A bare month ("went to Paris in May") is not enough on its own.
pub fn has_date_indicator(text: &str) -> bool {
    DATE_KEYWORD_RE.is_match(text) || EXPLICIT_DATE_RE.is_match(text)
}

pub fn has_place_indicator(text: &str) -> bool {
    PLACE_RE.is_match(text)
}

pub fn has_interest_indicator(text: &str) -> bool {
    INTEREST_RE.is_match(text)
}

/// Derive a category from source text alone.
pub fn classify_source(text: &str) -> Category {
    if has_date_indicator(text) {
        Category::ImportantDate
    } else if has_place_indicator(text) {
        Category::Place
    } else if has_interest_indicator(text) {
        Category::Interest
    } else {
        Category::Note
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_outranks_place() {
        assert_eq!(classify_source("went to Tokyo for my birthday"), Category::ImportantDate);
        assert_eq!(classify_source("Our anniversary trip to Rome"), Category::ImportantDate);
    }

    #[test]
    fn test_explicit_dates() {
        assert_eq!(classify_source("the launch is 2025-03-14"), Category::ImportantDate);
        assert_eq!(classify_source("call her on 4/12"), Category::ImportantDate);
        assert_eq!(classify_source("it happened on May 3rd"), Category::ImportantDate);
        assert_eq!(classify_source("since the 3rd of June"), Category::ImportantDate);
    }

    #[test]
    fn test_bare_month_is_not_a_date() {
        assert_eq!(classify_source("went to Paris in May"), Category::Place);
        assert_eq!(classify_source("we may go"), Category::Note);
    }

    #[test]
    fn test_ratios_and_modal_may_are_not_dates() {
        assert_eq!(classify_source("She works 24/7 at Google"), Category::Place);
        assert_eq!(classify_source("we split it 50/50"), Category::Note);
        assert_ne!(classify_source("we may 3 times a week meet"), Category::ImportantDate);
        assert_eq!(classify_source("due back 12/31/2024"), Category::ImportantDate);
    }

    #[test]
    fn test_place_outranks_interest() {
        assert_eq!(classify_source("loves living in Lisbon"), Category::Place);
        assert_eq!(classify_source("I'm from Boston"), Category::Place);
        assert_eq!(classify_source("works at Google"), Category::Place);
    }

    #[test]
    fn test_interest_and_default() {
        assert_eq!(classify_source("She enjoys pottery"), Category::Interest);
        assert_eq!(classify_source("he's really into jazz"), Category::Interest);
        assert_eq!(classify_source("favorite color is green"), Category::Interest);
        assert_eq!(classify_source("has two kids"), Category::Note);
    }
}

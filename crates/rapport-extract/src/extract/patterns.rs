//! Capturing regex tables per category.
//!
//! Patterns run over the original-case text and the first capture group is
//! the candidate. Verbs and connectives are matched case-insensitively via
//! inline `(?i:...)` groups; proper-noun captures stay case-sensitive so
//! "went to Tokyo" yields "Tokyo" and "went to bed" yields nothing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Category;

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";
const WEEKDAYS: &str = "Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday";

/// A short lowercase-or-capitalized phrase of up to six words.
const PHRASE: &str = r"([A-Za-z][\w'&-]*(?:[ \t]+[\w'&-]+){0,5}?)";

/// Where a free phrase stops: punctuation, a connective, a filler, or end of text.
const PHRASE_END: &str = r"(?:\s*[,.;:!?]|\s+(?i:and|but|or|because|so|when|since|while|with|for|every|on|at|in|last|next|this|a\s+lot|so\s+much|very\s+much)\b|\s*$)";

/// One or more capitalized words.
const PROPER: &str = r"([A-Z][\w'-]*(?:[ \t]+[A-Z][\w'-]*)*)";

fn build(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static extraction pattern"))
        .collect()
}

static INTEREST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(
            r"(?i:\b(?:really\s+|absolutely\s+|also\s+)?(?:loves?|likes?|enjoys?|adores?)\s+(?:to\s+)?){}{}",
            PHRASE, PHRASE_END
        ),
        format!(
            r"(?i:(?:\b(?:is|am|are)|'m|'re)\s+(?:really\s+|very\s+)?into\s+|\bpassionate\s+about\s+|\bobsessed\s+with\s+|\b(?:a\s+)?(?:big\s+|huge\s+)?fan\s+of\s+|\binterested\s+in\s+|\bcrazy\s+about\s+){}{}",
            PHRASE, PHRASE_END
        ),
        format!(
            r"(?i:\bfavou?rite\s+\w+(?:\s+\w+)?\s+(?:is|are|was|were)\s+){}{}",
            PHRASE, PHRASE_END
        ),
        format!(r"(?i:\b(?:plays|playing|play)\s+(?:the\s+)?){}{}", PHRASE, PHRASE_END),
        format!(
            r"(?i:\bhobb(?:y|ies)\s+(?:is|are|include|includes)\s+){}{}",
            PHRASE, PHRASE_END
        ),
    ])
});

static PLACE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        format!(
            r"(?i:\b(?:went|go|goes|going|gone|travell?ed|travell?ing|travels?|moved|moving|move|flew|fly|flying|headed|heading|drove|driving)\s+(?:back\s+)?to\s+(?:the\s+)?){}",
            PROPER
        ),
        format!(r"(?i:\b(?:visit(?:ed|ing|s)?|explor(?:ed|ing|es?))\s+(?:the\s+)?){}", PROPER),
        format!(
            r"(?i:\b(?:lives?|lived|living|based|stay(?:s|ed|ing)?|resides?|grew\s+up|born|raised)\s+(?:in|at|near)\s+(?:the\s+)?){}",
            PROPER
        ),
        format!(r"(?i:\bfrom\s+){}", PROPER),
        format!(
            r"(?i:\b(?:works?|worked|working|stud(?:y|ies|ied|ying))\s+(?:at|for|in)\s+(?:the\s+)?){}",
            PROPER
        ),
        format!(r"(?i:\b(?:restaurant|cafe|café|bar|place|spot)\s+(?:called|named)\s+){}", PROPER),
    ])
});

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    build(&[
        // May 3rd, March 14, 2025
        format!(r"\b((?:{})\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?)\b", MONTHS),
        // 3rd of May, 14 March 2025
        format!(r"\b(\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?(?:{})(?:,?\s+\d{{4}})?)\b", MONTHS),
        // 2025-03-14
        r"\b(\d{4}-\d{2}-\d{2})\b".to_string(),
        // 3/14, 3/14/2025; month first, both in range
        r"\b((?:0?[1-9]|1[0-2])/(?:0?[1-9]|[12]\d|3[01])(?:/\d{2,4})?)\b".to_string(),
        // last April, next December
        format!(r"\b((?i:last|next|this|early|late|mid)[ \t]+(?:{}))\b", MONTHS),
        // next Friday, on Sunday
        format!(r"\b((?i:on|next|this|last)[ \t]+(?:{}))\b", WEEKDAYS),
    ])
});

/// Ordered regex list for a category. Notes have none.
pub fn patterns_for(category: Category) -> &'static [Regex] {
    match category {
        Category::Interest => INTEREST_PATTERNS.as_slice(),
        Category::ImportantDate => DATE_PATTERNS.as_slice(),
        Category::Place => PLACE_PATTERNS.as_slice(),
        Category::Note => &[],
    }
}

/// Run a category's patterns and return raw first-group captures in order.
pub fn capture_candidates(category: Category, text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for re in patterns_for(category) {
        for caps in re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let candidate = m.as_str().trim();
                if candidate.chars().count() > 1 {
                    out.push(candidate.to_string());
                }
            }
        }
    }
    out
}

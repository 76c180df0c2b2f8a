//! Sentence/clause chunking for the model-backed extractor.
//!
//! External models tend to answer a long message with a single fact, so input
//! is cut into sentence-sized pieces first. Long sentences are split further
//! on commas, semicolons, and conjunctions; tiny fragments are merged back so
//! the service is not called once per word.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on chunk length, in characters.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 180;
/// Chunks shorter than this absorb the following piece when it fits.
pub const DEFAULT_MIN_CHUNK_CHARS: usize = 80;

static CLAUSE_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[,;]\s+|\s+(?:and|but|so|because|while|although|though)\s+").unwrap()
});

/// Splits text into sentence/clause chunks bounded by character counts.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    pub max_chars: usize,
    pub min_chars: usize,
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_CHARS, DEFAULT_MIN_CHUNK_CHARS)
    }
}

impl SentenceChunker {
    pub fn new(max_chars: usize, min_chars: usize) -> Self {
        let max_chars = max_chars.max(1);
        Self {
            max_chars,
            min_chars: min_chars.min(max_chars),
        }
    }

    /// Chunk `text` in reading order. Empty input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut pieces: Vec<String> = Vec::new();
        for sentence in split_sentences(text) {
            if char_len(sentence) <= self.max_chars {
                pieces.push(sentence.to_string());
            } else {
                for clause in split_clauses(sentence) {
                    if char_len(clause) <= self.max_chars {
                        pieces.push(clause.to_string());
                    } else {
                        pieces.extend(split_words(clause, self.max_chars));
                    }
                }
            }
        }
        self.merge_small(pieces)
    }

    /// Greedily join a piece onto its predecessor while the predecessor is
    /// still under `min_chars` and the join stays within `max_chars`.
    fn merge_small(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();

        for piece in pieces {
            if current.is_empty() {
                current = piece;
                continue;
            }
            let current_len = char_len(&current);
            if current_len < self.min_chars && current_len + 1 + char_len(&piece) <= self.max_chars {
                current.push(' ');
                current.push_str(&piece);
            } else {
                chunks.push(std::mem::take(&mut current));
                current = piece;
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split text into sentences on `.`, `!`, `?` followed by whitespace, and on
/// line breaks.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        let boundary = b == b'\n'
            || ((b == b'.' || b == b'!' || b == b'?')
                && i + 1 < bytes.len()
                && bytes[i + 1].is_ascii_whitespace());
        if boundary {
            let s = text[start..=i].trim();
            if !s.is_empty() {
                sentences.push(s);
            }
            start = i + 1;
        }
    }
    let s = text[start..].trim();
    if !s.is_empty() {
        sentences.push(s);
    }
    sentences
}

/// Split a sentence at commas/semicolons (kept on the left piece) and before
/// conjunctions (kept on the right piece).
pub fn split_clauses(sentence: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut start = 0;
    for m in CLAUSE_BREAK_RE.find_iter(sentence) {
        let split_at = if m.as_str().starts_with([',', ';']) {
            m.start() + 1
        } else {
            m.start()
        };
        let clause = sentence[start..split_at].trim();
        if !clause.is_empty() {
            clauses.push(clause);
        }
        start = split_at;
    }
    let rest = sentence[start..].trim();
    if !rest.is_empty() {
        clauses.push(rest);
    }
    clauses
}

/// Last resort for run-on text: pack whole words up to `max_chars`.
fn split_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && char_len(&current) + 1 + char_len(word) > max_chars {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

//! Parse-then-validate for model replies.
//!
//! Raw reply text becomes a list of untyped records (`parse_reply`), and each
//! record either becomes a [`Fact`] or is rejected (`validate_record`).
//! Nothing downstream ever sees an unvalidated record.

use rapport_extract::extract::clean::clean_value;
use rapport_extract::Fact;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Keys a model may wrap its record list in.
const LIST_KEYS: &[&str] = &["facts", "entries", "items", "results"];
const TYPE_KEYS: &[&str] = &["type", "category", "types", "categories"];
const VALUE_KEYS: &[&str] = &["value", "fact"];
const SOURCE_KEYS: &[&str] = &["source_text", "sourceText", "source", "quote"];

/// Why a whole reply could not be read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplyError {
    #[error("reply was empty")]
    Empty,
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(String),
}

/// Why a single record was dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("record is not an object")]
    NotAnObject,
    #[error("record has no value")]
    MissingValue,
    #[error("record has no type")]
    MissingType,
    #[error("record has no source text")]
    MissingSource,
    #[error("source text is not in the chunk")]
    SourceNotInChunk,
}

/// Validated facts from one chunk, plus how many records were dropped.
#[derive(Debug, Default)]
pub struct ChunkFacts {
    pub facts: Vec<Fact>,
    pub rejected: usize,
}

/// Read a raw reply against the chunk it was produced from.
pub fn read_facts(raw: &str, chunk: &str) -> Result<ChunkFacts, ReplyError> {
    let mut out = ChunkFacts::default();
    for record in parse_reply(raw)? {
        match validate_record(&record, chunk) {
            Ok(fact) => out.facts.push(fact),
            Err(reason) => {
                debug!("Dropping model record ({}): {}", reason, record);
                out.rejected += 1;
            }
        }
    }
    Ok(out)
}

/// Turn raw reply text into candidate records.
pub fn parse_reply(raw: &str) -> Result<Vec<Value>, ReplyError> {
    let text = strip_fences(raw.trim());
    if text.is_empty() {
        return Err(ReplyError::Empty);
    }
    let value = parse_lenient(text)?;
    Ok(records_from(value))
}

/// Remove a surrounding markdown code fence, with or without a language tag.
fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse JSON, falling back to the outermost `{...}` span when the reply
/// wraps the object in prose.
fn parse_lenient(text: &str) -> Result<Value, ReplyError> {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => Ok(v),
        Err(first) => {
            let span = text
                .find('{')
                .zip(text.rfind('}'))
                .filter(|(start, end)| start < end)
                .map(|(start, end)| &text[start..=end]);
            match span {
                Some(inner) => serde_json::from_str::<Value>(inner)
                    .map_err(|e| ReplyError::InvalidJson(e.to_string())),
                None => Err(ReplyError::InvalidJson(first.to_string())),
            }
        }
    }
}

/// Coerce the reply shape into a record list.
///
/// A wrapped list is unwrapped, a top-level array is taken as-is, and a bare
/// object counts as one record only if it looks like one.
fn records_from(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            if let Some(key) = LIST_KEYS.iter().find(|k| obj.contains_key(**k)) {
                return match obj.remove(*key) {
                    Some(Value::Array(items)) => items,
                    Some(single @ Value::Object(_)) => vec![single],
                    _ => Vec::new(),
                };
            }
            if has_any(&obj, TYPE_KEYS) || has_any(&obj, VALUE_KEYS) {
                vec![Value::Object(obj)]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}

fn has_any(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|k| obj.contains_key(*k))
}

/// First present, non-blank string under any of `keys`. A literal "null"
/// counts as blank.
fn text_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
}

/// Category labels: a single string or an array of strings.
fn type_labels(obj: &Map<String, Value>) -> Vec<String> {
    for key in TYPE_KEYS {
        match obj.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() && !s.trim().eq_ignore_ascii_case("null") => {
                return vec![s.trim().to_string()];
            }
            Some(Value::Array(items)) => {
                let labels: Vec<String> = items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                if !labels.is_empty() {
                    return labels;
                }
            }
            _ => {}
        }
    }
    Vec::new()
}

/// Check one record against the chunk it came from.
///
/// The source text must appear verbatim in the chunk; anything else is
/// treated as invented.
pub fn validate_record(record: &Value, chunk: &str) -> Result<Fact, Rejection> {
    let obj = record.as_object().ok_or(Rejection::NotAnObject)?;

    let value = text_field(obj, VALUE_KEYS)
        .map(clean_value)
        .filter(|v| !v.is_empty())
        .ok_or(Rejection::MissingValue)?;

    let labels = type_labels(obj);
    if labels.is_empty() {
        return Err(Rejection::MissingType);
    }

    let source = text_field(obj, SOURCE_KEYS).ok_or(Rejection::MissingSource)?;
    if !chunk.contains(source) {
        return Err(Rejection::SourceNotInChunk);
    }

    Ok(Fact::from_labels(&labels, value, source))
}

impl From<ReplyError> for rapport_core::Error {
    fn from(e: ReplyError) -> Self {
        rapport_core::Error::Extraction(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_extract::Category;
    use serde_json::json;

    const CHUNK: &str = "I love sushi and my birthday is May 3rd.";

    #[test]
    fn test_wrapped_list() {
        let raw = r#"{"facts":[
            {"type":"interest","value":"Loves sushi","source_text":"I love sushi"},
            {"type":"important_date","value":"Birthday on May 3rd","source_text":"my birthday is May 3rd"}
        ]}"#;
        let out = read_facts(raw, CHUNK).unwrap();
        assert_eq!(out.facts.len(), 2);
        assert_eq!(out.facts[0].categories, vec![Category::Interest]);
        assert_eq!(out.facts[1].categories, vec![Category::ImportantDate]);
        assert_eq!(out.rejected, 0);
    }

    #[test]
    fn test_code_fence_and_prose() {
        let fenced = "```json\n{\"facts\":[{\"type\":\"interest\",\"value\":\"Sushi\",\"source_text\":\"I love sushi\"}]}\n```";
        assert_eq!(parse_reply(fenced).unwrap().len(), 1);

        let prose = "Sure! Here you go: {\"facts\":[{\"type\":\"interest\",\"value\":\"Sushi\",\"source_text\":\"I love sushi\"}]} Hope that helps.";
        assert_eq!(parse_reply(prose).unwrap().len(), 1);
    }

    #[test]
    fn test_single_object_and_top_level_array() {
        let single = r#"{"type":"interest","value":"Sushi","source_text":"I love sushi"}"#;
        assert_eq!(parse_reply(single).unwrap().len(), 1);

        let array = r#"[{"type":"interest","value":"Sushi","source_text":"I love sushi"}]"#;
        assert_eq!(parse_reply(array).unwrap().len(), 1);

        let wrapped_single = r#"{"facts":{"type":"interest","value":"Sushi","source_text":"I love sushi"}}"#;
        assert_eq!(parse_reply(wrapped_single).unwrap().len(), 1);
    }

    #[test]
    fn test_unrecognized_object_is_empty() {
        assert!(parse_reply(r#"{"answer":"nothing here"}"#).unwrap().is_empty());
        assert!(parse_reply(r#"{"facts":[]}"#).unwrap().is_empty());
        assert!(parse_reply("42").unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_replies() {
        assert_eq!(parse_reply("   "), Err(ReplyError::Empty));
        assert!(matches!(parse_reply("no json here"), Err(ReplyError::InvalidJson(_))));
        assert!(matches!(parse_reply("{ broken"), Err(ReplyError::InvalidJson(_))));
    }

    #[test]
    fn test_hallucinated_source_is_rejected() {
        let record = json!({"type":"place","value":"Went to Paris","source_text":"I went to Paris"});
        assert_eq!(validate_record(&record, CHUNK), Err(Rejection::SourceNotInChunk));
    }

    #[test]
    fn test_incomplete_records_are_rejected() {
        assert_eq!(validate_record(&json!("sushi"), CHUNK), Err(Rejection::NotAnObject));
        assert_eq!(
            validate_record(&json!({"type":"interest","source_text":"I love sushi"}), CHUNK),
            Err(Rejection::MissingValue)
        );
        assert_eq!(
            validate_record(&json!({"type":"interest","value":"null","source_text":"I love sushi"}), CHUNK),
            Err(Rejection::MissingValue)
        );
        assert_eq!(
            validate_record(&json!({"value":"Sushi","source_text":"I love sushi"}), CHUNK),
            Err(Rejection::MissingType)
        );
        assert_eq!(
            validate_record(&json!({"type":"interest","value":"Sushi"}), CHUNK),
            Err(Rejection::MissingSource)
        );
    }

    #[test]
    fn test_mixed_records_keep_the_valid_ones() {
        let raw = r#"{"facts":[
            {"type":"interest","value":"Loves sushi","source_text":"I love sushi"},
            {"type":"place","value":"Paris","source_text":"moved to Paris"},
            "junk"
        ]}"#;
        let out = read_facts(raw, CHUNK).unwrap();
        assert_eq!(out.facts.len(), 1);
        assert_eq!(out.rejected, 2);
    }

    #[test]
    fn test_unknown_type_becomes_note() {
        let record = json!({"type":"relationship","value":"Sushi.","source_text":"I love sushi"});
        let fact = validate_record(&record, CHUNK).unwrap();
        assert_eq!(fact.categories, vec![Category::Note]);
        assert_eq!(fact.value, "Sushi");
    }

    #[test]
    fn test_compound_types_are_kept() {
        let record = json!({"types":["interest","important_date"],"value":"Sushi birthday","source_text":"my birthday"});
        let fact = validate_record(&record, CHUNK).unwrap();
        assert_eq!(fact.categories, vec![Category::Interest, Category::ImportantDate]);
    }
}

//! Rapport Extract — fact data model, deterministic extraction, category
//! rules, chunking, reshaping, and document text readers.

pub mod chunking;
pub mod classify;
pub mod extract;
pub mod file;
pub mod reshape;
pub mod types;

pub use chunking::SentenceChunker;
pub use classify::classify_source;
pub use extract::extract_rules;
pub use file::{normalize_document_text, read_document, DocumentKind};
pub use reshape::reshape;
pub use types::{normalize, Category, ClassificationResult, ExtractedItem, Fact};

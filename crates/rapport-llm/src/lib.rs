//! Model-backed fact extraction over external LLM APIs (OpenAI/Anthropic/Groq).
//!
//! Text is chunked, each chunk is sent to the configured provider, and the
//! replies are parsed and validated before they become facts. No local model
//! is required.

pub mod config;
pub mod extractor;
pub mod prompt;
pub mod providers;
pub mod reply;
pub mod types;

pub use config::LLMConfig;
pub use extractor::ModelExtractor;
pub use providers::{CompletionBackend, HttpBackend, RetryPolicy};
pub use types::*;

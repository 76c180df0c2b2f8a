//! Model-backed extraction: chunk, ask, validate, merge.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use rapport_core::{Error, ModelLimits, Result};
use rapport_extract::{
    classify_source, normalize, reshape, Category, ClassificationResult, Fact, SentenceChunker,
};
use tracing::{debug, info, warn};

use crate::prompt::{user_message, EXTRACTION_PROMPT};
use crate::providers::CompletionBackend;
use crate::reply::read_facts;

/// Extracts facts by sending sentence-sized chunks to a completion backend.
pub struct ModelExtractor {
    backend: Arc<dyn CompletionBackend>,
    chunker: SentenceChunker,
    concurrency: usize,
    reclassify: bool,
}

impl ModelExtractor {
    pub fn new(backend: Arc<dyn CompletionBackend>, limits: &ModelLimits) -> Self {
        Self {
            backend,
            chunker: SentenceChunker::default(),
            concurrency: limits.concurrency.max(1),
            reclassify: limits.reclassify,
        }
    }

    pub fn with_chunker(mut self, chunker: SentenceChunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn backend_name(&self) -> String {
        self.backend.describe()
    }

    /// Extract and shape facts for the client.
    pub async fn extract(&self, text: &str) -> Result<ClassificationResult> {
        let facts = self.extract_facts(text).await?;
        Ok(reshape(&facts))
    }

    /// Validated, deduplicated facts in chunk order.
    ///
    /// A chunk whose call or reply fails contributes nothing; the request
    /// only fails when every chunk does.
    pub async fn extract_facts(&self, text: &str) -> Result<Vec<Fact>> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Err(Error::Validation("text is empty".into()));
        }
        let total = chunks.len();
        debug!("Extracting from {} chunk(s) via {}", total, self.backend.describe());

        // `buffered` yields results in input order. Chunks are moved into
        // each future so the stream stays `Send` for any caller lifetime.
        let outcomes: Vec<Result<Vec<Fact>>> = stream::iter(chunks.into_iter().enumerate())
            .map(|(index, chunk)| async move { self.process_chunk(index, &chunk).await })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut facts = Vec::new();
        let mut last_error = None;
        let mut failed = 0usize;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(chunk_facts) => facts.extend(chunk_facts),
                Err(e) => {
                    warn!("Chunk {}/{} failed: {}", index + 1, total, e);
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }

        if failed == total {
            let cause = last_error.map(|e| e.to_string()).unwrap_or_default();
            return Err(Error::Extraction(format!(
                "all {} chunk(s) failed: {}",
                total, cause
            )));
        }

        if self.reclassify {
            for fact in &mut facts {
                fact.categories = vec![classify_source(&fact.source_text)];
            }
        }

        let facts = dedup_facts(facts);
        info!(
            "Extracted {} fact(s) from {} chunk(s) ({} failed)",
            facts.len(),
            total,
            failed
        );
        Ok(facts)
    }

    async fn process_chunk(&self, index: usize, chunk: &str) -> Result<Vec<Fact>> {
        let raw = self
            .backend
            .complete(EXTRACTION_PROMPT, &user_message(chunk))
            .await?;
        let parsed = read_facts(&raw, chunk)?;
        if parsed.rejected > 0 {
            debug!("Chunk {}: dropped {} record(s)", index + 1, parsed.rejected);
        }
        Ok(parsed.facts)
    }
}

/// Keep the first fact for each (category, normalized value) pair.
fn dedup_facts(facts: Vec<Fact>) -> Vec<Fact> {
    let mut seen: HashSet<(Category, String)> = HashSet::new();
    facts
        .into_iter()
        .filter(|fact| seen.insert((fact.primary_category(), normalize(&fact.value))))
        .collect()
}

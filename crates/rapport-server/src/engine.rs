//! Extraction engine selection.

use std::sync::Arc;

use rapport_core::{Error, ExtractorMode, ModelLimits, RapportConfig, Result};
use rapport_extract::{extract_rules, ClassificationResult};
use rapport_llm::{CompletionBackend, HttpBackend, LLMConfig, ModelExtractor, ResolvedProvider, RetryPolicy};
use tracing::info;

/// Which extractor serves requests.
pub enum Engine {
    /// Deterministic pattern/keyword extractor.
    Rules,
    /// External-model extractor.
    Model(ModelExtractor),
}

impl Engine {
    /// Pick an engine from config plus the provider settings on disk.
    pub fn from_config(config: &RapportConfig) -> Result<Self> {
        let llm = LLMConfig::load(&config.data_paths.llm_config_file);
        Self::select(config, llm.resolve_provider())
    }

    /// `auto` uses a model when one is configured and falls back to rules.
    pub fn select(config: &RapportConfig, provider: Option<ResolvedProvider>) -> Result<Self> {
        match (config.extractor, provider) {
            (ExtractorMode::Rules, _) => Ok(Engine::Rules),
            (ExtractorMode::Model, None) => Err(Error::Config(
                "model extraction requested but no provider API key is configured".into(),
            )),
            (ExtractorMode::Auto, None) => {
                info!("No LLM provider configured; using rule-based extraction");
                Ok(Engine::Rules)
            }
            (_, Some(provider)) => {
                let backend = HttpBackend::new(provider, RetryPolicy::from(&config.model))?;
                Ok(Self::model(Arc::new(backend), &config.model))
            }
        }
    }

    pub fn model(backend: Arc<dyn CompletionBackend>, limits: &ModelLimits) -> Self {
        Engine::Model(ModelExtractor::new(backend, limits))
    }

    pub fn describe(&self) -> String {
        match self {
            Engine::Rules => "rules".into(),
            Engine::Model(extractor) => format!("model ({})", extractor.backend_name()),
        }
    }

    pub async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        if text.trim().is_empty() {
            return Err(Error::Validation("text is required".into()));
        }
        match self {
            Engine::Rules => Ok(extract_rules(text)),
            Engine::Model(extractor) => extractor.extract(text).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_llm::LLMProvider;

    fn config(mode: ExtractorMode) -> RapportConfig {
        RapportConfig {
            extractor: mode,
            ..Default::default()
        }
    }

    fn provider() -> ResolvedProvider {
        ResolvedProvider {
            provider: LLMProvider::Groq,
            model: "llama".into(),
            api_key: "gsk".into(),
            base_url: None,
        }
    }

    #[test]
    fn test_auto_without_provider_uses_rules() {
        let engine = Engine::select(&config(ExtractorMode::Auto), None).unwrap();
        assert!(matches!(engine, Engine::Rules));
    }

    #[test]
    fn test_auto_with_provider_uses_model() {
        let engine = Engine::select(&config(ExtractorMode::Auto), Some(provider())).unwrap();
        assert_eq!(engine.describe(), "model (groq:llama)");
    }

    #[test]
    fn test_rules_mode_ignores_provider() {
        let engine = Engine::select(&config(ExtractorMode::Rules), Some(provider())).unwrap();
        assert!(matches!(engine, Engine::Rules));
    }

    #[test]
    fn test_model_mode_requires_provider() {
        assert!(matches!(
            Engine::select(&config(ExtractorMode::Model), None),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_text_is_a_validation_error() {
        let err = Engine::Rules.classify(" \n").await.unwrap_err();
        assert!(err.is_client_error());
    }
}

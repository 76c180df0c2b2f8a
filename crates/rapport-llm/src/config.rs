//! LLM configuration loading and provider selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{LLMProvider, ResolvedProvider};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Stored LLM configuration (read from llm-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    /// Custom OpenAI-compatible endpoint (e.g. a local server).
    #[serde(default)]
    pub openai_base_url: Option<String>,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: "auto".into(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
            openai_base_url: None,
        }
    }
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Load config from file, filling unset keys from `lookup`.
    pub fn load_with<F>(config_path: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(c) => {
                    info!("Loaded LLM config from {}", config_path.display());
                    c
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed {}: {}", config_path.display(), e);
                    LLMConfig::default()
                }
            },
            Err(_) => {
                debug!("No LLM config at {}", config_path.display());
                LLMConfig::default()
            }
        };

        // Env vars as fallback for API keys
        if config.openai_api_key.is_none() {
            config.openai_api_key = lookup("OPENAI_API_KEY");
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = lookup("ANTHROPIC_API_KEY");
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = lookup("GROQ_API_KEY");
        }
        if config.openai_base_url.is_none() {
            config.openai_base_url = lookup("OPENAI_BASE_URL");
        }

        config.drop_blank_keys();
        config
    }

    fn drop_blank_keys(&mut self) {
        for key in [
            &mut self.openai_api_key,
            &mut self.anthropic_api_key,
            &mut self.groq_api_key,
            &mut self.openai_base_url,
        ] {
            if key.as_deref().map(|k| k.trim().is_empty()).unwrap_or(false) {
                *key = None;
            }
        }
    }

    /// Resolve which provider and model to use.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        let openai = || {
            self.openai_api_key.as_ref().map(|k| ResolvedProvider {
                provider: LLMProvider::OpenAI,
                model: self.openai_model.clone(),
                api_key: k.clone(),
                base_url: self.openai_base_url.clone(),
            })
        };
        let anthropic = || {
            self.anthropic_api_key.as_ref().map(|k| ResolvedProvider {
                provider: LLMProvider::Anthropic,
                model: self.anthropic_model.clone(),
                api_key: k.clone(),
                base_url: None,
            })
        };
        let groq = || {
            self.groq_api_key.as_ref().map(|k| ResolvedProvider {
                provider: LLMProvider::Groq,
                model: self.groq_model.clone(),
                api_key: k.clone(),
                base_url: None,
            })
        };

        // Explicit preference
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "openai" => openai(),
                "anthropic" => anthropic(),
                "groq" => groq(),
                _ => None,
            };
        }

        // Auto mode: Anthropic > Groq > OpenAI
        anthropic().or_else(groq).or_else(openai)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_uses_env() {
        let dir = tempfile::tempdir().unwrap();
        let config = LLMConfig::load_with(&dir.path().join("llm-config.json"), env(&[("GROQ_API_KEY", "gsk")]));
        let resolved = config.resolve_provider().unwrap();
        assert_eq!(resolved.provider, LLMProvider::Groq);
        assert_eq!(resolved.model, DEFAULT_GROQ_MODEL);
        assert_eq!(resolved.api_key, "gsk");
    }

    #[test]
    fn test_file_keys_win_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm-config.json");
        std::fs::write(
            &path,
            r#"{"preferred_provider":"openai","openai_api_key":"from-file","openai_model":"gpt-4o"}"#,
        )
        .unwrap();
        let config = LLMConfig::load_with(&path, env(&[("OPENAI_API_KEY", "from-env")]));
        let resolved = config.resolve_provider().unwrap();
        assert_eq!(resolved.provider, LLMProvider::OpenAI);
        assert_eq!(resolved.api_key, "from-file");
        assert_eq!(resolved.model, "gpt-4o");
    }

    #[test]
    fn test_auto_prefers_anthropic() {
        let config = LLMConfig {
            openai_api_key: Some("o".into()),
            anthropic_api_key: Some("a".into()),
            groq_api_key: Some("g".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_provider().unwrap().provider, LLMProvider::Anthropic);
    }

    #[test]
    fn test_explicit_preference_without_key() {
        let config = LLMConfig {
            preferred_provider: "groq".into(),
            openai_api_key: Some("o".into()),
            ..Default::default()
        };
        assert!(config.resolve_provider().is_none());
    }

    #[test]
    fn test_blank_keys_are_unset() {
        let dir = tempfile::tempdir().unwrap();
        let config = LLMConfig::load_with(&dir.path().join("none.json"), env(&[("OPENAI_API_KEY", "  ")]));
        assert!(config.resolve_provider().is_none());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm-config.json");
        std::fs::write(&path, "{not json").unwrap();
        let config = LLMConfig::load_with(&path, env(&[]));
        assert_eq!(config.preferred_provider, "auto");
        assert!(config.resolve_provider().is_none());
    }
}

//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 12_000;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LLM_MAX_RETRIES: u32 = 2;
pub const DEFAULT_LLM_CONCURRENCY: usize = 4;

/// Paths to Rapport's on-disk files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Model provider configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            llm_config_file: root.join("llm-config.json"),
            root,
        }
    }
}

/// Which extraction engine the server runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorMode {
    /// Model-backed when a provider key is configured, rules otherwise.
    Auto,
    /// Deterministic regex/keyword extractor only.
    Rules,
    /// External model only; startup fails without a provider.
    Model,
}

impl FromStr for ExtractorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "rules" | "regex" | "deterministic" => Ok(Self::Rules),
            "model" | "llm" => Ok(Self::Model),
            other => Err(Error::Config(format!("unknown extractor mode: {}", other))),
        }
    }
}

impl std::fmt::Display for ExtractorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Rules => write!(f, "rules"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// Limits applied to calls against the external model service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelLimits {
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Chunks in flight at once for a single request.
    pub concurrency: usize,
    /// Re-derive each fact's category from its source text.
    pub reclassify: bool,
}

impl Default for ModelLimits {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            max_retries: DEFAULT_LLM_MAX_RETRIES,
            concurrency: DEFAULT_LLM_CONCURRENCY,
            reclassify: true,
        }
    }
}

/// Top-level Rapport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RapportConfig {
    /// HTTP server port.
    pub port: u16,
    pub data_paths: DataPaths,
    pub extractor: ExtractorMode,
    /// Largest accepted upload for `/extract/file`.
    pub max_upload_bytes: usize,
    /// Extracted document text is truncated to this many characters.
    pub max_document_chars: usize,
    pub model: ModelLimits,
}

impl Default for RapportConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_paths: DataPaths::new("data"),
            extractor: ExtractorMode::Auto,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
            model: ModelLimits::default(),
        }
    }
}

impl RapportConfig {
    /// Create configuration from process environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("RAPPORT_DATA_DIR").unwrap_or_else(|| "data".into());
        let extractor = match lookup("RAPPORT_EXTRACTOR") {
            Some(v) => v.parse()?,
            None => defaults.extractor,
        };

        Ok(Self {
            port: parse_var(&lookup, "PORT", defaults.port)?,
            data_paths: DataPaths::new(data_dir),
            extractor,
            max_upload_bytes: parse_var(&lookup, "RAPPORT_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            max_document_chars: parse_var(
                &lookup,
                "RAPPORT_MAX_DOCUMENT_CHARS",
                defaults.max_document_chars,
            )?,
            model: ModelLimits {
                timeout_secs: parse_var(&lookup, "RAPPORT_LLM_TIMEOUT_SECS", defaults.model.timeout_secs)?,
                max_retries: parse_var(&lookup, "RAPPORT_LLM_MAX_RETRIES", defaults.model.max_retries)?,
                concurrency: parse_var(&lookup, "RAPPORT_LLM_CONCURRENCY", defaults.model.concurrency)?
                    .max(1),
                reclassify: parse_bool(&lookup, "RAPPORT_RECLASSIFY", defaults.model.reclassify)?,
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("invalid value for {}: {:?}", key, raw))),
        None => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_lowercase()) {
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(Error::Config(format!("invalid value for {}: {:?}", key, v))),
        },
        None => Ok(default),
    }
}

//! Rapport Core — error type and configuration shared by every crate.

pub mod config;
pub mod error;

pub use config::{DataPaths, ExtractorMode, ModelLimits, RapportConfig};
pub use error::{Error, Result};

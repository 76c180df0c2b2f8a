//! Extraction routes. Every outcome, success or failure, carries the four
//! category arrays so clients can always read them.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use rapport_core::Error;
use rapport_extract::{normalize_document_text, read_document, ClassificationResult};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/extract", post(extract_text))
        .route("/extract/file", post(extract_file))
}

/// Request-boundary error, rendered as the fixed envelope.
#[derive(Debug)]
pub enum ApiError {
    /// Caller sent something unusable (400).
    Validation(String),
    /// Extraction itself failed (500).
    Extraction(String),
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: &'static str,
    message: String,
    #[serde(flatten)]
    result: ClassificationResult,
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(message) | Error::UnsupportedFile(message) => ApiError::Validation(message),
            other => ApiError::Extraction(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Validation(m) => (StatusCode::BAD_REQUEST, "ValidationError", m),
            ApiError::Extraction(m) => (StatusCode::INTERNAL_SERVER_ERROR, "AI extraction failed", m),
        };
        let body = ErrorEnvelope {
            error,
            message,
            result: ClassificationResult::default(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult = Result<Json<ClassificationResult>, ApiError>;

/// POST /extract — body `{ "text": "..." }`.
async fn extract_text(
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body.map_err(|e| ApiError::Validation(format!("Invalid JSON body: {}", e.body_text())))?;

    let text = match body.get("text") {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.as_str(),
        Some(serde_json::Value::String(_)) | None => {
            return Err(ApiError::Validation("text is required".into()));
        }
        Some(_) => return Err(ApiError::Validation("text must be a string".into())),
    };

    classify(&state, text).await
}

/// POST /extract/file — multipart upload, field `file`.
async fn extract_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult {
    let mut multipart = multipart.map_err(|e| ApiError::Validation(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid upload: {}", e.body_text())))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("file name is required".into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid upload: {}", e.body_text())))?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload.ok_or_else(|| ApiError::Validation("file field is required".into()))?;
    if bytes.len() > state.config.max_upload_bytes {
        return Err(ApiError::Validation(format!(
            "{} exceeds the {} byte upload limit",
            filename, state.config.max_upload_bytes
        )));
    }
    if bytes.is_empty() {
        return Err(ApiError::Validation(format!("{} is empty", filename)));
    }

    info!("Received upload {} ({} bytes)", filename, bytes.len());

    let name = filename.clone();
    let raw = tokio::task::spawn_blocking(move || read_document(&name, &bytes))
        .await
        .map_err(|e| ApiError::Extraction(format!("Document reader failed: {}", e)))??;

    let text = normalize_document_text(&raw, state.config.max_document_chars);
    if text.is_empty() {
        return Err(ApiError::Validation(format!("no text could be extracted from {}", filename)));
    }

    classify(&state, &text).await
}

async fn classify(state: &AppState, text: &str) -> ApiResult {
    match state.engine.classify(text).await {
        Ok(result) => {
            info!("Extracted {} item(s) with {}", result.total(), state.engine.describe());
            Ok(Json(result))
        }
        Err(e) if e.is_client_error() => {
            warn!("Rejected extraction request: {}", e);
            Err(e.into())
        }
        Err(e) => {
            error!("Extraction failed: {}", e);
            Err(e.into())
        }
    }
}

//! Speech synthesis with server-side vendor fallback.

use crate::api::{json_body, ApiError};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::HeaderName,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use vaani_types::SpeechRequest;

const X_VOICE_PROVIDER: HeaderName = HeaderName::from_static("x-voice-provider");

/// Handler for `POST /api/speak`.
///
/// Returns `{ audioContent, mimeType }` from the first vendor that succeeds,
/// or `{ fallback: true }` when none did. Vendor failures are never errors.
pub async fn speak_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = json_body(body)?;
    let request = SpeechRequest::from_json(&body)?;

    let result = state.resolver.resolve(&request).await;
    let provider = result.provider();

    Ok((
        [(X_VOICE_PROVIDER, provider.as_str())],
        Json(result.to_json()),
    )
        .into_response())
}

//! Token-stream relay over server-sent events.

use crate::api::{json_body, ApiError};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE},
    http::HeaderName,
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use vaani_relay::spawn_relay;
use vaani_types::GenerationRequest;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Handler for `POST /api/relay`.
///
/// Validation and the credential check happen before any bytes are sent.
/// After that the response head goes out at once and events follow as the
/// relay task produces them: `token` events, then one `done` or `error`.
pub async fn relay_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = json_body(body)?;
    let request = GenerationRequest::from_json(&body)?;

    let generator = state.generator.clone().ok_or_else(|| {
        ApiError::Configuration("text generation API key is not configured".to_string())
    })?;

    let rx = spawn_relay(generator, request, state.relay_options);
    let events = ReceiverStream::new(rx)
        .map(|event| Event::default().event(event.kind()).json_data(&event));

    let headers = [
        (CONTENT_TYPE, "text/event-stream; charset=utf-8"),
        (CACHE_CONTROL, "no-cache, no-transform"),
        (CONNECTION, "keep-alive"),
        (X_ACCEL_BUFFERING, "no"),
    ];

    Ok((headers, Sse::new(events).keep_alive(KeepAlive::default())).into_response())
}

/// Handler for `GET /api/relay`.
pub async fn relay_liveness_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

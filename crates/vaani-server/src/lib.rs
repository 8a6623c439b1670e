//! Vaani server library logic.

pub mod api;
pub mod api_relay;
pub mod api_speak;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;
use vaani_relay::{RelayOptions, TextGenerator};
use vaani_voice::SpeechResolver;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream text generator. `None` when no API key is configured, in
    /// which case the relay answers 500 before opening a stream.
    pub generator: Option<Arc<dyn TextGenerator>>,
    /// Speech vendor chain.
    pub resolver: Arc<SpeechResolver>,
    /// Channel capacity and idle timeout for each relay.
    pub relay_options: RelayOptions,
}

/// Maximum request body size (2 MiB). Protects against OOM from oversized payloads.
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Renders a handler panic as `500 { error }`.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/relay",
            post(api_relay::relay_handler).get(api_relay::relay_liveness_handler),
        )
        .route("/api/speak", post(api_speak::speak_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
        .layer(Extension(Arc::new(state)))
}

//! Token-stream relay for the vaani server.
//!
//! Bridges an upstream incremental text generator into an ordered channel of
//! [`StreamEvent`]s. A background task owns the upstream token stream and is
//! the only writer on the channel:
//!
//! ```text
//! TextGenerator::stream ──► relay task ──► mpsc::Receiver<StreamEvent> ──► SSE body
//!                              │
//!                              └── Token* then exactly one Done | Error, then close
//! ```
//!
//! The upstream engine is abstracted behind [`TextGenerator`]; the production
//! implementation is [`GeminiGenerator`], which consumes Gemini's
//! `streamGenerateContent` server-sent event stream.
//!
//! [`StreamEvent`]: vaani_types::StreamEvent

pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod relay;
pub mod sse;

pub use config::GenerationConfig;
pub use error::RelayError;
pub use gemini::GeminiGenerator;
pub use generator::{TextGenerator, TokenStream};
pub use relay::{run_relay, spawn_relay, EventSender, RelayOptions};
pub use sse::SseDecoder;

use crate::error::RelayError;
use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;
use vaani_types::GenerationRequest;

/// Incremental text deltas from an upstream generation call, in arrival order.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send>>;

/// An upstream engine that produces text incrementally.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Starts a generation call and returns its delta stream.
    ///
    /// Failures before the first delta are returned here; failures after it
    /// are yielded as `Err` items on the stream.
    async fn stream(&self, request: &GenerationRequest) -> Result<TokenStream, RelayError>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

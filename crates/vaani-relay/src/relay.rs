//! The relay task: upstream token stream in, ordered events out.

use crate::error::RelayError;
use crate::generator::TextGenerator;
use futures_util::{FutureExt, StreamExt};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Instrument;
use vaani_types::{GenerationRequest, StreamEvent};

/// Default number of events buffered between the relay task and the client.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Default longest wait for the next upstream chunk.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Tuning for one relay execution.
#[derive(Debug, Clone, Copy)]
pub struct RelayOptions {
    pub channel_capacity: usize,
    pub idle_timeout: Duration,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

/// The receiving side went away.
#[derive(Debug)]
struct Disconnected;

enum PumpError {
    Upstream(RelayError),
    Disconnected,
}

impl From<RelayError> for PumpError {
    fn from(e: RelayError) -> Self {
        PumpError::Upstream(e)
    }
}

impl From<Disconnected> for PumpError {
    fn from(_: Disconnected) -> Self {
        PumpError::Disconnected
    }
}

/// Sole writer of a relay channel.
///
/// Not `Clone`. [`EventSender::finish`] consumes the sender, so nothing can
/// be sent after the terminal event, and dropping it closes the channel.
#[derive(Debug)]
pub struct EventSender {
    tx: mpsc::Sender<StreamEvent>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<StreamEvent>) -> Self {
        Self { tx }
    }

    async fn token(&self, text: String) -> Result<(), Disconnected> {
        self.tx
            .send(StreamEvent::Token { text })
            .await
            .map_err(|_| Disconnected)
    }

    /// Resolves when the receiver has been dropped.
    async fn closed(&self) {
        self.tx.closed().await
    }

    /// Sends the terminal event and closes the channel.
    async fn finish(self, terminal: StreamEvent) {
        debug_assert!(terminal.is_terminal());
        if self.tx.send(terminal).await.is_err() {
            tracing::debug!("client went away before the terminal event");
        }
    }
}

/// Spawns a relay task and returns the receiving end of its event channel.
///
/// Must be called from within a tokio runtime. The receiver yields
/// zero or more `Token` events, exactly one `Done` or `Error`, then `None`.
pub fn spawn_relay(
    generator: Arc<dyn TextGenerator>,
    request: GenerationRequest,
    options: RelayOptions,
) -> mpsc::Receiver<StreamEvent> {
    let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("relay", %request_id, generator = generator.name());

    tokio::spawn(run_relay(generator, request, options, EventSender::new(tx)).instrument(span));
    rx
}

/// Runs one relay execution to completion on the current task.
///
/// This is the single cleanup path: whatever happens upstream (success,
/// error, stall, panic) exactly one terminal event is sent and the sender is
/// dropped. If the client disconnects, the upstream stream is dropped
/// (aborting its HTTP request) and no terminal event is attempted.
pub async fn run_relay(
    generator: Arc<dyn TextGenerator>,
    request: GenerationRequest,
    options: RelayOptions,
    sender: EventSender,
) {
    let mut answer = String::new();
    let mut deltas = 0usize;

    let outcome = AssertUnwindSafe(pump(
        generator.as_ref(),
        &request,
        options.idle_timeout,
        &sender,
        &mut answer,
        &mut deltas,
    ))
    .catch_unwind()
    .await;

    let terminal = match outcome {
        Ok(Ok(())) => {
            tracing::info!(deltas, bytes = answer.len(), "generation complete");
            StreamEvent::Done { text: answer }
        }
        Ok(Err(PumpError::Upstream(e))) => {
            tracing::warn!(deltas, error = %e, "generation failed");
            StreamEvent::Error {
                message: e.to_string(),
            }
        }
        Ok(Err(PumpError::Disconnected)) => {
            tracing::info!(deltas, "client disconnected, upstream stream dropped");
            return;
        }
        Err(panic) => {
            tracing::error!(
                deltas,
                panic = panic_message(panic.as_ref()),
                "relay task panicked"
            );
            StreamEvent::Error {
                message: "internal error while generating".to_string(),
            }
        }
    };

    sender.finish(terminal).await;
}

async fn pump(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    idle_timeout: Duration,
    sender: &EventSender,
    answer: &mut String,
    deltas: &mut usize,
) -> Result<(), PumpError> {
    let stalled = || RelayError::Stalled(idle_timeout.as_secs());

    let mut tokens = tokio::select! {
        _ = sender.closed() => return Err(PumpError::Disconnected),
        opened = tokio::time::timeout(idle_timeout, generator.stream(request)) => {
            opened.map_err(|_| stalled())??
        }
    };

    loop {
        let next = tokio::select! {
            _ = sender.closed() => return Err(PumpError::Disconnected),
            next = tokio::time::timeout(idle_timeout, tokens.next()) => next.map_err(|_| stalled())?,
        };

        match next {
            None => return Ok(()),
            Some(Err(e)) => return Err(e.into()),
            Some(Ok(delta)) if delta.is_empty() => continue,
            Some(Ok(delta)) => {
                answer.push_str(&delta);
                *deltas += 1;
                sender.token(delta).await?;
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

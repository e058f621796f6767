//! Broadcast-based event dispatch for fronts.
//!
//! [`EventEmitter::emit`] never awaits: events go into a `tokio::sync::broadcast`
//! channel. Consumers either hold a raw receiver ([`EventEmitter::subscribe`]) or
//! register a callback ([`EventEmitter::on_event`]), which spawns a task draining a
//! receiver and returns a [`Subscription`]. Dropping the subscription cancels the task.

use tokio::sync::{broadcast, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 64;

/// Broadcast-based emitter for events of type `E`.
///
/// Slow callbacks lag (and skip events) rather than blocking the sender.
pub struct EventEmitter<E: Clone + Send + 'static> {
    tx: broadcast::Sender<E>,
    closed: CancellationToken,
}

impl<E: Clone + Send + 'static> EventEmitter<E> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            closed: CancellationToken::new(),
        }
    }

    /// Send `event` to all receivers. Non-blocking.
    ///
    /// Returns the number of receivers the event reached, 0 without subscribers or
    /// after [`close`](Self::close).
    pub fn emit(&self, event: E) -> usize {
        if self.closed.is_cancelled() {
            return 0;
        }
        self.tx.send(event).unwrap_or(0)
    }

    /// Receiver for every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.tx.subscribe()
    }

    /// Run `handler` for every event emitted after this call, on a spawned task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_event<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut rx = self.tx.subscribe();
        let closed = self.closed.clone();
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut cancel_rx => break,
                    _ = closed.cancelled() => break,
                    result = rx.recv() => match result {
                        Ok(event) => handler(&event),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(dropped = n, "Event callback lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });

        Subscription::new(cancel_tx)
    }

    /// Number of live receivers, callback tasks included.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Stop every callback task and drop later events. Permanent.
    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

impl<E: Clone + Send + 'static> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle that cancels an event callback when dropped.
///
/// Returned by [`EventEmitter::on_event`] and the `on_*` methods of fronts.
#[must_use = "dropping a Subscription cancels its handler"]
pub struct Subscription {
    cancel_tx: Option<oneshot::Sender<()>>,
}

impl Subscription {
    fn new(cancel_tx: oneshot::Sender<()>) -> Self {
        Self {
            cancel_tx: Some(cancel_tx),
        }
    }

    /// Explicitly cancels the subscription, equivalent to dropping it.
    pub fn unsubscribe(mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel_tx.is_some())
            .finish()
    }
}

//! # Fronts and Auto-Refresh
//!
//! A [`ResourceFront`] is the client-side mirror of one server actor. It is built from
//! the actor's [`ActorForm`] (no round trip), forwards requests through a
//! [`ProtocolClient`], and remembers the last snapshot it saw.
//!
//! ## Auto-refresh
//!
//! [`start_auto_refresh`](ResourceFront::start_auto_refresh) spawns a single polling
//! task. On every tick it requests a fresh snapshot, compares it with the last one
//! ([`has_changed`]) and emits a `state-changed` event only if something observable
//! differs. Resources like animations change continuously, but subscribers hear about
//! it at most once per tick and only when a field actually moved.
//!
//! Ordering rules:
//!
//! - One polling task per front; starting twice is a no-op.
//! - The next poll is only issued after the previous reply was handled, so polls never
//!   overlap.
//! - Stopping takes effect immediately for scheduling. A poll already in flight is
//!   allowed to finish, and its reply is dropped without touching the front.
//! - A failed poll is logged and skipped; the timer keeps running.
//! - A zero interval is rejected. A polling task that died counts as stopped.
//!
//! Events are sent on a broadcast channel while the front's lock is held, so nothing
//! is emitted once `stop_auto_refresh` has returned. Handlers run on their own tasks
//! (see [`EventEmitter::on_event`]); a panicking handler cannot take polling down.

use crate::framework::client::ProtocolClient;
use crate::framework::error::ProtocolError;
use crate::framework::events::{EventEmitter, Subscription};
use crate::framework::resource::{ActorForm, ActorId};
use crate::framework::snapshot::{has_changed, StateSnapshot};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Poll interval used when the caller has no preference.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(500);

/// What one auto-refresh poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// New snapshot stored and `state-changed` emitted.
    Changed,
    Unchanged,
    /// Auto-refresh was stopped while the request was in flight.
    Discarded,
    /// The request failed; nothing changed.
    Failed,
}

struct RefreshHandle {
    token: CancellationToken,
    // Detached on stop: the task notices the cancelled token on its own.
    task: JoinHandle<()>,
}

impl RefreshHandle {
    fn is_live(&self) -> bool {
        !self.task.is_finished()
    }
}

struct FrontState {
    last: StateSnapshot,
    refresh: Option<RefreshHandle>,
    destroyed: bool,
}

struct Shared {
    actor: ActorId,
    client: ProtocolClient,
    initial: StateSnapshot,
    state: Mutex<FrontState>,
    events: EventEmitter<StateSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, FrontState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn refresh_state(&self, token: &CancellationToken) -> PollOutcome {
        let next = match self.client.get_state(self.actor.clone()).await {
            Ok(next) => next,
            Err(e) if token.is_cancelled() => {
                trace!(actor = %self.actor, error = %e, "Dropped failed poll after stop");
                return PollOutcome::Discarded;
            }
            Err(e) => {
                warn!(actor = %self.actor, error = %e, "Auto-refresh poll failed");
                return PollOutcome::Failed;
            }
        };

        {
            let mut state = self.lock();
            // Checked under the same lock `stop_auto_refresh` cancels under.
            if token.is_cancelled() {
                trace!(actor = %self.actor, "Dropped stale poll after stop");
                return PollOutcome::Discarded;
            }
            if !has_changed(&state.last, &next) {
                return PollOutcome::Unchanged;
            }
            state.last = next.clone();
            let delivered = self.events.emit(next);
            debug!(actor = %self.actor, delivered, "State changed");
        }
        PollOutcome::Changed
    }
}

async fn refresh_loop(shared: Arc<Shared>, interval: Duration, token: CancellationToken) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let outcome = shared.refresh_state(&token).await;
        trace!(actor = %shared.actor, ?outcome, "Poll");
    }
    debug!(actor = %shared.actor, "Auto-refresh task finished");
}

/// Client-side proxy for one server actor.
///
/// Dropping a front stops its auto-refresh.
pub struct ResourceFront {
    shared: Arc<Shared>,
}

impl ResourceFront {
    /// Bind to the actor described by `form`, taking its state as the initial state.
    pub fn from_form(client: ProtocolClient, form: ActorForm) -> Self {
        let ActorForm { actor, state } = form;
        Self {
            shared: Arc::new(Shared {
                actor,
                client,
                initial: state.clone(),
                state: Mutex::new(FrontState {
                    last: state,
                    refresh: None,
                    destroyed: false,
                }),
                events: EventEmitter::new(),
            }),
        }
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.shared.actor
    }

    /// State reported in the actor's form.
    pub fn initial_state(&self) -> &StateSnapshot {
        &self.shared.initial
    }

    /// Latest snapshot applied by auto-refresh (initially the form's state).
    pub fn last_snapshot(&self) -> StateSnapshot {
        self.shared.lock().last.clone()
    }

    /// Whether a polling task is scheduled and still alive.
    pub fn is_auto_refreshing(&self) -> bool {
        self.shared.lock().refresh.as_ref().is_some_and(RefreshHandle::is_live)
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.lock().destroyed
    }

    fn ensure_live(&self) -> Result<(), ProtocolError> {
        if self.is_destroyed() {
            return Err(ProtocolError::ResourceGone(self.shared.actor.clone()));
        }
        Ok(())
    }

    /// Fetch a fresh snapshot. Does not update [`last_snapshot`](Self::last_snapshot).
    pub async fn current_state(&self) -> Result<StateSnapshot, ProtocolError> {
        self.ensure_live()?;
        self.shared.client.get_state(self.shared.actor.clone()).await
    }

    pub async fn pause(&self) -> Result<(), ProtocolError> {
        self.ensure_live()?;
        self.shared.client.pause(self.shared.actor.clone()).await
    }

    /// Resolves once the remote resource reports readiness.
    pub async fn play(&self) -> Result<(), ProtocolError> {
        self.ensure_live()?;
        self.shared.client.play(self.shared.actor.clone()).await
    }

    /// Register a `state-changed` handler. It runs on its own task for every change
    /// applied after this call.
    pub fn on_state_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&StateSnapshot) + Send + Sync + 'static,
    {
        self.shared.events.on_event(handler)
    }

    /// Raw receiver of `state-changed` snapshots.
    pub fn state_changes(&self) -> broadcast::Receiver<StateSnapshot> {
        self.shared.events.subscribe()
    }

    /// Start polling every `interval`.
    ///
    /// No-op if already running or destroyed. A zero interval is rejected with a
    /// warning. A previous task that died is replaced.
    pub fn start_auto_refresh(&self, interval: Duration) {
        if interval.is_zero() {
            warn!(actor = %self.shared.actor, "Auto-refresh interval must be non-zero");
            return;
        }

        let mut state = self.shared.lock();
        if state.refresh.as_ref().is_some_and(RefreshHandle::is_live) {
            return;
        }
        if state.destroyed {
            warn!(actor = %self.shared.actor, "Auto-refresh requested on destroyed front");
            return;
        }
        if let Some(dead) = state.refresh.take() {
            warn!(actor = %self.shared.actor, "Replacing finished auto-refresh task");
            dead.token.cancel();
        }

        let token = CancellationToken::new();
        let task = tokio::spawn(refresh_loop(self.shared.clone(), interval, token.clone()));
        state.refresh = Some(RefreshHandle { token, task });
        debug!(actor = %self.shared.actor, ?interval, "Auto-refresh started");
    }

    /// Stop polling. No-op if not running.
    pub fn stop_auto_refresh(&self) {
        let mut state = self.shared.lock();
        if let Some(refresh) = state.refresh.take() {
            refresh.token.cancel();
            debug!(actor = %self.shared.actor, "Auto-refresh stopped");
        }
    }

    /// Stop auto-refresh and drop every subscriber. The remote actor is left alone;
    /// see [`release`](Self::release).
    pub fn destroy(&self) {
        self.stop_auto_refresh();
        let was_live = {
            let mut state = self.shared.lock();
            !std::mem::replace(&mut state.destroyed, true)
        };
        if was_live {
            self.shared.events.close();
            debug!(actor = %self.shared.actor, "Front destroyed");
        }
    }

    /// End the remote actor's lifetime, then destroy this front.
    pub async fn release(&self) -> Result<(), ProtocolError> {
        self.ensure_live()?;
        let result = self.shared.client.release(self.shared.actor.clone()).await;
        self.destroy();
        result
    }
}

impl Drop for ResourceFront {
    fn drop(&mut self) {
        self.stop_auto_refresh();
    }
}

use crate::animation::{AnimationError, AnimationState};
use crate::clients::actor_client::ActorClient;
use crate::framework::{ActorForm, ActorId, ProtocolClient, ProtocolError, ResourceFront, Subscription};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{instrument, warn};

/// Client-side mirror of one animation player actor.
///
/// Wraps a [`ResourceFront`] and exposes snapshots as [`AnimationState`]. Pause, play
/// and release come from [`ActorClient`].
pub struct AnimationPlayerFront {
    inner: ResourceFront,
    initial: AnimationState,
    refresh_interval: Duration,
}

#[async_trait]
impl ActorClient for AnimationPlayerFront {
    type Error = AnimationError;

    fn front(&self) -> &ResourceFront {
        &self.inner
    }

    fn map_error(e: ProtocolError) -> Self::Error {
        AnimationError::from(e)
    }
}

impl AnimationPlayerFront {
    /// Bind to the player described by `form`. Fails if the form's state is not an
    /// animation player state.
    pub fn from_form(
        client: ProtocolClient,
        form: ActorForm,
        refresh_interval: Duration,
    ) -> Result<Self, AnimationError> {
        let initial = AnimationState::try_from(&form.state)?;
        Ok(Self {
            inner: ResourceFront::from_form(client, form),
            initial,
            refresh_interval,
        })
    }

    pub fn actor_id(&self) -> &ActorId {
        self.inner.actor_id()
    }

    /// State the player reported when it was listed.
    pub fn initial_state(&self) -> &AnimationState {
        &self.initial
    }

    /// Last state seen by auto-refresh.
    pub fn state(&self) -> Result<AnimationState, AnimationError> {
        AnimationState::try_from(&self.inner.last_snapshot())
    }

    /// Ask the player for its state now.
    #[instrument(skip(self), fields(actor = %self.actor_id()))]
    pub async fn current_state(&self) -> Result<AnimationState, AnimationError> {
        let snapshot = self.inner.current_state().await.map_err(Self::map_error)?;
        AnimationState::try_from(&snapshot)
    }

    /// Register an `updated-state` handler.
    ///
    /// Snapshots that don't parse as an animation state are logged and not delivered.
    pub fn on_updated_state<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&AnimationState) + Send + Sync + 'static,
    {
        let actor = self.actor_id().clone();
        self.inner
            .on_state_changed(move |snapshot| match AnimationState::try_from(snapshot) {
                Ok(state) => handler(&state),
                Err(e) => warn!(actor = %actor, error = %e, "Skipped malformed update"),
            })
    }

    /// Poll at the interval this front was created with.
    pub fn start_auto_refresh(&self) {
        self.inner.start_auto_refresh(self.refresh_interval);
    }

    pub fn start_auto_refresh_every(&self, interval: Duration) {
        self.inner.start_auto_refresh(interval);
    }

    pub fn stop_auto_refresh(&self) {
        self.inner.stop_auto_refresh();
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.inner.is_auto_refreshing()
    }

    /// Stop auto-refresh and drop all handlers. The remote player is not released.
    pub fn destroy(&self) {
        self.inner.destroy();
    }
}

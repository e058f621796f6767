//! Adapters from the animation host to the generic protocol.
//!
//! A host implements [`AnimationHost`] (list a node's players) and [`AnimationPlayer`]
//! (read and control one player). [`AnimationsCollection`] and
//! [`AnimationPlayerResource`] turn those into a [`ResourceHost`] and
//! [`LiveResource`], so the generic connection can serve them.

use crate::animation::state::{AnimationState, PlayState};
use crate::animation::timing::ComputedTiming;
use crate::framework::{HostError, LiveResource, ParentRef, ReadyFuture, ResourceHost, StateSnapshot};
use async_trait::async_trait;

/// One live animation player owned by the host.
pub trait AnimationPlayer: Send + 'static {
    fn start_time(&self) -> Option<f64>;
    fn current_time(&self) -> Option<f64>;
    fn play_state(&self) -> PlayState;
    /// Name of the animation effect (the CSS `@keyframes` name).
    fn name(&self) -> String;
    fn is_running_on_compositor(&self) -> bool;
    fn pause(&mut self);
    /// Resume; the future resolves once the player is ready.
    fn play(&mut self) -> ReadyFuture;
}

/// Lists animation players for DOM nodes.
#[async_trait]
pub trait AnimationHost: Send + Sync + 'static {
    type Player: AnimationPlayer;

    /// Players currently attached to `node`, in host order, with the node's computed
    /// timing.
    async fn animation_players(
        &self,
        node: &ParentRef,
    ) -> Result<(Vec<Self::Player>, ComputedTiming), HostError>;
}

/// A player plus what is needed to report its duration and iteration count.
pub struct AnimationPlayerResource<P: AnimationPlayer> {
    player: P,
    timing: ComputedTiming,
    index: usize,
}

impl<P: AnimationPlayer> AnimationPlayerResource<P> {
    /// `index` is the player's position on its node, used to pick the right entry of
    /// comma-separated computed style lists.
    pub fn new(player: P, timing: ComputedTiming, index: usize) -> Self {
        Self {
            player,
            timing,
            index,
        }
    }

    pub fn animation_state(&self) -> AnimationState {
        AnimationState {
            start_time: self.player.start_time(),
            current_time: self.player.current_time(),
            play_state: self.player.play_state(),
            name: self.player.name(),
            duration: self.timing.duration_ms(self.index),
            iteration_count: self.timing.iteration_count(self.index),
            is_running_on_compositor: self.player.is_running_on_compositor(),
        }
    }
}

impl<P: AnimationPlayer> LiveResource for AnimationPlayerResource<P> {
    const TYPE_NAME: &'static str = "animationplayer";

    fn state(&self) -> StateSnapshot {
        StateSnapshot::from(&self.animation_state())
    }

    fn pause(&mut self) {
        self.player.pause();
    }

    fn play(&mut self) -> ReadyFuture {
        self.player.play()
    }
}

/// [`ResourceHost`] over an [`AnimationHost`]: one resource per player on the node.
pub struct AnimationsCollection<H: AnimationHost> {
    host: H,
}

impl<H: AnimationHost> AnimationsCollection<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }
}

#[async_trait]
impl<H: AnimationHost> ResourceHost for AnimationsCollection<H> {
    type Resource = AnimationPlayerResource<H::Player>;
    const COLLECTION_NAME: &'static str = "animations";

    async fn enumerate(&self, parent: &ParentRef) -> Result<Vec<Self::Resource>, HostError> {
        let (players, timing) = self.host.animation_players(parent).await?;
        Ok(players
            .into_iter()
            .enumerate()
            .map(|(index, player)| AnimationPlayerResource::new(player, timing.clone(), index))
            .collect())
    }
}

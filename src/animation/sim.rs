//! In-memory animation host driven by the tokio clock.
//!
//! Used by the demo binary and by tests. Under a paused test clock the simulated
//! times advance only with `tokio::time::advance`, so snapshots are deterministic.

use crate::animation::player::{AnimationHost, AnimationPlayer};
use crate::animation::state::PlayState;
use crate::animation::timing::ComputedTiming;
use crate::framework::{HostError, ParentRef, ReadyFuture};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// How long a simulated `play()` stays pending before the player is ready.
pub const DEFAULT_READY_DELAY: Duration = Duration::from_millis(16);

fn millis(d: Duration) -> f64 {
    d.as_micros() as f64 / 1000.0
}

#[derive(Debug)]
struct PlayerState {
    name: String,
    play_state: PlayState,
    /// Timeline origin while running.
    origin: Option<Instant>,
    /// Frozen current time while not running.
    held: Duration,
    epoch: Instant,
    ready_delay: Duration,
    compositor: bool,
}

impl PlayerState {
    fn elapsed(&self) -> Duration {
        match self.origin {
            Some(origin) => Instant::now().saturating_duration_since(origin),
            None => self.held,
        }
    }
}

/// A player whose state lives behind a shared handle, so the host and the test
/// that created it see the same player.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    state: Arc<Mutex<PlayerState>>,
}

impl SimulatedPlayer {
    fn lock(&self) -> MutexGuard<'_, PlayerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move the player to `finished`, holding its current time.
    pub fn finish(&self) {
        let mut state = self.lock();
        state.held = state.elapsed();
        state.origin = None;
        state.play_state = PlayState::Finished;
        state.compositor = false;
    }

    pub fn set_running_on_compositor(&self, on: bool) {
        self.lock().compositor = on;
    }
}

impl AnimationPlayer for SimulatedPlayer {
    fn start_time(&self) -> Option<f64> {
        let state = self.lock();
        state
            .origin
            .map(|origin| millis(origin.saturating_duration_since(state.epoch)))
    }

    fn current_time(&self) -> Option<f64> {
        Some(millis(self.lock().elapsed()))
    }

    fn play_state(&self) -> PlayState {
        self.lock().play_state
    }

    fn name(&self) -> String {
        self.lock().name.clone()
    }

    fn is_running_on_compositor(&self) -> bool {
        let state = self.lock();
        state.compositor && state.play_state == PlayState::Running
    }

    fn pause(&mut self) {
        let mut state = self.lock();
        state.held = state.elapsed();
        state.origin = None;
        state.play_state = PlayState::Paused;
    }

    fn play(&mut self) -> ReadyFuture {
        let delay = {
            let mut state = self.lock();
            if state.play_state == PlayState::Running {
                return Box::pin(async { Ok(()) });
            }
            state.held = state.elapsed();
            state.origin = None;
            state.play_state = PlayState::Pending;
            state.ready_delay
        };

        let player = self.clone();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            let mut state = player.lock();
            // A pause while pending wins.
            if state.play_state != PlayState::Pending {
                return Err(HostError::new("play aborted before the player was ready"));
            }
            let now = Instant::now();
            state.origin = Some(now.checked_sub(state.held).unwrap_or(now));
            state.play_state = PlayState::Running;
            Ok(())
        })
    }
}

#[derive(Debug, Default)]
struct NodeAnimations {
    players: Vec<SimulatedPlayer>,
    timing: ComputedTiming,
}

/// Host with a fixed set of nodes, each carrying animation players.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    nodes: Arc<Mutex<HashMap<ParentRef, NodeAnimations>>>,
    epoch: Instant,
    ready_delay: Duration,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(Mutex::new(HashMap::new())),
            epoch: Instant::now(),
            ready_delay: DEFAULT_READY_DELAY,
        }
    }

    pub fn with_ready_delay(mut self, delay: Duration) -> Self {
        self.ready_delay = delay;
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ParentRef, NodeAnimations>> {
        self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `node` with its computed timing. Replaces the timing if the node exists.
    pub fn add_node(&self, node: impl Into<ParentRef>, timing: ComputedTiming) {
        self.lock().entry(node.into()).or_default().timing = timing;
    }

    /// Start a running animation called `name` on `node`, creating the node if needed.
    pub fn add_animation(&self, node: impl Into<ParentRef>, name: &str) -> SimulatedPlayer {
        let player = SimulatedPlayer {
            state: Arc::new(Mutex::new(PlayerState {
                name: name.to_string(),
                play_state: PlayState::Running,
                origin: Some(Instant::now()),
                held: Duration::ZERO,
                epoch: self.epoch,
                ready_delay: self.ready_delay,
                compositor: false,
            })),
        };
        self.lock()
            .entry(node.into())
            .or_default()
            .players
            .push(player.clone());
        player
    }
}

#[async_trait]
impl AnimationHost for SimulatedHost {
    type Player = SimulatedPlayer;

    async fn animation_players(
        &self,
        node: &ParentRef,
    ) -> Result<(Vec<SimulatedPlayer>, ComputedTiming), HostError> {
        let nodes = self.lock();
        let animations = nodes
            .get(node)
            .ok_or_else(|| HostError::new(format!("unknown node {node}")))?;
        debug!(node = %node, size = animations.players.len(), "Listed animations");
        Ok((animations.players.clone(), animations.timing.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_running_player_advances_with_clock() {
        let host = SimulatedHost::new();
        let player = host.add_animation("#box", "spin");

        tokio::time::advance(Duration::from_millis(250)).await;

        assert_eq!(player.play_state(), PlayState::Running);
        assert_eq!(player.current_time(), Some(250.0));
        assert_eq!(player.start_time(), Some(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_time() {
        let host = SimulatedHost::new();
        let mut player = host.add_animation("#box", "spin");
        player.set_running_on_compositor(true);
        assert!(player.is_running_on_compositor());

        tokio::time::advance(Duration::from_millis(100)).await;
        player.pause();
        tokio::time::advance(Duration::from_millis(100)).await;

        assert_eq!(player.play_state(), PlayState::Paused);
        assert_eq!(player.current_time(), Some(100.0));
        assert_eq!(player.start_time(), None);
        assert!(!player.is_running_on_compositor());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_is_pending_until_ready() {
        let host = SimulatedHost::new().with_ready_delay(Duration::from_millis(50));
        let mut player = host.add_animation("#box", "spin");
        tokio::time::advance(Duration::from_millis(40)).await;
        player.pause();

        let ready = player.play();
        assert_eq!(player.play_state(), PlayState::Pending);

        ready.await.unwrap();
        assert_eq!(player.play_state(), PlayState::Running);
        assert_eq!(player.current_time(), Some(40.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_while_pending_aborts_play() {
        let host = SimulatedHost::new();
        let mut player = host.add_animation("#box", "spin");
        player.pause();

        let ready = player.play();
        player.pause();

        assert!(ready.await.is_err());
        assert_eq!(player.play_state(), PlayState::Paused);
    }

    #[tokio::test]
    async fn test_unknown_node_is_a_host_error() {
        let host = SimulatedHost::new();
        host.add_node("#empty", ComputedTiming::default());

        let (players, _) = host.animation_players(&ParentRef::from("#empty")).await.unwrap();
        assert!(players.is_empty());
        assert!(host.animation_players(&ParentRef::from("#nope")).await.is_err());
    }
}

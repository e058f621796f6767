//! # Animation Players
//!
//! The watched resource shipped with this crate: Web Animations players on DOM nodes.
//!
//! - [`AnimationState`] - Typed view of a player snapshot
//! - [`ComputedTiming`] - Duration and iteration count from computed styles
//! - [`AnimationHost`] / [`AnimationPlayer`] - What a host must provide
//! - [`AnimationsCollection`] / [`AnimationPlayerResource`] - Adapters to the protocol
//! - [`sim`] - An in-memory host for the demo and tests

pub mod error;
pub mod player;
pub mod sim;
pub mod state;
pub mod timing;

pub use error::AnimationError;
pub use player::{AnimationHost, AnimationPlayer, AnimationPlayerResource, AnimationsCollection};
pub use sim::{SimulatedHost, SimulatedPlayer};
pub use state::{AnimationState, IterationCount, PlayState};
pub use timing::ComputedTiming;

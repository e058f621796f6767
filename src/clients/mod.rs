//! Typed wrappers around [`ProtocolClient`](crate::framework::ProtocolClient) and
//! [`ResourceFront`](crate::framework::ResourceFront).

pub mod actor_client;
pub mod animations_client;
pub mod player_front;

pub use actor_client::*;
pub use animations_client::*;
pub use player_front::*;

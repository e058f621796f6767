//! Generic remote-state watching protocol.
//!
//! This module provides the building blocks shared by every watched resource type:
//! the server-side actors, the connection loop that carries requests to them, and the
//! client-side fronts that mirror them.
//!
//! # Main Components
//!
//! - [`LiveResource`] / [`ResourceHost`] - Capabilities a host implements
//! - [`ResourceActor`] / [`CollectionActor`] - Server-side actors
//! - [`Connection`] / [`ProtocolClient`] - The request/response channel
//! - [`ResourceFront`] - Client proxy with auto-refresh
//! - [`StateSnapshot`] / [`has_changed`] - The state model and change detection
//! - [`ProtocolError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test fronts and clients without a host.

pub mod actor;
pub mod client;
pub mod connection;
pub mod entity;
pub mod error;
pub mod events;
pub mod front;
pub mod message;
pub mod mock;
pub mod resource;
pub mod snapshot;

// Re-export core types for convenience
pub use actor::{CollectionActor, ResourceActor};
pub use client::ProtocolClient;
pub use connection::Connection;
pub use entity::{LiveResource, ReadyFuture, ResourceHost};
pub use error::{HostError, ProtocolError, TransportError};
pub use events::{EventEmitter, Subscription};
pub use front::{PollOutcome, ResourceFront, DEFAULT_REFRESH_INTERVAL};
pub use message::{ProtocolRequest, Response};
pub use resource::{ActorForm, ActorId, IdMinter, ParentRef, ResourceHandle};
pub use snapshot::{has_changed, FieldValue, StateSnapshot};

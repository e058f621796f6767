//! # Protocol Errors
//!
//! This module defines the error types shared by actors, the connection loop and
//! fronts. Actor-side failures travel back to the requesting front unchanged.

use crate::framework::resource::ActorId;

/// Failures of the request/response channel itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Connection dropped response channel")]
    ResponseDropped,
}

/// Failure reported by the host that owns the live resources.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Host error: {0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors surfaced to protocol callers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    /// The actor was destroyed (released, or its connection ended) or never existed.
    #[error("Resource gone: {0}")]
    ResourceGone(ActorId),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl ProtocolError {
    pub fn is_resource_gone(&self) -> bool {
        matches!(self, ProtocolError::ResourceGone(_))
    }
}

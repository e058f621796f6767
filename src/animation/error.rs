//! Error types for the animation inspector.

use crate::framework::ProtocolError;
use thiserror::Error;

/// Errors that can occur during animation player operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnimationError {
    /// The player actor was released or its connection ended.
    #[error("Animation player gone: {0}")]
    PlayerGone(String),

    /// The collection actor was disconnected or its connection ended.
    #[error("Animations collection gone: {0}")]
    CollectionGone(String),

    /// A snapshot did not have the shape of an animation player state.
    #[error("Malformed animation state: {0}")]
    MalformedState(String),

    /// The host refused or failed the request.
    #[error("Host error: {0}")]
    HostError(String),

    /// An error occurred while communicating with the connection.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for AnimationError {
    fn from(msg: String) -> Self {
        AnimationError::ActorCommunicationError(msg)
    }
}

impl AnimationError {
    /// Like `From<ProtocolError>`, but for requests addressed to the collection actor.
    pub fn from_collection(e: ProtocolError) -> Self {
        match e {
            ProtocolError::ResourceGone(id) => AnimationError::CollectionGone(id.to_string()),
            other => other.into(),
        }
    }
}

impl From<ProtocolError> for AnimationError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::ResourceGone(id) => AnimationError::PlayerGone(id.to_string()),
            ProtocolError::Host(host) => AnimationError::HostError(host.0),
            ProtocolError::Transport(t) => AnimationError::ActorCommunicationError(t.to_string()),
        }
    }
}

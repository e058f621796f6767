//! # Protocol Client
//!
//! This module defines the client half of the RPC channel.

use crate::framework::error::{ProtocolError, TransportError};
use crate::framework::message::ProtocolRequest;
use crate::framework::resource::{ActorForm, ActorId, ParentRef};
use crate::framework::snapshot::StateSnapshot;
use tokio::sync::{mpsc, oneshot};

/// ## ProtocolClient
///
/// Sends [`ProtocolRequest`]s to a [`Connection`](crate::framework::Connection) over a
/// Tokio mpsc channel and awaits the reply on a oneshot channel.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Shutdown** – once every clone is dropped the connection loop ends.
#[derive(Clone)]
pub struct ProtocolClient {
    sender: mpsc::Sender<ProtocolRequest>,
}

impl ProtocolClient {
    pub fn new(sender: mpsc::Sender<ProtocolRequest>) -> Self {
        Self { sender }
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, ProtocolError>>) -> ProtocolRequest,
    ) -> Result<T, ProtocolError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| TransportError::ConnectionClosed)?;
        response.await.map_err(|_| TransportError::ResponseDropped)?
    }

    /// Ask the collection for the resources under `parent`.
    pub async fn enumerate(&self, parent: ParentRef) -> Result<Vec<ActorForm>, ProtocolError> {
        self.call(|respond_to| ProtocolRequest::Enumerate { parent, respond_to })
            .await
    }

    pub async fn get_state(&self, actor: ActorId) -> Result<StateSnapshot, ProtocolError> {
        self.call(|respond_to| ProtocolRequest::GetState { actor, respond_to })
            .await
    }

    pub async fn pause(&self, actor: ActorId) -> Result<(), ProtocolError> {
        self.call(|respond_to| ProtocolRequest::Pause { actor, respond_to })
            .await
    }

    /// Resolves once the resource reports it is ready, not when the request lands.
    pub async fn play(&self, actor: ActorId) -> Result<(), ProtocolError> {
        self.call(|respond_to| ProtocolRequest::Play { actor, respond_to })
            .await
    }

    pub async fn release(&self, actor: ActorId) -> Result<(), ProtocolError> {
        self.call(|respond_to| ProtocolRequest::Release { actor, respond_to })
            .await
    }

    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        self.call(|respond_to| ProtocolRequest::Disconnect { respond_to })
            .await
    }
}

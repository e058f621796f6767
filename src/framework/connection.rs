//! # Connection Loop
//!
//! The `Connection` is the server side of one client connection. It owns the
//! collection actor plus every resource actor minted on this connection and processes
//! [`ProtocolRequest`]s sequentially, so actor state never needs a lock.

use crate::framework::actor::{CollectionActor, ResourceActor};
use crate::framework::client::ProtocolClient;
use crate::framework::entity::{LiveResource, ResourceHost};
use crate::framework::error::ProtocolError;
use crate::framework::message::ProtocolRequest;
use crate::framework::resource::{ActorForm, ActorId, IdMinter, ParentRef};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Server half of the protocol for one connection.
///
/// # Usage Pattern
///
/// 1.  **Create**: `Connection::new(host, buffer, prefix)` returns the connection and
///     a [`ProtocolClient`].
/// 2.  **Run**: spawn `connection.run()` on the runtime.
/// 3.  **Shut down**: drop every client clone; the loop drains and destroys the
///     remaining actors.
///
/// # Ownership
///
/// Resource actors are keyed by id in `actors`. An actor leaves the registry when the
/// client releases it. Ids that are not in the registry (released, or never minted
/// here) answer with [`ProtocolError::ResourceGone`].
pub struct Connection<H: ResourceHost> {
    receiver: mpsc::Receiver<ProtocolRequest>,
    collection: CollectionActor<H>,
    actors: HashMap<ActorId, ResourceActor<H::Resource>>,
    minter: IdMinter,
}

impl<H: ResourceHost> Connection<H> {
    /// Creates a new connection and its client.
    ///
    /// * `buffer_size` - capacity of the request channel; callers wait when it is full.
    /// * `prefix` - prepended to every actor id minted on this connection.
    pub fn new(host: H, buffer_size: usize, prefix: impl Into<String>) -> (Self, ProtocolClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let mut minter = IdMinter::new(prefix);
        let collection = CollectionActor::new(minter.mint(H::COLLECTION_NAME), host);
        let connection = Self {
            receiver,
            collection,
            actors: HashMap::new(),
            minter,
        };
        (connection, ProtocolClient::new(sender))
    }

    pub fn collection_id(&self) -> &ActorId {
        self.collection.id()
    }

    fn actor_mut(
        &mut self,
        id: &ActorId,
    ) -> Result<&mut ResourceActor<H::Resource>, ProtocolError> {
        self.actors
            .get_mut(id)
            .ok_or_else(|| ProtocolError::ResourceGone(id.clone()))
    }

    /// Runs the request loop until every client has been dropped.
    pub async fn run(mut self) {
        let type_name = <H::Resource as LiveResource>::TYPE_NAME;
        info!(collection = %self.collection.id(), type_name, "Connection started");

        while let Some(msg) = self.receiver.recv().await {
            let kind = msg.kind();
            match msg {
                ProtocolRequest::Enumerate { parent, respond_to } => {
                    debug!(%parent, "Enumerate");
                    let result = self.enumerate(&parent).await;
                    match &result {
                        Ok(forms) => {
                            info!(%parent, count = forms.len(), size = self.actors.len(), "Enumerated")
                        }
                        Err(e) => warn!(%parent, error = %e, "Enumerate failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ProtocolRequest::GetState { actor, respond_to } => {
                    let result = self.actor_mut(&actor).and_then(|a| a.get_state());
                    debug!(%actor, ok = result.is_ok(), "GetState");
                    let _ = respond_to.send(result);
                }
                ProtocolRequest::Pause { actor, respond_to } => {
                    let result = self.actor_mut(&actor).and_then(|a| a.pause());
                    match &result {
                        Ok(()) => info!(%actor, "Paused"),
                        Err(e) => warn!(%actor, error = %e, "Pause failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ProtocolRequest::Play { actor, respond_to } => {
                    match self.actor_mut(&actor).and_then(|a| a.play()) {
                        Ok(ready) => {
                            debug!(%actor, "Play requested");
                            // Readiness may take a while; keep serving other requests.
                            tokio::spawn(async move {
                                let result = ready.await.map_err(ProtocolError::from);
                                match &result {
                                    Ok(()) => info!(%actor, "Playing"),
                                    Err(e) => warn!(%actor, error = %e, "Play failed"),
                                }
                                let _ = respond_to.send(result);
                            });
                        }
                        Err(e) => {
                            warn!(%actor, error = %e, "Play failed");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                ProtocolRequest::Release { actor, respond_to } => {
                    let result = match self.actors.remove(&actor) {
                        Some(mut released) => {
                            released.release();
                            info!(%actor, size = self.actors.len(), "Released");
                            Ok(())
                        }
                        None => {
                            warn!(%actor, "Release of unknown actor");
                            Err(ProtocolError::ResourceGone(actor))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ProtocolRequest::Disconnect { respond_to } => {
                    self.collection.disconnect();
                    let _ = respond_to.send(Ok(()));
                }
            }
            debug!(kind, "Handled");
        }

        let remaining = self.actors.len();
        for actor in self.actors.values_mut() {
            actor.destroy();
        }
        self.collection.destroy();
        info!(type_name, remaining, "Shutdown");
    }

    async fn enumerate(&mut self, parent: &ParentRef) -> Result<Vec<ActorForm>, ProtocolError> {
        let actors = self.collection.list_for(parent, &mut self.minter).await?;
        let mut forms = Vec::with_capacity(actors.len());
        for actor in actors {
            forms.push(actor.form()?);
            self.actors.insert(actor.id().clone(), actor);
        }
        Ok(forms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::entity::ReadyFuture;
    use crate::framework::error::HostError;
    use crate::framework::snapshot::StateSnapshot;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Lamp {
        on: bool,
    }

    impl LiveResource for Lamp {
        const TYPE_NAME: &'static str = "lamp";

        fn state(&self) -> StateSnapshot {
            StateSnapshot::new().with("on", self.on)
        }

        fn pause(&mut self) {
            self.on = false;
        }

        fn play(&mut self) -> ReadyFuture {
            self.on = true;
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(())
            })
        }
    }

    struct Room;

    #[async_trait]
    impl ResourceHost for Room {
        type Resource = Lamp;
        const COLLECTION_NAME: &'static str = "lamps";

        async fn enumerate(&self, parent: &ParentRef) -> Result<Vec<Lamp>, HostError> {
            match parent.as_str() {
                "kitchen" => Ok(vec![Lamp { on: true }, Lamp { on: false }]),
                _ => Ok(Vec::new()),
            }
        }
    }

    #[tokio::test]
    async fn test_connection_full_lifecycle() {
        let (connection, client) = Connection::new(Room, 10, "conn0.");
        assert_eq!(connection.collection_id().as_str(), "conn0.lamps1");
        let handle = tokio::spawn(connection.run());

        let forms = client.enumerate(ParentRef::new("kitchen")).await.unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].actor.as_str(), "conn0.lamp2");
        assert_eq!(forms[1].state.get("on"), Some(&false.into()));

        let lamp = forms[1].actor.clone();
        client.play(lamp.clone()).await.unwrap();
        let state = client.get_state(lamp.clone()).await.unwrap();
        assert_eq!(state.get("on"), Some(&true.into()));

        client.release(lamp.clone()).await.unwrap();
        let err = client.get_state(lamp.clone()).await.unwrap_err();
        assert_eq!(err, ProtocolError::ResourceGone(lamp.clone()));
        assert!(client.release(lamp).await.unwrap_err().is_resource_gone());

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_play_does_not_block_other_requests() {
        let (connection, client) = Connection::new(Room, 10, "conn0.");
        tokio::spawn(connection.run());

        let forms = client.enumerate(ParentRef::new("kitchen")).await.unwrap();
        let lamp = forms[1].actor.clone();

        let play_client = client.clone();
        let play_lamp = lamp.clone();
        let play = tokio::spawn(async move { play_client.play(play_lamp).await });
        tokio::task::yield_now().await;

        // Answered while the play is still waiting for readiness.
        let state = client.get_state(lamp).await.unwrap();
        assert_eq!(state.get("on"), Some(&true.into()));
        assert!(!play.is_finished());

        play.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_disconnect_keeps_handed_out_actors() {
        let (connection, client) = Connection::new(Room, 10, "conn0.");
        tokio::spawn(connection.run());

        let forms = client.enumerate(ParentRef::new("kitchen")).await.unwrap();
        client.disconnect().await.unwrap();

        let err = client.enumerate(ParentRef::new("kitchen")).await.unwrap_err();
        assert_eq!(err, ProtocolError::ResourceGone(ActorId::new("conn0.lamps1")));

        client.pause(forms[0].actor.clone()).await.unwrap();
        let state = client.get_state(forms[0].actor.clone()).await.unwrap();
        assert_eq!(state.get("on"), Some(&false.into()));
    }

    #[tokio::test]
    async fn test_closed_connection_is_a_transport_error() {
        let (connection, client) = Connection::new(Room, 10, "conn0.");
        drop(connection);

        let err = client.get_state(ActorId::new("conn0.lamp2")).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Transport(_)));
    }
}

//! # Server-Side Actors
//!
//! [`ResourceActor`] holds exactly one live resource and answers state queries and
//! control requests for it. [`CollectionActor`] discovers resources under a parent
//! context and builds one `ResourceActor` per resource.
//!
//! Both are plain structs; the [`Connection`](crate::framework::Connection) loop owns
//! them and drives them one request at a time, so neither needs a lock.

use crate::framework::entity::{LiveResource, ReadyFuture, ResourceHost};
use crate::framework::error::ProtocolError;
use crate::framework::resource::{ActorForm, ActorId, IdMinter, ParentRef, ResourceHandle};
use crate::framework::snapshot::StateSnapshot;
use tracing::{debug, info};

/// Server-owned proxy for one remote resource.
///
/// After [`destroy`](Self::destroy) every operation fails with
/// [`ProtocolError::ResourceGone`].
pub struct ResourceActor<R: LiveResource> {
    handle: ResourceHandle,
    resource: Option<R>,
}

impl<R: LiveResource> ResourceActor<R> {
    pub fn new(handle: ResourceHandle, resource: R) -> Self {
        Self {
            handle,
            resource: Some(resource),
        }
    }

    pub fn id(&self) -> &ActorId {
        &self.handle.id
    }

    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    pub fn is_destroyed(&self) -> bool {
        self.resource.is_none()
    }

    fn live(&self) -> Result<&R, ProtocolError> {
        self.resource
            .as_ref()
            .ok_or_else(|| ProtocolError::ResourceGone(self.handle.id.clone()))
    }

    fn live_mut(&mut self) -> Result<&mut R, ProtocolError> {
        self.resource
            .as_mut()
            .ok_or_else(|| ProtocolError::ResourceGone(self.handle.id.clone()))
    }

    /// Current state of the resource.
    pub fn get_state(&self) -> Result<StateSnapshot, ProtocolError> {
        Ok(self.live()?.state())
    }

    pub fn pause(&mut self) -> Result<(), ProtocolError> {
        self.live_mut()?.pause();
        Ok(())
    }

    /// Ask the resource to resume. The returned future completes on readiness.
    pub fn play(&mut self) -> Result<ReadyFuture, ProtocolError> {
        Ok(self.live_mut()?.play())
    }

    /// The form handed to clients: id plus the state at this instant.
    pub fn form(&self) -> Result<ActorForm, ProtocolError> {
        Ok(ActorForm {
            actor: self.handle.id.clone(),
            state: self.get_state()?,
        })
    }

    /// Drop the resource. Later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.resource.take().is_some() {
            debug!(actor = %self.handle.id, parent = %self.handle.parent, "Destroyed");
        }
    }

    /// Client-facing way to end this actor's lifetime.
    pub fn release(&mut self) {
        self.destroy();
    }
}

/// Lists live resources for a parent and wraps each one in a fresh actor.
///
/// Every call to [`list_for`](Self::list_for) is a new enumeration; nothing is cached
/// and the result is not diffed against earlier calls.
///
/// Tearing the collection down does not touch actors it already returned. Those
/// belong to whoever requested them and are released by that client (or when the
/// connection ends).
pub struct CollectionActor<H: ResourceHost> {
    id: ActorId,
    host: Option<H>,
}

impl<H: ResourceHost> CollectionActor<H> {
    pub fn new(id: ActorId, host: H) -> Self {
        Self {
            id,
            host: Some(host),
        }
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    pub fn is_destroyed(&self) -> bool {
        self.host.is_none()
    }

    /// Enumerate resources under `parent` and build one actor per resource, in host
    /// order.
    pub async fn list_for(
        &self,
        parent: &ParentRef,
        minter: &mut IdMinter,
    ) -> Result<Vec<ResourceActor<H::Resource>>, ProtocolError> {
        let host = self
            .host
            .as_ref()
            .ok_or_else(|| ProtocolError::ResourceGone(self.id.clone()))?;

        let resources = host.enumerate(parent).await?;
        let actors: Vec<_> = resources
            .into_iter()
            .map(|resource| {
                let handle = ResourceHandle {
                    id: minter.mint(<H::Resource as LiveResource>::TYPE_NAME),
                    parent: parent.clone(),
                };
                ResourceActor::new(handle, resource)
            })
            .collect();

        debug!(collection = %self.id, %parent, count = actors.len(), "Enumerated");
        Ok(actors)
    }

    pub fn destroy(&mut self) {
        if self.host.take().is_some() {
            info!(collection = %self.id, "Collection destroyed");
        }
    }

    /// Teardown entry point used when the client disconnects from the collection.
    pub fn disconnect(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::error::HostError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct Counter {
        paused: bool,
        plays: Arc<AtomicU32>,
    }

    impl LiveResource for Counter {
        const TYPE_NAME: &'static str = "counter";

        fn state(&self) -> StateSnapshot {
            StateSnapshot::new().with("paused", self.paused)
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn play(&mut self) -> ReadyFuture {
            self.paused = false;
            self.plays.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(()) })
        }
    }

    struct CounterHost {
        per_parent: usize,
    }

    #[async_trait]
    impl ResourceHost for CounterHost {
        type Resource = Counter;
        const COLLECTION_NAME: &'static str = "counters";

        async fn enumerate(&self, parent: &ParentRef) -> Result<Vec<Counter>, HostError> {
            if parent.as_str() == "missing" {
                return Err(HostError::new("no such parent"));
            }
            Ok((0..self.per_parent)
                .map(|_| Counter {
                    paused: false,
                    plays: Arc::new(AtomicU32::new(0)),
                })
                .collect())
        }
    }

    fn actor() -> ResourceActor<Counter> {
        let handle = ResourceHandle {
            id: ActorId::new("conn0.counter1"),
            parent: ParentRef::new("node1"),
        };
        ResourceActor::new(
            handle,
            Counter {
                paused: false,
                plays: Arc::new(AtomicU32::new(0)),
            },
        )
    }

    #[tokio::test]
    async fn test_pause_and_play_mutate_resource() {
        let mut actor = actor();
        actor.pause().unwrap();
        actor.pause().unwrap();
        assert_eq!(
            actor.get_state().unwrap().get("paused"),
            Some(&true.into())
        );

        actor.play().unwrap().await.unwrap();
        assert_eq!(
            actor.get_state().unwrap().get("paused"),
            Some(&false.into())
        );
    }

    #[tokio::test]
    async fn test_destroyed_actor_rejects_every_operation() {
        let mut actor = actor();
        actor.destroy();
        actor.destroy();
        actor.release();

        assert!(actor.is_destroyed());
        assert!(actor.get_state().unwrap_err().is_resource_gone());
        assert!(actor.pause().unwrap_err().is_resource_gone());
        assert!(matches!(actor.play(), Err(ProtocolError::ResourceGone(_))));
        assert!(actor.form().unwrap_err().is_resource_gone());
    }

    #[tokio::test]
    async fn test_collection_builds_one_actor_per_resource() {
        let collection = CollectionActor::new(ActorId::new("conn0.counters0"), CounterHost { per_parent: 3 });
        let mut minter = IdMinter::new("conn0.");

        let first = collection.list_for(&ParentRef::new("node1"), &mut minter).await.unwrap();
        let second = collection.list_for(&ParentRef::new("node1"), &mut minter).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
        assert_eq!(first[0].id().as_str(), "conn0.counter1");
        // Fresh enumeration mints fresh actors.
        assert_eq!(second[0].id().as_str(), "conn0.counter4");
        assert_eq!(first[2].handle().parent.as_str(), "node1");
    }

    #[tokio::test]
    async fn test_collection_surfaces_host_errors_and_teardown() {
        let mut collection = CollectionActor::new(ActorId::new("conn0.counters0"), CounterHost { per_parent: 1 });
        let mut minter = IdMinter::new("conn0.");

        let err = collection.list_for(&ParentRef::new("missing"), &mut minter).await.err();
        assert!(matches!(err, Some(ProtocolError::Host(_))));

        let actors = collection.list_for(&ParentRef::new("node1"), &mut minter).await.unwrap();
        collection.disconnect();
        assert!(collection.is_destroyed());

        let err = collection.list_for(&ParentRef::new("node1"), &mut minter).await.err();
        assert!(matches!(err, Some(ProtocolError::ResourceGone(_))));
        // Actors handed out earlier are still alive.
        assert!(actors[0].get_state().is_ok());
    }
}

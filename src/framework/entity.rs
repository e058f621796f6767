//! # Host Capabilities
//!
//! The protocol never talks to a host runtime directly. Everything host-specific sits
//! behind two traits:
//!
//! - [`LiveResource`]: one live object (an animation player, say) that can be read,
//!   paused and played.
//! - [`ResourceHost`]: enumerates the live resources under a parent context.
//!
//! Implement both for a real host, or use a fake in tests. The generic
//! [`ResourceActor`](crate::framework::ResourceActor) and
//! [`Connection`](crate::framework::Connection) are written once against these traits.
//!
//! # Associated Types
//! `ResourceHost::Resource` ties a host to the concrete resource type it produces, so
//! a connection for animation players can only ever hold animation players.

use crate::framework::error::HostError;
use crate::framework::resource::ParentRef;
use crate::framework::snapshot::StateSnapshot;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// Future that resolves once a resource confirms it is ready after `play`.
pub type ReadyFuture = Pin<Box<dyn Future<Output = Result<(), HostError>> + Send + 'static>>;

/// A live, host-owned object observed through the protocol.
pub trait LiveResource: Send + 'static {
    /// Protocol type name, used when minting actor ids (e.g. `animationplayer`).
    const TYPE_NAME: &'static str;

    /// Read the current field values. Must not have side effects.
    fn state(&self) -> StateSnapshot;

    /// Halt progression. Calling it on an already paused resource is fine.
    fn pause(&mut self);

    /// Request a resume. The returned future resolves on readiness, not on request.
    fn play(&mut self) -> ReadyFuture;
}

/// Enumerates live resources for a parent context.
#[async_trait]
pub trait ResourceHost: Send + Sync + 'static {
    type Resource: LiveResource;

    /// Protocol type name of the collection itself (e.g. `animations`).
    const COLLECTION_NAME: &'static str;

    /// List the resources currently under `parent`, in host order.
    async fn enumerate(&self, parent: &ParentRef) -> Result<Vec<Self::Resource>, HostError>;
}

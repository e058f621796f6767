use crate::framework::{ProtocolError, ResourceFront};
use async_trait::async_trait;

/// Trait for resource-specific fronts to inherit the standard actor controls.
///
/// This trait reduces boilerplate by providing default implementations for
/// `pause`, `play` and `release` on top of the generic [`ResourceFront`].
#[async_trait]
pub trait ActorClient: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceFront.
    fn front(&self) -> &ResourceFront;

    /// Map protocol errors to the specific resource error type.
    fn map_error(e: ProtocolError) -> Self::Error;

    /// Pause the remote resource.
    #[tracing::instrument(skip(self), fields(actor = %self.front().actor_id()))]
    async fn pause(&self) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.front().pause().await.map_err(Self::map_error)
    }

    /// Resume the remote resource. Resolves once it is ready.
    #[tracing::instrument(skip(self), fields(actor = %self.front().actor_id()))]
    async fn play(&self) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.front().play().await.map_err(Self::map_error)
    }

    /// End the remote actor's lifetime and destroy the front.
    #[tracing::instrument(skip(self), fields(actor = %self.front().actor_id()))]
    async fn release(&self) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.front().release().await.map_err(Self::map_error)
    }
}

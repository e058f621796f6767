use crate::animation::{AnimationHost, AnimationsCollection};
use crate::clients::AnimationsClient;
use crate::config::WatchConfig;
use crate::framework::{ActorId, Connection};
use tracing::{error, info};

/// One inspector connection: the server loop running on the runtime and the client
/// used to talk to it.
///
/// `InspectorSession` is responsible for:
/// - **Lifecycle Management**: Starting the connection task and stopping it again
/// - **Wiring**: Building the animations collection over the host and handing out a
///   typed [`AnimationsClient`]
///
/// # Example
///
/// ```ignore
/// let session = InspectorSession::new(host, &WatchConfig::default());
///
/// let players = session.animations.players_for_node("#box".into()).await?;
/// players[0].pause().await?;
///
/// // Drop every front before shutting down
/// drop(players);
/// session.shutdown().await?;
/// ```
pub struct InspectorSession {
    /// Client for the animations collection actor
    pub animations: AnimationsClient,

    collection: ActorId,

    /// Task handle for the connection loop (used for graceful shutdown)
    handle: tokio::task::JoinHandle<()>,
}

impl InspectorSession {
    /// Creates the connection over `host` and spawns its request loop.
    pub fn new<H: AnimationHost>(host: H, config: &WatchConfig) -> Self {
        let (connection, client) = Connection::new(
            AnimationsCollection::new(host),
            config.channel_capacity,
            config.actor_prefix.clone(),
        );
        let collection = connection.collection_id().clone();
        let handle = tokio::spawn(connection.run());
        info!(%collection, "Inspector session started");

        Self {
            animations: AnimationsClient::new(client).with_refresh_interval(config.refresh_interval()),
            collection,
            handle,
        }
    }

    /// Id of the animations collection actor on this connection.
    pub fn collection_id(&self) -> &ActorId {
        &self.collection
    }

    /// Gracefully shuts down the connection.
    ///
    /// Dropping the session's client closes the request channel once every front
    /// created from it is gone too. The connection loop then destroys its remaining
    /// actors and exits.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the connection task finished cleanly
    /// - `Err(String)` if it panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!(collection = %self.collection, "Shutting down session...");

        drop(self.animations);

        if let Err(e) = self.handle.await {
            error!("Connection task failed: {:?}", e);
            return Err(format!("Connection task failed: {:?}", e));
        }

        info!("Session shutdown complete.");
        Ok(())
    }
}

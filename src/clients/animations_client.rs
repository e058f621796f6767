use crate::animation::AnimationError;
use crate::clients::player_front::AnimationPlayerFront;
use crate::framework::{ParentRef, ProtocolClient, DEFAULT_REFRESH_INTERVAL};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for the animations collection actor of one connection.
#[derive(Clone)]
pub struct AnimationsClient {
    inner: ProtocolClient,
    refresh_interval: Duration,
}

impl AnimationsClient {
    pub fn new(inner: ProtocolClient) -> Self {
        Self {
            inner,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Interval handed to every front this client creates.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// List the animation players currently on `node`, one front each.
    ///
    /// Every call mints new actors, even for players listed before. A form whose state
    /// is not an animation state is skipped and its actor released.
    #[instrument(skip(self, node), fields(node = %node))]
    pub async fn players_for_node(
        &self,
        node: ParentRef,
    ) -> Result<Vec<AnimationPlayerFront>, AnimationError> {
        debug!("Sending request");
        let forms = self
            .inner
            .enumerate(node)
            .await
            .map_err(AnimationError::from_collection)?;

        let mut players = Vec::with_capacity(forms.len());
        for form in forms {
            let actor = form.actor.clone();
            match AnimationPlayerFront::from_form(self.inner.clone(), form, self.refresh_interval) {
                Ok(front) => players.push(front),
                Err(e) => {
                    warn!(actor = %actor, error = %e, "Skipping player with malformed form");
                    if let Err(e) = self.inner.release(actor.clone()).await {
                        warn!(actor = %actor, error = %e, "Failed to release skipped player");
                    }
                }
            }
        }
        Ok(players)
    }

    /// Tear down the collection. Fronts already handed out keep working until the
    /// connection ends.
    #[instrument(skip(self))]
    pub async fn disconnect(&self) -> Result<(), AnimationError> {
        debug!("Sending request");
        self.inner
            .disconnect()
            .await
            .map_err(AnimationError::from_collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationState, PlayState};
    use crate::framework::mock::MockClient;
    use crate::framework::{ActorForm, ActorId, HostError, ProtocolError, StateSnapshot};

    fn form(id: &str, name: &str) -> ActorForm {
        let state = AnimationState {
            start_time: Some(0.0),
            current_time: Some(0.0),
            play_state: PlayState::Running,
            name: name.to_string(),
            duration: None,
            iteration_count: None,
            is_running_on_compositor: false,
        };
        ActorForm {
            actor: ActorId::new(id),
            state: StateSnapshot::from(&state),
        }
    }

    #[tokio::test]
    async fn test_players_for_node_builds_fronts() {
        let mut mock = MockClient::new();
        mock.expect_enumerate("#box").return_ok(vec![
            form("conn0.animationplayer2", "spin"),
            form("conn0.animationplayer3", "fade"),
        ]);

        let client = AnimationsClient::new(mock.client());
        let players = client.players_for_node(ParentRef::from("#box")).await.unwrap();

        let names: Vec<_> = players.iter().map(|p| p.initial_state().name.as_str()).collect();
        assert_eq!(names, vec!["spin", "fade"]);
        assert_eq!(players[1].actor_id().as_str(), "conn0.animationplayer3");
        mock.verify();
    }

    #[tokio::test]
    async fn test_host_errors_are_surfaced() {
        let mut mock = MockClient::new();
        mock.expect_enumerate("#missing")
            .return_err(ProtocolError::Host(HostError::new("unknown node #missing")));

        let client = AnimationsClient::new(mock.client());
        let result = client.players_for_node(ParentRef::from("#missing")).await;

        assert_eq!(
            result.err(),
            Some(AnimationError::HostError("unknown node #missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_malformed_form_is_skipped_and_released() {
        let mut mock = MockClient::new();
        let broken = ActorForm {
            actor: ActorId::new("conn0.animationplayer3"),
            state: StateSnapshot::new().with("playState", 7.0),
        };
        mock.expect_enumerate("#box").return_ok(vec![
            form("conn0.animationplayer2", "spin"),
            broken,
            form("conn0.animationplayer4", "fade"),
        ]);
        mock.expect_release("conn0.animationplayer3").return_ok(());

        let client = AnimationsClient::new(mock.client());
        let players = client.players_for_node(ParentRef::from("#box")).await.unwrap();

        let ids: Vec<_> = players.iter().map(|p| p.actor_id().as_str()).collect();
        assert_eq!(ids, vec!["conn0.animationplayer2", "conn0.animationplayer4"]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_gone_collection_is_reported_as_collection() {
        let mut mock = MockClient::new();
        mock.expect_disconnect().return_ok();
        mock.expect_enumerate("#box")
            .return_err(ProtocolError::ResourceGone(ActorId::new("conn0.animations1")));
        mock.expect_disconnect()
            .return_err(ProtocolError::ResourceGone(ActorId::new("conn0.animations1")));

        let client = AnimationsClient::new(mock.client());
        client.disconnect().await.unwrap();

        assert_eq!(
            client.players_for_node(ParentRef::from("#box")).await.err(),
            Some(AnimationError::CollectionGone("conn0.animations1".to_string()))
        );
        assert_eq!(
            client.disconnect().await,
            Err(AnimationError::CollectionGone("conn0.animations1".to_string()))
        );
        mock.verify();
    }
}

use state_watch::animation::{ComputedTiming, SimulatedHost};
use state_watch::clients::ActorClient;
use state_watch::config::WatchConfig;
use state_watch::lifecycle::{setup_tracing, InspectorSession};
use std::time::Duration;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => WatchConfig::load(&path).map_err(|e| e.to_string())?,
        None => WatchConfig::default(),
    };
    info!(?config, "Starting simulated inspector");

    // A page with one node running two CSS animations
    let host = SimulatedHost::new();
    host.add_node(
        "#box",
        ComputedTiming {
            animation_duration: "2s, 750ms".to_string(),
            transition_duration: "0s".to_string(),
            animation_iteration_count: "infinite, 1".to_string(),
        },
    );
    let spin = host.add_animation("#box", "spin");
    spin.set_running_on_compositor(true);
    host.add_animation("#box", "fade");

    let session = InspectorSession::new(host, &config);

    let players = async {
        info!("Listing animations");
        session
            .animations
            .players_for_node("#box".into())
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(tracing::info_span!("inspect"))
    .await?;

    let mut subscriptions = Vec::new();
    for player in &players {
        let actor = player.actor_id().clone();
        subscriptions.push(player.on_updated_state(move |state| {
            info!(
                %actor,
                play_state = %state.play_state,
                current_time = ?state.current_time,
                "Updated state"
            )
        }));
        player.start_auto_refresh();
    }

    tokio::time::sleep(config.refresh_interval() * 2).await;

    let (first, second) = match players.as_slice() {
        [first, second, ..] => (first, second),
        _ => return Err(format!("expected two animations, found {}", players.len())),
    };

    let span = tracing::info_span!("controls");
    let control_result = async {
        first.pause().await?;
        tokio::time::sleep(config.refresh_interval() * 2).await;
        first.play().await?;
        second.release().await
    }
    .instrument(span)
    .await;

    match control_result {
        Ok(()) => info!("Controls applied"),
        Err(e) => error!(error = %e, "Control request failed"),
    }

    tokio::time::sleep(config.refresh_interval()).await;

    drop(subscriptions);
    for player in &players {
        player.destroy();
    }
    drop(players);

    // Shutdown session gracefully
    session.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a `tracing_subscriber` formatter for the demo binary.
//! Library code only emits events; it never installs a subscriber itself.
//!
//! ## Configuration
//!
//! Log levels come from `RUST_LOG`. The output is compact and hides the module
//! prefix (`with_target(false)`), since every event already carries an `actor`,
//! `collection` or `node` field.
//!
//! ```bash
//! # Lifecycle only: connection start, enumerations, pause/play, releases
//! RUST_LOG=info cargo run
//!
//! # Every request, plus auto-refresh changes
//! RUST_LOG=debug cargo run
//!
//! # Individual polls, including stale replies dropped after a stop
//! RUST_LOG=trace cargo run
//!
//! # Only the front side
//! RUST_LOG=state_watch::framework::front=trace cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Connection**: start, shutdown and how many actors were still alive
//! - **Actors**: enumeration (`size` is the registry size), pause, play readiness, release
//! - **Fronts**: auto-refresh start/stop, `state-changed` deliveries, failed polls
//!
//! With `RUST_LOG=info` a short session looks like:
//!
//! ```text
//! INFO Connection started collection=conn0.animations1 type_name="animationplayer"
//! INFO Enumerated parent=#box count=2 size=2
//! INFO Paused actor=conn0.animationplayer2
//! INFO Playing actor=conn0.animationplayer2
//! INFO Released actor=conn0.animationplayer3 size=1
//! INFO Shutdown type_name="animationplayer" remaining=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Fields identify the actor; module paths add noise
        .compact()
        .init();
}

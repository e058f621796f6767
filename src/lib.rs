#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # State Watch
//!
//! > **Watch live remote state through actors and fronts.**
//!
//! A client inspects resources that live on a host (animation players on a page)
//! through a request/response connection. The host side wraps each resource in an
//! **Actor** with a stable id; the client side mirrors each actor with a **Front** that
//! can poll for changes and tell subscribers only when something actually moved.
//!
//! ## 🏗️ Design Philosophy
//!
//! Resources like running animations change every frame. Pushing every change would
//! flood the connection, so fronts poll on a timer and compare snapshots field by
//! field. Subscribers see one `state-changed` event per tick at most, and none while
//! the resource is idle.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generics: One Loop for Every Resource
//! The connection is `Connection<H: ResourceHost>`. Any host that can list resources
//! under a parent and any resource that can report a [`StateSnapshot`](framework::StateSnapshot)
//! plugs into the same request loop and the same front.
//!
//! ### Actor Lifetime
//! Every enumeration mints fresh actors with connection-unique ids. An actor lives
//! until the client releases it or the connection ends. Requests for an id that is
//! gone answer [`ResourceGone`](framework::ProtocolError::ResourceGone) instead of
//! touching a stale resource.
//!
//! ### Mocking: Testing without a Host
//! See the [`framework::mock`] module for scripting replies to a front.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! The protocol layer reports [`ProtocolError`](framework::ProtocolError). Typed clients
//! map it into their own error (here [`AnimationError`](animation::AnimationError)) through
//! [`ActorClient::map_error`](clients::ActorClient::map_error).
//!
//! ### 2. Concurrency Model
//! One task per connection processes requests in order, so actor state needs no lock.
//! Each front's auto-refresh is one more task. A poll is awaited before the next tick,
//! and a reply that arrives after `stop_auto_refresh` is dropped.
//!
//! ### 3. Observability
//! `tracing` everywhere, with `actor`, `collection` and `size` fields.
//! See the [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Snapshots and change detection, actors, the connection loop, the client and fronts.
//! - **Key items**: [`Connection`](framework::Connection), [`ResourceFront`](framework::ResourceFront).
//!
//! ### 2. The Resource ([`animation`])
//! Animation players as a watched resource, plus an in-memory host.
//! - **Key items**: [`AnimationState`](animation::AnimationState), [`SimulatedHost`](animation::SimulatedHost).
//!
//! ### 3. The Interface ([`clients`])
//! Typed wrappers so callers work with `AnimationState` instead of raw snapshots.
//! - **Key items**: [`AnimationsClient`](clients::AnimationsClient), [`AnimationPlayerFront`](clients::AnimationPlayerFront).
//!
//! ### 4. The Orchestrator ([`lifecycle`], [`config`])
//! Starts a connection from a [`WatchConfig`](config::WatchConfig) and shuts it down.
//! - **Key items**: [`InspectorSession`](lifecycle::InspectorSession).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the simulated inspector with info logs
//! RUST_LOG=info cargo run
//!
//! # Tests
//! cargo test
//! ```

pub mod animation;
pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;

//! # Mock Framework & Testing Guide
//!
//! `MockClient` hands out a real [`ProtocolClient`] whose requests are answered from a
//! queue of expectations instead of a running [`Connection`](crate::framework::Connection).
//! It lets you test fronts and typed clients without a host.
//!
//! ## When to use Mocks vs a Real Connection
//!
//! | Feature | MockClient | Real Connection |
//! |---------|------------|-----------------|
//! | **Speed** | Instant (in-memory) | Fast (but needs a host) |
//! | **Determinism** | Replies are scripted | Replies come from the host |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires host cooperation) |
//! | **Use Case** | Front and client logic | Actor behavior, end-to-end flows |
//!
//! ## Two Styles
//!
//! - **Fluent**: queue replies with `mock.expect_get_state(id).return_ok(snapshot)`,
//!   then call `mock.verify()` at the end.
//! - **Manual**: [`create_mock_client`] returns the client plus the raw request
//!   receiver. Use [`expect_get_state`] and friends to pull the next request and answer
//!   it yourself, at exactly the moment the test wants. This is what the stale-reply
//!   tests for auto-refresh use.
//!
//! ```rust
//! use state_watch::framework::mock::MockClient;
//! use state_watch::framework::{ActorId, ProtocolError, StateSnapshot};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::new();
//!     mock.expect_get_state("conn0.animationplayer1")
//!         .return_ok(StateSnapshot::new().with("playState", "paused"));
//!     mock.expect_pause("conn0.animationplayer1")
//!         .return_err(ProtocolError::ResourceGone(ActorId::new("conn0.animationplayer1")));
//!
//!     let client = mock.client();
//!     let state = client.get_state("conn0.animationplayer1".into()).await.unwrap();
//!     assert_eq!(state.get("playState").and_then(|v| v.as_str()), Some("paused"));
//!     assert!(client.pause("conn0.animationplayer1".into()).await.is_err());
//!
//!     mock.verify();
//! }
//! ```

use crate::framework::client::ProtocolClient;
use crate::framework::error::ProtocolError;
use crate::framework::message::{ProtocolRequest, Response};
use crate::framework::resource::{ActorForm, ActorId, ParentRef};
use crate::framework::snapshot::StateSnapshot;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the reply to give it.
enum Expectation {
    Enumerate {
        parent: ParentRef,
        response: Result<Vec<ActorForm>, ProtocolError>,
    },
    GetState {
        actor: ActorId,
        response: Result<StateSnapshot, ProtocolError>,
    },
    Pause {
        actor: ActorId,
        response: Result<(), ProtocolError>,
    },
    Play {
        actor: ActorId,
        response: Result<(), ProtocolError>,
    },
    Release {
        actor: ActorId,
        response: Result<(), ProtocolError>,
    },
    Disconnect {
        response: Result<(), ProtocolError>,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A mock connection with expectation tracking for fluent testing.
///
/// Requests are matched against expectations in order. A request of the wrong kind or
/// for the wrong actor panics the background task, which the caller then sees as a
/// dropped response.
pub struct MockClient {
    client: ProtocolClient,
    expectations: Expectations,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ProtocolRequest>(100);
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        ProtocolRequest::Enumerate { parent, respond_to },
                        Some(Expectation::Enumerate { parent: expected, response }),
                    ) => {
                        assert_eq!(parent, expected, "enumerate for unexpected parent");
                        let _ = respond_to.send(response);
                    }
                    (
                        ProtocolRequest::GetState { actor, respond_to },
                        Some(Expectation::GetState { actor: expected, response }),
                    ) => {
                        assert_eq!(actor, expected, "getCurrentState for unexpected actor");
                        let _ = respond_to.send(response);
                    }
                    (
                        ProtocolRequest::Pause { actor, respond_to },
                        Some(Expectation::Pause { actor: expected, response }),
                    ) => {
                        assert_eq!(actor, expected, "pause for unexpected actor");
                        let _ = respond_to.send(response);
                    }
                    (
                        ProtocolRequest::Play { actor, respond_to },
                        Some(Expectation::Play { actor: expected, response }),
                    ) => {
                        assert_eq!(actor, expected, "play for unexpected actor");
                        let _ = respond_to.send(response);
                    }
                    (
                        ProtocolRequest::Release { actor, respond_to },
                        Some(Expectation::Release { actor: expected, response }),
                    ) => {
                        assert_eq!(actor, expected, "release for unexpected actor");
                        let _ = respond_to.send(response);
                    }
                    (
                        ProtocolRequest::Disconnect { respond_to },
                        Some(Expectation::Disconnect { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected {} request or expectation mismatch", request.kind());
                    }
                }
            }
        });

        Self {
            client: ProtocolClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ProtocolClient {
        self.client.clone()
    }

    pub fn expect_enumerate(&mut self, parent: impl Into<ParentRef>) -> EnumerateExpectationBuilder {
        EnumerateExpectationBuilder {
            parent: parent.into(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_get_state(&mut self, actor: impl Into<ActorId>) -> ExpectationBuilder<StateSnapshot> {
        self.builder(actor.into(), |actor, response| Expectation::GetState { actor, response })
    }

    pub fn expect_pause(&mut self, actor: impl Into<ActorId>) -> ExpectationBuilder<()> {
        self.builder(actor.into(), |actor, response| Expectation::Pause { actor, response })
    }

    pub fn expect_play(&mut self, actor: impl Into<ActorId>) -> ExpectationBuilder<()> {
        self.builder(actor.into(), |actor, response| Expectation::Play { actor, response })
    }

    pub fn expect_release(&mut self, actor: impl Into<ActorId>) -> ExpectationBuilder<()> {
        self.builder(actor.into(), |actor, response| Expectation::Release { actor, response })
    }

    pub fn expect_disconnect(&mut self) -> DisconnectExpectationBuilder {
        DisconnectExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    fn builder<T>(
        &self,
        actor: ActorId,
        make: fn(ActorId, Result<T, ProtocolError>) -> Expectation,
    ) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            actor,
            make,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for actor-targeted expectations.
pub struct ExpectationBuilder<T> {
    actor: ActorId,
    make: fn(ActorId, Result<T, ProtocolError>) -> Expectation,
    expectations: Expectations,
}

impl<T> ExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        let exp = (self.make)(self.actor, Ok(value));
        self.expectations.lock().unwrap().push_back(exp);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ProtocolError) {
        let exp = (self.make)(self.actor, Err(error));
        self.expectations.lock().unwrap().push_back(exp);
    }
}

/// Builder for `enumerate` expectations.
pub struct EnumerateExpectationBuilder {
    parent: ParentRef,
    expectations: Expectations,
}

impl EnumerateExpectationBuilder {
    pub fn return_ok(self, forms: Vec<ActorForm>) {
        self.expectations.lock().unwrap().push_back(Expectation::Enumerate {
            parent: self.parent,
            response: Ok(forms),
        });
    }

    pub fn return_err(self, error: ProtocolError) {
        self.expectations.lock().unwrap().push_back(Expectation::Enumerate {
            parent: self.parent,
            response: Err(error),
        });
    }
}

/// Builder for `disconnect` expectations.
pub struct DisconnectExpectationBuilder {
    expectations: Expectations,
}

impl DisconnectExpectationBuilder {
    pub fn return_ok(self) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Disconnect { response: Ok(()) });
    }

    pub fn return_err(self, error: ProtocolError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Disconnect { response: Err(error) });
    }
}

// =============================================================================
// MANUAL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests land on.
///
/// Nothing answers on its own: pull each request with one of the `expect_*` helpers
/// and reply through the returned sender whenever the test is ready.
pub fn create_mock_client(buffer_size: usize) -> (ProtocolClient, mpsc::Receiver<ProtocolRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ProtocolClient::new(sender), receiver)
}

/// Helper to verify that the next message is a GetState request
pub async fn expect_get_state(
    receiver: &mut mpsc::Receiver<ProtocolRequest>,
) -> Option<(ActorId, Response<StateSnapshot>)> {
    match receiver.recv().await {
        Some(ProtocolRequest::GetState { actor, respond_to }) => Some((actor, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Pause request
pub async fn expect_pause(
    receiver: &mut mpsc::Receiver<ProtocolRequest>,
) -> Option<(ActorId, Response<()>)> {
    match receiver.recv().await {
        Some(ProtocolRequest::Pause { actor, respond_to }) => Some((actor, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Play request
pub async fn expect_play(
    receiver: &mut mpsc::Receiver<ProtocolRequest>,
) -> Option<(ActorId, Response<()>)> {
    match receiver.recv().await {
        Some(ProtocolRequest::Play { actor, respond_to }) => Some((actor, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Release request
pub async fn expect_release(
    receiver: &mut mpsc::Receiver<ProtocolRequest>,
) -> Option<(ActorId, Response<()>)> {
    match receiver.recv().await {
        Some(ProtocolRequest::Release { actor, respond_to }) => Some((actor, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Disconnect request
pub async fn expect_disconnect(receiver: &mut mpsc::Receiver<ProtocolRequest>) -> Option<Response<()>> {
    match receiver.recv().await {
        Some(ProtocolRequest::Disconnect { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an Enumerate request
pub async fn expect_enumerate(
    receiver: &mut mpsc::Receiver<ProtocolRequest>,
) -> Option<(ParentRef, Response<Vec<ActorForm>>)> {
    match receiver.recv().await {
        Some(ProtocolRequest::Enumerate { parent, respond_to }) => Some((parent, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let pause_task =
            tokio::spawn(async move { client.pause(ActorId::new("conn0.animationplayer1")).await });

        let (actor, responder) = expect_pause(&mut receiver).await.expect("Expected Pause request");
        assert_eq!(actor.as_str(), "conn0.animationplayer1");
        responder.send(Ok(())).unwrap();

        assert_eq!(pause_task.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::new();
        let form = ActorForm {
            actor: ActorId::new("conn0.animationplayer2"),
            state: StateSnapshot::new().with("playState", "running"),
        };
        mock.expect_enumerate("node1").return_ok(vec![form.clone()]);
        mock.expect_release("conn0.animationplayer2").return_ok(());

        let client = mock.client();
        let forms = client.enumerate(ParentRef::new("node1")).await.unwrap();
        assert_eq!(forms, vec![form]);
        client.release(ActorId::new("conn0.animationplayer2")).await.unwrap();

        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatched_request_drops_response() {
        let mut mock = MockClient::new();
        mock.expect_play("conn0.animationplayer1").return_ok(());

        let result = mock.client().pause(ActorId::new("conn0.animationplayer1")).await;
        assert!(matches!(result, Err(ProtocolError::Transport(_))));
    }

    #[tokio::test]
    async fn test_disconnect_expectations() {
        let mut mock = MockClient::new();
        mock.expect_disconnect().return_ok();
        mock.expect_disconnect()
            .return_err(ProtocolError::ResourceGone(ActorId::new("conn0.animations1")));

        let client = mock.client();
        assert_eq!(client.disconnect().await, Ok(()));
        assert_eq!(
            client.disconnect().await,
            Err(ProtocolError::ResourceGone(ActorId::new("conn0.animations1")))
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_manual_release_and_disconnect() {
        let (client, mut receiver) = create_mock_client(10);

        let task = tokio::spawn(async move {
            let released = client.release(ActorId::new("conn0.animationplayer4")).await;
            let disconnected = client.disconnect().await;
            (released, disconnected)
        });

        let (actor, responder) = expect_release(&mut receiver).await.expect("Expected Release request");
        assert_eq!(actor.as_str(), "conn0.animationplayer4");
        responder.send(Ok(())).unwrap();
        let responder = expect_disconnect(&mut receiver).await.expect("Expected Disconnect request");
        responder.send(Ok(())).unwrap();

        assert_eq!(task.await.unwrap(), (Ok(()), Ok(())));
    }
}

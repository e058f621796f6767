//! Identity types shared by the server and client halves of the protocol.

use crate::framework::snapshot::StateSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a server-side actor.
///
/// Minted by the connection as `"{prefix}{type_name}{n}"`; never reused within a
/// connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Reference to the parent context a collection enumerates under (a DOM node for
/// animations).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentRef(String);

impl ParentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParentRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifies one server-owned resource. Owned exclusively by the actor it backs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    pub id: ActorId,
    pub parent: ParentRef,
}

/// The serialized form of an actor handed to clients.
///
/// Carries the actor id and its state at creation time, so a front can be built
/// without another round trip. On the wire this is one flat object:
/// `{"actor": "conn0.animationplayer1", "playState": "running", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorForm {
    pub actor: ActorId,
    #[serde(flatten)]
    pub state: StateSnapshot,
}

/// Mints actor ids for one connection.
#[derive(Debug)]
pub struct IdMinter {
    prefix: String,
    next: u64,
}

impl IdMinter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn mint(&mut self, type_name: &str) -> ActorId {
        let id = ActorId(format!("{}{}{}", self.prefix, type_name, self.next));
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_ids_are_unique_and_prefixed() {
        let mut minter = IdMinter::new("conn0.");
        let a = minter.mint("animationplayer");
        let b = minter.mint("animationplayer");
        let c = minter.mint("animations");

        assert_eq!(a.as_str(), "conn0.animationplayer1");
        assert_eq!(b.as_str(), "conn0.animationplayer2");
        assert_eq!(c.as_str(), "conn0.animations3");
    }

    #[test]
    fn test_form_serializes_flat() {
        let form = ActorForm {
            actor: ActorId::new("conn0.animationplayer1"),
            state: StateSnapshot::new()
                .with("playState", "running")
                .with("currentTime", 250.0),
        };

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["actor"], serde_json::json!("conn0.animationplayer1"));
        assert_eq!(json["playState"], serde_json::json!("running"));
        assert_eq!(json["currentTime"], serde_json::json!(250.0));
    }

    #[test]
    fn test_form_deserializes_from_flat_json() {
        let json = r#"{
            "actor": "conn0.animationplayer4",
            "startTime": null,
            "currentTime": 120.5,
            "playState": "paused",
            "name": "slide-in",
            "duration": 1500,
            "iterationCount": "infinite",
            "isRunningOnCompositor": false
        }"#;

        let form: ActorForm = serde_json::from_str(json).unwrap();

        assert_eq!(form.actor.as_str(), "conn0.animationplayer4");
        assert_eq!(form.state.len(), 7);
        assert!(form.state.get("actor").is_none());
        assert!(form.state.get("startTime").unwrap().is_null());
        assert_eq!(form.state.get("duration").and_then(|v| v.as_f64()), Some(1500.0));
        assert_eq!(form.state.get("iterationCount").and_then(|v| v.as_str()), Some("infinite"));
        assert_eq!(form.state.get("isRunningOnCompositor").and_then(|v| v.as_bool()), Some(false));

        let back: ActorForm = serde_json::from_value(serde_json::to_value(&form).unwrap()).unwrap();
        assert_eq!(back, form);
    }
}

//! # Protocol Messages
//!
//! This module defines the requests a [`ProtocolClient`](crate::framework::ProtocolClient)
//! sends to a [`Connection`](crate::framework::Connection).
//!
//! Each variant carries a `oneshot` sender the connection answers on. Requests name
//! their target by [`ActorId`]; the connection owns the actual actors.
//!
//! | Request | Target | Reply |
//! |---|---|---|
//! | `Enumerate` | collection | forms of the newly created actors |
//! | `GetState` | resource actor | [`StateSnapshot`] |
//! | `Pause` | resource actor | ack |
//! | `Play` | resource actor | ack once the resource is ready |
//! | `Release` | resource actor | ack |
//! | `Disconnect` | collection | ack |

use crate::framework::error::ProtocolError;
use crate::framework::resource::{ActorForm, ActorId, ParentRef};
use crate::framework::snapshot::StateSnapshot;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the connection.
pub type Response<T> = oneshot::Sender<Result<T, ProtocolError>>;

#[derive(Debug)]
pub enum ProtocolRequest {
    Enumerate {
        parent: ParentRef,
        respond_to: Response<Vec<ActorForm>>,
    },
    GetState {
        actor: ActorId,
        respond_to: Response<StateSnapshot>,
    },
    Pause {
        actor: ActorId,
        respond_to: Response<()>,
    },
    Play {
        actor: ActorId,
        respond_to: Response<()>,
    },
    Release {
        actor: ActorId,
        respond_to: Response<()>,
    },
    Disconnect {
        respond_to: Response<()>,
    },
}

impl ProtocolRequest {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolRequest::Enumerate { .. } => "enumerate",
            ProtocolRequest::GetState { .. } => "getCurrentState",
            ProtocolRequest::Pause { .. } => "pause",
            ProtocolRequest::Play { .. } => "play",
            ProtocolRequest::Release { .. } => "release",
            ProtocolRequest::Disconnect { .. } => "disconnect",
        }
    }
}

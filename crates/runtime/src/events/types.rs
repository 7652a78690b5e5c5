//! Event types for different topics.

use game_core::{ActionKind, Request};
use serde::{Deserialize, Serialize};

/// Intake and lifecycle events of the action queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueEvent {
    /// A request passed validation and was queued or forwarded.
    RequestAccepted { request: Request },

    /// A request was refused. No state changed.
    RequestRejected {
        kind: ActionKind,
        code: String,
        reason: String,
    },

    /// `on_start` ran for this request.
    ActionStarted { request: Request },

    /// `on_end` ran. `state_root` commits to the world right after it.
    ActionFinished { kind: ActionKind, state_root: [u8; 32] },

    /// A queued request no longer validated when it reached the front.
    RequestDropped { kind: ActionKind, reason: String },
}

/// Traffic across the peer boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkEvent {
    /// The host accepted a request; peers must receive it in this order.
    Broadcast { request: Request },

    /// A local intent was handed to the authoritative peer.
    Forwarded { request: Request },

    /// An authoritative request could not be replayed and was dropped.
    DesyncDropped { kind: ActionKind, reason: String },
}

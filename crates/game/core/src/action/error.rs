//! Validation errors.
//!
//! A failed validation is a normal negative answer, not a fault. The variant
//! says why an intent was refused so the caller can pick a cue.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, Position, TeamId, UnitFlags};

use super::ActionKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    /// Request routed to a definition of another kind.
    #[error("{found} request handed to the {expected} definition")]
    KindMismatch {
        expected: ActionKind,
        found: ActionKind,
    },

    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("actor {0} is not alive")]
    ActorDead(EntityId),

    #[error("it is not {team}'s turn")]
    NotActiveTeam { team: TeamId },

    #[error("actor {0} has no actions left this turn")]
    NoActionsLeft(EntityId),

    #[error("unit {id} lacks {required:?}")]
    MissingCapability { id: EntityId, required: UnitFlags },

    #[error("target {0} not found")]
    TargetNotFound(EntityId),

    #[error("target {0} is not alive")]
    TargetDead(EntityId),

    /// Wrong allegiance or otherwise not a legal target.
    #[error("{0} is not a valid target")]
    InvalidTarget(EntityId),

    #[error("position {0} is out of bounds")]
    OutOfBounds(Position),

    #[error("target is out of range")]
    OutOfRange,

    #[error("no valid path to {0}")]
    Unreachable(Position),

    #[error("path is empty")]
    EmptyPath,

    #[error("site {0} is already complete")]
    AlreadyComplete(EntityId),

    #[error("no unit inside the target area")]
    NoTargets,

    /// An inbound authoritative request carries no derived data.
    #[error("request carries no derived plan")]
    NotEnriched,

    /// Derived data that contradicts itself or the local map.
    #[error("derived plan is malformed: {0}")]
    MalformedPlan(String),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            NotActiveTeam { .. } | NoActionsLeft(_) | OutOfRange | Unreachable(_) => {
                ErrorSeverity::Recoverable
            }
            ActorNotFound(_) | ActorDead(_) | MissingCapability { .. } => ErrorSeverity::Validation,
            TargetNotFound(_) | TargetDead(_) | InvalidTarget(_) => ErrorSeverity::Validation,
            OutOfBounds(_) | EmptyPath | AlreadyComplete(_) | NoTargets => {
                ErrorSeverity::Validation
            }
            KindMismatch { .. } => ErrorSeverity::Internal,
            NotEnriched | MalformedPlan(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            KindMismatch { .. } => "ACTION_KIND_MISMATCH",
            ActorNotFound(_) => "ACTION_ACTOR_NOT_FOUND",
            ActorDead(_) => "ACTION_ACTOR_DEAD",
            NotActiveTeam { .. } => "ACTION_NOT_ACTIVE_TEAM",
            NoActionsLeft(_) => "ACTION_NO_ACTIONS_LEFT",
            MissingCapability { .. } => "ACTION_MISSING_CAPABILITY",
            TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            TargetDead(_) => "ACTION_TARGET_DEAD",
            InvalidTarget(_) => "ACTION_INVALID_TARGET",
            OutOfBounds(_) => "ACTION_OUT_OF_BOUNDS",
            OutOfRange => "ACTION_OUT_OF_RANGE",
            Unreachable(_) => "ACTION_UNREACHABLE",
            EmptyPath => "ACTION_EMPTY_PATH",
            AlreadyComplete(_) => "ACTION_ALREADY_COMPLETE",
            NoTargets => "ACTION_NO_TARGETS",
            NotEnriched => "ACTION_NOT_ENRICHED",
            MalformedPlan(_) => "ACTION_MALFORMED_PLAN",
        }
    }
}

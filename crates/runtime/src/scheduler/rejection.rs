//! Reasons a request never entered the queue.

use game_core::{ActionError, ActionKind, ErrorSeverity, GameError};
use thiserror::Error;

/// Why the queue refused a request.
///
/// Every variant means the same thing to the submitter: no state changed.
/// The split only matters for logging and for picking an error cue.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The definition refused the request against the current world.
    #[error("validation failed: {0}")]
    Validation(#[from] ActionError),

    #[error("queue is full ({capacity} pending)")]
    Capacity { capacity: usize },

    #[error("no definition registered for {0}")]
    UnknownKind(ActionKind),

    /// Counters are raised by the engine, never submitted.
    #[error("{0} requests are engine initiated")]
    EngineInitiated(ActionKind),

    /// An authoritative request that cannot be replayed here.
    #[error("authoritative {kind} request cannot be replayed: {source}")]
    Desync {
        kind: ActionKind,
        #[source]
        source: ActionError,
    },
}

impl GameError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation(error) => error.severity(),
            Self::Capacity { .. } => ErrorSeverity::Recoverable,
            Self::UnknownKind(_) => ErrorSeverity::Internal,
            Self::EngineInitiated(_) => ErrorSeverity::Validation,
            Self::Desync { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(error) => error.error_code(),
            Self::Capacity { .. } => "QUEUE_CAPACITY",
            Self::UnknownKind(_) => "QUEUE_UNKNOWN_KIND",
            Self::EngineInitiated(_) => "QUEUE_ENGINE_INITIATED",
            Self::Desync { .. } => "QUEUE_PROTOCOL_DESYNC",
        }
    }
}

//! State management errors.
//!
//! Raised while assembling a session's initial state. Once the session runs,
//! the world is only changed by action hooks, which never fail.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, Position};

/// Errors that occur while placing entities into a [`super::GameState`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// Entity id is already used by a unit or a site.
    #[error("entity id {id} is already in use")]
    DuplicateId { id: EntityId },

    /// Footprint leaves the map.
    #[error("entity {id} at {position} is out of bounds (map size: {width}x{height})")]
    OutOfBounds {
        id: EntityId,
        position: Position,
        width: u32,
        height: u32,
    },

    /// Footprint overlaps an existing occupant.
    #[error("entity {id} at {position} overlaps {occupant}")]
    Overlap {
        id: EntityId,
        position: Position,
        occupant: EntityId,
    },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "STATE_DUPLICATE_ID",
            Self::OutOfBounds { .. } => "STATE_OUT_OF_BOUNDS",
            Self::Overlap { .. } => "STATE_OVERLAP",
        }
    }
}

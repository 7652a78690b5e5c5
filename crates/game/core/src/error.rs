//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (e.g. [`crate::action::ActionError`]) are defined next
//! to the code that produces them and implement [`GameError`] so the runtime
//! can pick a handling strategy without matching every variant.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the intent may succeed later or with a different choice
/// - **Validation**: the intent is malformed for the current world and is dropped
/// - **Internal**: state inconsistency worth investigating
/// - **Fatal**: the peer can no longer trust its copy of the world
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: destination occupied, no actions left this turn.
    Recoverable,

    /// Examples: actor not found, target already dead.
    Validation,

    /// Examples: follow-up request referencing a unit that vanished.
    Internal,

    /// Examples: authoritative request that fails local re-validation.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or desync.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

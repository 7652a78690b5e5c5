//! Action definition registry.

use game_core::{ActionDefinition, ActionKind, default_definitions};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a definition for {0} is already registered")]
    Duplicate(ActionKind),

    #[error("registry is sealed; {0} cannot be registered after the session started")]
    Sealed(ActionKind),
}

/// One reusable definition per action kind.
///
/// Definitions are registered during setup. Once a queue takes ownership the
/// registry is sealed, so every peer runs a session against the same set.
#[derive(Default)]
pub struct ActionRegistry {
    definitions: Vec<Box<dyn ActionDefinition>>,
    sealed: bool,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in definition of every kind.
    pub fn with_defaults() -> Self {
        Self {
            definitions: default_definitions(),
            sealed: false,
        }
    }

    pub fn register(&mut self, definition: Box<dyn ActionDefinition>) -> Result<(), RegistryError> {
        let kind = definition.kind();
        if self.sealed {
            return Err(RegistryError::Sealed(kind));
        }
        if self.contains(kind) {
            return Err(RegistryError::Duplicate(kind));
        }
        self.definitions.push(definition);
        Ok(())
    }

    /// Forbids further registration.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.definitions.iter().map(|definition| definition.kind())
    }

    pub fn get(&self, kind: ActionKind) -> Option<&dyn ActionDefinition> {
        self.definitions
            .iter()
            .find(|definition| definition.kind() == kind)
            .map(|definition| definition.as_ref())
    }

    pub fn get_mut(&mut self, kind: ActionKind) -> Option<&mut (dyn ActionDefinition + 'static)> {
        self.definitions
            .iter_mut()
            .find(|definition| definition.kind() == kind)
            .map(|definition| definition.as_mut())
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .field("sealed", &self.sealed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use game_core::action::EndTurnDefinition;

    use super::*;

    #[test]
    fn defaults_cover_every_kind() {
        let registry = ActionRegistry::with_defaults();
        for kind in ActionKind::ALL {
            assert!(registry.contains(kind), "{kind} missing");
        }
    }

    #[test]
    fn rejects_duplicate_kinds() {
        let mut registry = ActionRegistry::new();
        registry.register(Box::new(EndTurnDefinition)).unwrap();

        let result = registry.register(Box::new(EndTurnDefinition));
        assert_eq!(result, Err(RegistryError::Duplicate(ActionKind::EndTurn)));
    }

    #[test]
    fn rejects_registration_after_seal() {
        let mut registry = ActionRegistry::new();
        registry.seal();

        let result = registry.register(Box::new(EndTurnDefinition));
        assert_eq!(result, Err(RegistryError::Sealed(ActionKind::EndTurn)));
        assert!(!registry.contains(ActionKind::EndTurn));
    }
}

//! Authoritative game state representation.
//!
//! This module owns the data structures that describe units, construction
//! sites, tiles, and turn bookkeeping. Runtime layers clone or query this
//! state but mutate it exclusively through action hooks via [`crate::WorldMut`].
mod error;
pub mod types;

pub use error::StateError;
pub use types::{
    CombatStats, EntityId, Footprint, Health, MapDimensions, MovementKind, Position, SiteState,
    Step, TeamId, TerrainKind, Tile, TileMap, TurnState, UnitFlags, UnitState, UnitStatus,
};

use crate::config::GameConfig;
use crate::spatial::Rect;

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Rules every peer applies. Fixed for the lifetime of a session.
    config: GameConfig,
    pub map: TileMap,
    /// Units in placement order. Iteration order is part of determinism.
    pub units: Vec<UnitState>,
    pub sites: Vec<SiteState>,
    pub turn: TurnState,
}

impl GameState {
    /// Creates a state with no entities.
    pub fn new(config: GameConfig, map: TileMap, turn: TurnState) -> Self {
        Self {
            config,
            map,
            units: Vec::new(),
            sites: Vec::new(),
            turn,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Places a unit, enforcing unique ids, bounds, and non-overlap with
    /// other living units.
    pub fn add_unit(&mut self, unit: UnitState) -> Result<(), StateError> {
        self.check_placement(unit.id, Rect::of(unit.position, unit.footprint), unit.position)?;
        self.units.push(unit);
        Ok(())
    }

    /// Places a construction site. Sites share the id space with units.
    pub fn add_site(&mut self, site: SiteState) -> Result<(), StateError> {
        let id = site.id;
        if self.id_in_use(id) {
            return Err(StateError::DuplicateId { id });
        }
        self.check_bounds(id, Rect::of(site.position, site.footprint), site.position)?;
        self.sites.push(site);
        Ok(())
    }

    pub fn unit(&self, id: EntityId) -> Option<&UnitState> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn unit_mut(&mut self, id: EntityId) -> Option<&mut UnitState> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub fn site(&self, id: EntityId) -> Option<&SiteState> {
        self.sites.iter().find(|site| site.id == id)
    }

    pub fn site_mut(&mut self, id: EntityId) -> Option<&mut SiteState> {
        self.sites.iter_mut().find(|site| site.id == id)
    }

    fn id_in_use(&self, id: EntityId) -> bool {
        self.unit(id).is_some() || self.site(id).is_some()
    }

    fn check_placement(&self, id: EntityId, rect: Rect, position: Position) -> Result<(), StateError> {
        if self.id_in_use(id) {
            return Err(StateError::DuplicateId { id });
        }
        self.check_bounds(id, rect, position)?;
        if let Some(occupant) = self
            .units
            .iter()
            .filter(|unit| unit.status != UnitStatus::Dead)
            .find(|unit| Rect::of(unit.position, unit.footprint).intersects(&rect))
        {
            return Err(StateError::Overlap {
                id,
                position,
                occupant: occupant.id,
            });
        }
        Ok(())
    }

    fn check_bounds(&self, id: EntityId, rect: Rect, position: Position) -> Result<(), StateError> {
        let dimensions = self.map.dimensions();
        let far_corner = Position::new(rect.x + rect.width - 1, rect.y + rect.height - 1);
        if !dimensions.contains(position) || !dimensions.contains(far_corner) {
            return Err(StateError::OutOfBounds {
                id,
                position,
                width: dimensions.width,
                height: dimensions.height,
            });
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default(), TileMap::default(), TurnState::default())
    }
}

/// Computes a commitment to the full game state.
///
/// Peers compare roots after every completed action; a mismatch means the
/// local copy diverged from the authoritative stream.
///
/// # Serialization
///
/// Requires the `serde` feature. bincode serialization of `GameState` is
/// deterministic because every collection in it is ordered.
#[cfg(feature = "serde")]
pub fn state_root(state: &GameState) -> [u8; 32] {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    if let Ok(bytes) = bincode::serialize(state) {
        hasher.update(&bytes);
    }
    hasher.finalize().into()
}

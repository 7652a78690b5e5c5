//! World access contracts consumed by validation and action hooks.
//!
//! Hooks never reach world data through ambient state: they receive a
//! [`WorldView`] (read) or [`WorldMut`] (read plus the few setters actions are
//! allowed to use). [`GameState`] implements both; tests may supply their own.

use crate::config::GameConfig;
use crate::spatial::Rect;
use crate::state::{
    EntityId, GameState, MapDimensions, Position, SiteState, TeamId, Tile, TurnState, UnitState,
    UnitStatus,
};

/// Read-only view of the world.
pub trait WorldView {
    fn config(&self) -> &GameConfig;

    fn dimensions(&self) -> MapDimensions;

    fn tile(&self, position: Position) -> Option<Tile>;

    /// All units in deterministic storage order, including dead ones.
    fn units(&self) -> &[UnitState];

    fn site(&self, id: EntityId) -> Option<&SiteState>;

    fn turn(&self) -> &TurnState;

    fn unit(&self, id: EntityId) -> Option<&UnitState> {
        self.units().iter().find(|unit| unit.id == id)
    }

    fn is_out_of_bounds(&self, position: Position) -> bool {
        !self.dimensions().contains(position)
    }

    /// Returns the first non-dead unit whose footprint covers `position`.
    fn top_occupant(&self, position: Position) -> Option<EntityId> {
        let tile = Rect::tile(position);
        self.units()
            .iter()
            .filter(|unit| unit.status != UnitStatus::Dead)
            .find(|unit| Rect::of(unit.position, unit.footprint).intersects(&tile))
            .map(|unit| unit.id)
    }
}

/// Mutable view handed to `on_start`/`on_update`/`on_end`.
///
/// Setters return `false` when the referenced entity or tile no longer exists
/// so callers can skip the effect instead of failing.
pub trait WorldMut: WorldView {
    fn set_health(&mut self, id: EntityId, current: u32, status: UnitStatus) -> bool;

    fn set_position(&mut self, id: EntityId, position: Position) -> bool;

    /// Consumes one action from the unit's turn budget.
    fn spend_action(&mut self, id: EntityId) -> bool;

    fn set_construction_progress(&mut self, id: EntityId, progress: u8) -> bool;

    fn set_tile_owner(&mut self, position: Position, owner: TeamId) -> bool;

    /// Hands the turn to `team` and refills its live units' budgets.
    fn begin_turn(&mut self, team: TeamId, round: u32);
}

impl WorldView for GameState {
    fn config(&self) -> &GameConfig {
        GameState::config(self)
    }

    fn dimensions(&self) -> MapDimensions {
        self.map.dimensions()
    }

    fn tile(&self, position: Position) -> Option<Tile> {
        self.map.tile(position).copied()
    }

    fn units(&self) -> &[UnitState] {
        &self.units
    }

    fn site(&self, id: EntityId) -> Option<&SiteState> {
        GameState::site(self, id)
    }

    fn turn(&self) -> &TurnState {
        &self.turn
    }
}

impl WorldMut for GameState {
    fn set_health(&mut self, id: EntityId, current: u32, status: UnitStatus) -> bool {
        let Some(unit) = self.unit_mut(id) else {
            return false;
        };
        unit.health.current = current.min(unit.health.maximum);
        unit.status = status;
        true
    }

    fn set_position(&mut self, id: EntityId, position: Position) -> bool {
        if !self.map.dimensions().contains(position) {
            return false;
        }
        let Some(unit) = self.unit_mut(id) else {
            return false;
        };
        unit.position = position;
        true
    }

    fn spend_action(&mut self, id: EntityId) -> bool {
        let Some(unit) = self.unit_mut(id) else {
            return false;
        };
        if unit.actions_left == 0 {
            return false;
        }
        unit.actions_left -= 1;
        true
    }

    fn set_construction_progress(&mut self, id: EntityId, progress: u8) -> bool {
        let Some(site) = self.site_mut(id) else {
            return false;
        };
        site.progress = progress.min(site.required_steps);
        true
    }

    fn set_tile_owner(&mut self, position: Position, owner: TeamId) -> bool {
        let Some(tile) = self.map.tile_mut(position) else {
            return false;
        };
        tile.owner = Some(owner);
        true
    }

    fn begin_turn(&mut self, team: TeamId, round: u32) {
        let actions = self.config().actions_per_turn;
        self.turn.active_team = team;
        self.turn.round = round;
        for unit in self.units.iter_mut().filter(|unit| unit.team == team) {
            unit.actions_left = if unit.is_alive() { actions } else { 0 };
        }
    }
}

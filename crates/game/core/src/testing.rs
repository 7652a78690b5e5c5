//! Shared fixtures for unit tests.

use crate::action::{ActionDefinition, Outbox, Request};
use crate::config::GameConfig;
use crate::state::{
    CombatStats, EntityId, GameState, MapDimensions, MovementKind, Position, TeamId, TerrainKind,
    TileMap, TurnState, UnitState,
};

pub(crate) const TICK_MS: u32 = 16;

/// Open plain map with default rules; team 0 acts first.
pub(crate) fn field(width: u32, height: u32) -> GameState {
    GameState::new(
        GameConfig::default(),
        TileMap::filled(MapDimensions::new(width, height), TerrainKind::Plain),
        TurnState::default(),
    )
}

/// Foot unit with move range 3 and a 4 damage, range 1 weapon.
pub(crate) fn trooper(id: u32, team: u8, x: i32, y: i32) -> UnitState {
    UnitState::new(EntityId(id), TeamId(team), Position::new(x, y))
        .with_movement(MovementKind::Foot, 3)
        .with_combat(CombatStats::new(4, 1))
}

pub(crate) fn gunner(id: u32, team: u8, x: i32, y: i32, range: u32) -> UnitState {
    trooper(id, team, x, y).with_combat(CombatStats::new(4, range))
}

/// Runs an enriched request through the full hook sequence on fixed ticks.
pub(crate) fn drive(
    definition: &mut dyn ActionDefinition,
    state: &mut GameState,
    request: &Request,
) -> Outbox {
    let mut outbox = Outbox::new();
    definition.clear();
    definition.on_start(state, request, &mut outbox);
    while !definition.is_finished(&*state, request) {
        definition.on_update(state, request, TICK_MS, &mut outbox);
    }
    definition.on_end(state, request, &mut outbox);
    outbox
}

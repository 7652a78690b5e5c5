//! Shared fixtures for unit tests.

use game_core::state::{CombatStats, Health, MapDimensions, MovementKind, TerrainKind, UnitFlags};
use game_core::{EntityId, GameConfig, GameState, Position, TeamId, TileMap, TurnState, UnitState};

pub(crate) const TICK_MS: u32 = 16;

/// 8x8 plain field: trooper #1 of team 0 at (2, 2) faces trooper #2 of
/// team 1 at (3, 2), which strikes back when attacked. Team 0 acts first.
pub(crate) fn skirmish() -> GameState {
    let mut state = GameState::new(
        GameConfig::default(),
        TileMap::filled(MapDimensions::new(8, 8), TerrainKind::Plain),
        TurnState::new(vec![TeamId(0), TeamId(1)]),
    );
    state
        .add_unit(
            UnitState::new(EntityId(1), TeamId(0), Position::new(2, 2))
                .with_movement(MovementKind::Foot, 3)
                .with_combat(CombatStats::new(4, 1)),
        )
        .unwrap();
    state
        .add_unit(
            UnitState::new(EntityId(2), TeamId(1), Position::new(3, 2))
                .with_movement(MovementKind::Foot, 3)
                .with_health(Health::new(10, 0))
                .with_combat(CombatStats::new(4, 1))
                .with_flags(UnitFlags::COUNTER_ATTACK),
        )
        .unwrap();
    state
}

//! Game configuration constants and tunable parameters.
//!
//! Everything here is read-only once a session starts. The config rides with
//! [`crate::GameState`] so every peer resolves requests against identical rules.

use crate::state::{MovementKind, TeamId, TerrainKind};

/// Rules and timings consumed by validation and the action lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// How long an attack (or counter) keeps the hit state before ending.
    pub hit_duration_ms: u32,
    /// Time spent walking a single tile of a move path.
    pub move_step_ms: u32,
    /// Time spent on one construction step.
    pub construction_step_ms: u32,
    /// How long a fire mission takes to resolve.
    pub fire_mission_ms: u32,
    /// Blast radius around the fire mission target tile.
    pub fire_mission_radius: u32,
    /// Largest attack range of any unit; bounds the attacker candidate pool.
    pub max_attack_range: u32,
    /// Actions each unit receives at the start of its team's turn.
    pub actions_per_turn: u8,
    pub passability: PassabilityTable,
    pub alliances: AllianceTable,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound on units striking a single target together.
    pub const MAX_ATTACKERS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HIT_DURATION_MS: u32 = 500;
    pub const DEFAULT_MOVE_STEP_MS: u32 = 150;
    pub const DEFAULT_CONSTRUCTION_STEP_MS: u32 = 400;
    pub const DEFAULT_FIRE_MISSION_MS: u32 = 900;
    pub const DEFAULT_FIRE_MISSION_RADIUS: u32 = 1;
    pub const DEFAULT_MAX_ATTACK_RANGE: u32 = 6;
    pub const DEFAULT_ACTIONS_PER_TURN: u8 = 1;

    pub fn new() -> Self {
        Self {
            hit_duration_ms: Self::DEFAULT_HIT_DURATION_MS,
            move_step_ms: Self::DEFAULT_MOVE_STEP_MS,
            construction_step_ms: Self::DEFAULT_CONSTRUCTION_STEP_MS,
            fire_mission_ms: Self::DEFAULT_FIRE_MISSION_MS,
            fire_mission_radius: Self::DEFAULT_FIRE_MISSION_RADIUS,
            max_attack_range: Self::DEFAULT_MAX_ATTACK_RANGE,
            actions_per_turn: Self::DEFAULT_ACTIONS_PER_TURN,
            passability: PassabilityTable::default(),
            alliances: AllianceTable::default(),
        }
    }

    /// Returns true when units of `a` and `b` fight on the same side.
    pub fn is_allied(&self, a: TeamId, b: TeamId) -> bool {
        self.alliances.is_allied(a, b)
    }

    /// Returns true when a unit moving as `movement` may stand on `terrain`.
    pub fn is_passable(&self, movement: MovementKind, terrain: TerrainKind) -> bool {
        self.passability.allows(movement, terrain)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the passability table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassabilityRule {
    pub movement: MovementKind,
    pub terrain: Vec<TerrainKind>,
}

/// Terrain each movement class may enter. Missing classes enter nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PassabilityTable {
    pub rules: Vec<PassabilityRule>,
}

impl PassabilityTable {
    pub fn allows(&self, movement: MovementKind, terrain: TerrainKind) -> bool {
        self.rules
            .iter()
            .find(|rule| rule.movement == movement)
            .is_some_and(|rule| rule.terrain.contains(&terrain))
    }
}

impl Default for PassabilityTable {
    fn default() -> Self {
        use TerrainKind::*;

        let rule = |movement, terrain: &[TerrainKind]| PassabilityRule {
            movement,
            terrain: terrain.to_vec(),
        };

        Self {
            rules: vec![
                rule(MovementKind::Foot, &[Plain, Road, Forest, Hill]),
                rule(MovementKind::Wheeled, &[Plain, Road]),
                rule(MovementKind::Tracked, &[Plain, Road, Forest]),
                rule(MovementKind::Flying, &[Plain, Road, Forest, Hill, Water]),
                rule(MovementKind::Naval, &[Water]),
            ],
        }
    }
}

/// Symmetric alliance pairs. Every team is allied with itself.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AllianceTable {
    pub pairs: Vec<(TeamId, TeamId)>,
}

impl AllianceTable {
    pub fn is_allied(&self, a: TeamId, b: TeamId) -> bool {
        a == b
            || self
                .pairs
                .iter()
                .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

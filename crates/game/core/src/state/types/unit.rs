use bitflags::bitflags;

use super::{EntityId, Footprint, Position, TeamId};

/// Movement class used to look up terrain passability.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MovementKind {
    #[default]
    Foot,
    Wheeled,
    Tracked,
    Flying,
    Naval,
}

bitflags! {
    /// Capability and rule flags carried by a unit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitFlags: u16 {
        /// Passes over other units while moving.
        const FLYING         = 1 << 0;
        /// Two cloaked units may pass through each other.
        const CLOAKED        = 1 << 1;
        /// Refuses to step onto enemy-held ground.
        const COWARD         = 1 << 2;
        /// Drops to `Down` instead of dying unless the hit is fatal.
        const REVIVABLE      = 1 << 3;
        /// Its hits are fatal (no revive).
        const BULLDOZER      = 1 << 4;
        /// Strikes back at the weakest attacker after surviving an attack.
        const COUNTER_ATTACK = 1 << 5;
        /// Fires at enemies that finish a move inside its range.
        const COUNTER_MOVE   = 1 << 6;
        /// May work on construction sites.
        const BUILDER        = 1 << 7;
        /// May call fire missions.
        const ARTILLERY      = 1 << 8;
    }
}

/// Life state of a unit. Only `Idle` units are alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum UnitStatus {
    #[default]
    Idle,
    Down,
    Dead,
}

/// Health component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    pub current: u32,
    pub maximum: u32,
    pub armor: u32,
}

impl Health {
    pub const fn new(maximum: u32, armor: u32) -> Self {
        Self {
            current: maximum,
            maximum,
            armor,
        }
    }
}

/// Attack-capable component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub damage: u32,
    /// Direct attack reach in tiles around the footprint.
    pub range: u32,
    /// Fire mission reach in tiles; only meaningful for artillery.
    pub fire_range: u32,
}

impl CombatStats {
    pub const fn new(damage: u32, range: u32) -> Self {
        Self {
            damage,
            range,
            fire_range: 0,
        }
    }

    pub const fn with_fire_range(mut self, fire_range: u32) -> Self {
        self.fire_range = fire_range;
        self
    }
}

/// A unit placed on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: EntityId,
    pub team: TeamId,
    pub position: Position,
    pub footprint: Footprint,
    pub movement: MovementKind,
    pub move_range: u32,
    pub health: Health,
    pub combat: Option<CombatStats>,
    pub flags: UnitFlags,
    pub status: UnitStatus,
    pub actions_left: u8,
}

impl UnitState {
    /// Creates a foot unit with a single action and no combat component.
    pub fn new(id: EntityId, team: TeamId, position: Position) -> Self {
        Self {
            id,
            team,
            position,
            footprint: Footprint::SINGLE,
            movement: MovementKind::Foot,
            move_range: 0,
            health: Health::new(10, 0),
            combat: None,
            flags: UnitFlags::empty(),
            status: UnitStatus::Idle,
            actions_left: 1,
        }
    }

    pub fn with_movement(mut self, movement: MovementKind, move_range: u32) -> Self {
        self.movement = movement;
        self.move_range = move_range;
        self
    }

    pub fn with_health(mut self, health: Health) -> Self {
        self.health = health;
        self
    }

    pub fn with_combat(mut self, combat: CombatStats) -> Self {
        self.combat = Some(combat);
        self
    }

    pub fn with_flags(mut self, flags: UnitFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = footprint;
        self
    }

    pub fn with_actions(mut self, actions_left: u8) -> Self {
        self.actions_left = actions_left;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.status == UnitStatus::Idle && self.health.current > 0
    }

    pub fn has(&self, flags: UnitFlags) -> bool {
        self.flags.contains(flags)
    }
}

//! Scenario loader.
//!
//! A scenario names a map file, the team rotation, and the units and
//! construction sites placed at session start.

use std::path::Path;

use game_core::GameConfig;
use game_core::state::{
    CombatStats, EntityId, Footprint, GameState, Health, MovementKind, Position, SiteState,
    TeamId, TileMap, TurnState, UnitFlags, UnitState,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, MapLoader, read_file};

/// Scenario file contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Map file path, relative to the scenario file.
    pub map: String,
    pub turn_order: Vec<TeamId>,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub sites: Vec<SiteSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: u32,
    pub team: TeamId,
    pub position: Position,
    #[serde(default)]
    pub footprint: Footprint,
    #[serde(default)]
    pub movement: MovementKind,
    #[serde(default)]
    pub move_range: u32,
    pub health: HealthSpec,
    #[serde(default)]
    pub combat: Option<CombatSpec>,
    #[serde(default)]
    pub flags: UnitFlags,
    /// Starting actions; defaults to the configured per-turn budget.
    #[serde(default)]
    pub actions: Option<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthSpec {
    pub max: u32,
    #[serde(default)]
    pub armor: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CombatSpec {
    pub damage: u32,
    pub range: u32,
    #[serde(default)]
    pub fire_range: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSpec {
    pub id: u32,
    pub team: TeamId,
    pub position: Position,
    #[serde(default)]
    pub footprint: Footprint,
    pub required_steps: u8,
}

impl UnitSpec {
    fn build(&self, config: &GameConfig) -> UnitState {
        let mut unit = UnitState::new(EntityId(self.id), self.team, self.position)
            .with_footprint(self.footprint)
            .with_movement(self.movement, self.move_range)
            .with_health(Health::new(self.health.max, self.health.armor))
            .with_flags(self.flags)
            .with_actions(self.actions.unwrap_or(config.actions_per_turn));
        if let Some(combat) = self.combat {
            unit = unit.with_combat(
                CombatStats::new(combat.damage, combat.range).with_fire_range(combat.fire_range),
            );
        }
        unit
    }
}

impl ScenarioSpec {
    /// Assembles the initial state on `map` under `config`.
    pub fn build(&self, config: GameConfig, map: TileMap) -> LoadResult<GameState> {
        if self.turn_order.is_empty() {
            anyhow::bail!("Scenario turn order is empty");
        }

        let units: Vec<UnitState> = self.units.iter().map(|spec| spec.build(&config)).collect();
        let mut state = GameState::new(config, map, TurnState::new(self.turn_order.clone()));
        for unit in units {
            let id = unit.id;
            state
                .add_unit(unit)
                .map_err(|e| anyhow::anyhow!("Failed to place unit {}: {}", id, e))?;
        }
        for spec in &self.sites {
            let mut site = SiteState::new(
                EntityId(spec.id),
                spec.team,
                spec.position,
                spec.required_steps,
            );
            site.footprint = spec.footprint;
            state
                .add_site(site)
                .map_err(|e| anyhow::anyhow!("Failed to place site {}: {}", spec.id, e))?;
        }
        Ok(state)
    }
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario and its map into a ready-to-run [`GameState`].
    pub fn load(path: &Path, config: GameConfig) -> LoadResult<GameState> {
        let spec = Self::parse(&read_file(path)?)?;
        let map_path = path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&spec.map);
        let map = MapLoader::load(&map_path)?;
        spec.build(config, map)
    }

    /// Parse scenario data from RON text.
    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))
    }
}

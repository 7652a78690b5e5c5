pub mod common;
pub mod site;
pub mod turn;
pub mod unit;
pub mod world;

pub use common::{EntityId, Footprint, Position, Step, TeamId};
pub use site::SiteState;
pub use turn::TurnState;
pub use unit::{CombatStats, Health, MovementKind, UnitFlags, UnitState, UnitStatus};
pub use world::{MapDimensions, TerrainKind, Tile, TileMap};

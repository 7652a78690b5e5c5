//! Deterministic rules of the tactics action engine.
//!
//! `game-core` defines the canonical data (units, sites, tiles, requests) and
//! the pure logic every peer must agree on: spatial queries, reachability and
//! targeting, outcome computation, and the per-kind action definitions. It
//! performs no I/O and keeps no clock; the runtime crate owns scheduling.
//!
//! World access goes through the [`WorldView`] and [`WorldMut`] traits so the
//! rules can be exercised against any store, including test doubles.
pub mod action;
pub mod combat;
pub mod config;
pub mod error;
pub mod spatial;
pub mod state;
pub mod targeting;
pub mod view;

#[cfg(test)]
mod testing;

pub use action::{
    ActionDefinition, ActionError, ActionKind, Cue, Outbox, Request, default_definitions,
    verify_replayable,
};
pub use combat::{Outcome, ResultState, compute_outcome, total_damage};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError};
pub use spatial::{FillNode, NodeState, Rect, flood_fill, rect_intersect};
#[cfg(feature = "serde")]
pub use state::state_root;
pub use state::{
    EntityId, GameState, Position, SiteState, StateError, Step, TeamId, TileMap, TurnState,
    UnitState,
};
pub use targeting::{extract_path, generate_reachable_tiles, get_attackers};
pub use view::{WorldMut, WorldView};

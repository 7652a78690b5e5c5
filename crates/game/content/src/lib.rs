//! Data-driven content loaders.
//!
//! This crate turns data files into game-core values before a session starts:
//! - Game rules (durations, ranges, passability, alliances) from TOML
//! - Map layouts (terrain and held ground) from RON
//! - Scenarios (map reference, turn order, units, sites) from RON
//!
//! Loaded content is read-only for the lifetime of a session.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LoadResult, MapLoader, ScenarioLoader, ScenarioSpec, SiteSpec,
    UnitSpec,
};

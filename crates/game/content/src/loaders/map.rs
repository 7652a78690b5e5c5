//! Map data loader.
//!
//! Loads terrain and held ground from map RON files. Units and sites are
//! placed separately by scenario files.

use std::path::Path;

use game_core::TeamId;
use game_core::state::{MapDimensions, Position, TerrainKind, TileMap};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    dimensions: (u32, u32),
    #[serde(default)]
    default: TerrainKind,
    #[serde(default)]
    tiles: Vec<(i32, i32, TerrainKind)>, // (x, y, terrain)
    #[serde(default)]
    held: Vec<(i32, i32, TeamId)>, // (x, y, owner)
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load map data from a RON file.
    pub fn load(path: &Path) -> LoadResult<TileMap> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse map data from RON text.
    ///
    /// Every tile starts as `default` terrain; `tiles` and `held` override
    /// individual positions.
    pub fn parse(content: &str) -> LoadResult<TileMap> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let dimensions = MapDimensions::new(data.dimensions.0, data.dimensions.1);
        let mut map = TileMap::filled(dimensions, data.default);

        for (x, y, terrain) in data.tiles {
            let tile = map
                .tile_mut(Position::new(x, y))
                .ok_or_else(|| anyhow::anyhow!("Tile ({}, {}) is outside the map", x, y))?;
            tile.terrain = terrain;
        }
        for (x, y, owner) in data.held {
            let tile = map
                .tile_mut(Position::new(x, y))
                .ok_or_else(|| anyhow::anyhow!("Held tile ({}, {}) is outside the map", x, y))?;
            tile.owner = Some(owner);
        }

        Ok(map)
    }
}

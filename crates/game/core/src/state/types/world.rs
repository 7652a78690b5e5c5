use super::{Position, TeamId};

/// Canonical terrain classes for map tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Plain,
    Road,
    Forest,
    Hill,
    Water,
    Wall,
    Custom(u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Runtime descriptor of one tile: base terrain plus the team holding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub terrain: TerrainKind,
    pub owner: Option<TeamId>,
}

impl Tile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            owner: None,
        }
    }

    pub const fn held_by(mut self, team: TeamId) -> Self {
        self.owner = Some(team);
        self
    }
}

/// Row-major tile grid of the active map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    dimensions: MapDimensions,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Creates a map filled with a single terrain kind.
    pub fn filled(dimensions: MapDimensions, terrain: TerrainKind) -> Self {
        let len = (dimensions.width * dimensions.height) as usize;
        Self {
            dimensions,
            tiles: vec![Tile::new(terrain); len],
        }
    }

    /// Creates a map from explicit rows. Returns `None` on ragged input.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Option<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.len()) as u32;
        if rows.iter().any(|row| row.len() as u32 != width) {
            return None;
        }
        Some(Self {
            dimensions: MapDimensions::new(width, height),
            tiles: rows.into_iter().flatten().collect(),
        })
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.index(position).map(|index| &self.tiles[index])
    }

    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.index(position).map(move |index| &mut self.tiles[index])
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions.contains(position).then(|| {
            position.y as usize * self.dimensions.width as usize + position.x as usize
        })
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::filled(MapDimensions::new(0, 0), TerrainKind::Plain)
    }
}

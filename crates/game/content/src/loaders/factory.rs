//! Content factory for loading a session's content from a data directory.

use std::path::{Path, PathBuf};

use game_core::{GameConfig, GameState};

use crate::loaders::{ConfigLoader, LoadResult, ScenarioLoader};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── scenarios/
/// │   └── skirmish.ron
/// └── maps/
///     └── crossing.ron
/// ```
///
/// Scenario files reference maps relative to themselves, e.g.
/// `map: "../maps/crossing.ron"`.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load `scenarios/<name>.ron` under the directory's `config.toml`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<GameState> {
        let config = self.load_config()?;
        let path = self.data_dir.join("scenarios").join(format!("{name}.ron"));
        ScenarioLoader::load(&path, config)
    }
}

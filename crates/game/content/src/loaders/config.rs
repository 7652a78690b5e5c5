//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`GameConfig::default`].
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use game_core::TeamId;
    use game_core::state::{MovementKind, TerrainKind};

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("hit_duration_ms = 250\nmax_attack_range = 4\n").unwrap();

        assert_eq!(config.hit_duration_ms, 250);
        assert_eq!(config.max_attack_range, 4);
        assert_eq!(config.move_step_ms, GameConfig::DEFAULT_MOVE_STEP_MS);
        assert!(config.is_passable(MovementKind::Foot, TerrainKind::Forest));
    }

    #[test]
    fn tables_are_read_from_arrays() {
        let config = ConfigLoader::parse(
            r#"
actions_per_turn = 2
alliances = [[0, 2]]

[[passability]]
movement = "Naval"
terrain = ["Water", "Road"]
"#,
        )
        .unwrap();

        assert_eq!(config.actions_per_turn, 2);
        assert!(config.is_allied(TeamId(2), TeamId(0)));
        assert!(config.is_passable(MovementKind::Naval, TerrainKind::Road));
        assert!(!config.is_passable(MovementKind::Foot, TerrainKind::Plain));
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let error = ConfigLoader::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }
}

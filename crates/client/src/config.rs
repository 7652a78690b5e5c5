//! Headless client configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Where session content lives and what to play.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub scenario: String,
    /// JSON lines file of raw requests to submit in order.
    pub script: Option<PathBuf>,
    /// Directory receiving the accepted request log.
    pub record_dir: Option<PathBuf>,
    pub message_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            scenario: "skirmish".to_string(),
            script: None,
            record_dir: None,
            message_capacity: 64,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_DATA_DIR` - Content directory (default: `data`)
    /// - `TACTICS_SCENARIO` - Scenario name under `scenarios/` (default: `skirmish`)
    /// - `TACTICS_SCRIPT` - Request script (default: `<data>/scripts/opening.jsonl`)
    /// - `TACTICS_RECORD_DIR` - Record accepted requests to `<dir>/requests.log`
    /// - `TACTICS_MESSAGE_CAPACITY` - Message log capacity (default: 64)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("TACTICS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(scenario) = env::var("TACTICS_SCENARIO") {
            config.scenario = scenario;
        }
        config.script = Some(
            env::var("TACTICS_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| config.data_dir.join("scripts").join("opening.jsonl")),
        );
        config.record_dir = env::var("TACTICS_RECORD_DIR").ok().map(PathBuf::from);
        if let Some(capacity) = read_env::<usize>("TACTICS_MESSAGE_CAPACITY") {
            config.message_capacity = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

//! Headless tactics client.
//!
//! Plays a request script against a locally authoritative runtime and prints
//! what happened.
//!
//! ```bash
//! TACTICS_SCENARIO=skirmish RUST_LOG=runtime=debug cargo run -p tactics-client
//! ```

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use game_content::ContentFactory;
use runtime::{RequestLog, Runtime, RuntimeConfig};
use tactics_client::{ClientConfig, MessageLevel, Session};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    let factory = ContentFactory::new(config.data_dir.clone());
    let state = factory
        .load_scenario(&config.scenario)
        .with_context(|| format!("failed to load scenario '{}'", config.scenario))?;

    // No transport is wired here, so this peer always owns the queue.
    let runtime_config = RuntimeConfig {
        authoritative: true,
        ..RuntimeConfig::from_env()
    };

    let mut builder = Runtime::builder().config(runtime_config).initial_state(state);
    if let Some(dir) = &config.record_dir {
        let log = RequestLog::create(dir, "requests.log")?;
        info!(path = %log.path().display(), "recording accepted requests");
        builder = builder.request_log(log);
    }
    let runtime = builder.build().await?;

    let requests = match &config.script {
        Some(path) => RequestLog::read_all(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => Vec::new(),
    };
    info!(scenario = %config.scenario, requests = requests.len(), "playing script");

    let mut session = Session::new(runtime.handle(), config.message_capacity);
    let summary = session.play_all(requests).await?;

    for entry in session.messages().iter() {
        match entry.level {
            MessageLevel::Info => println!("{}", entry.text),
            MessageLevel::Warning => println!("! {}", entry.text),
            MessageLevel::Error => println!("!! {}", entry.text),
        }
    }
    info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        "script finished"
    );

    drop(session);
    runtime.shutdown().await?;
    Ok(())
}

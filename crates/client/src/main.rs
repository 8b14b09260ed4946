//! Skirmish headless battle simulator.
//!
//! Loads a weapon catalog, a battle session, and battle rules, then runs the
//! battle with an all-in autopilot on the player side and logs every event.
//!
//! # Examples
//!
//! ```bash
//! # Bundled content, fast presentation
//! SKIRMISH_COUNTDOWN_MS=0 SKIRMISH_REVEAL_MS=0 cargo run -p skirmish-client
//!
//! # Custom rosters with event tracing
//! RUST_LOG=runtime=trace SKIRMISH_SESSION=arena.ron cargo run -p skirmish-client
//! ```

mod config;
mod report;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use battle_content::{CatalogLoader, ConfigLoader, SessionLoader};
use battle_core::{AllInAttack, BattleConfig};
use battle_runtime::{BattleOutcome, BattleRuntime, PolicyProvider, RuntimeConfig};

use config::ClientConfig;

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
    tracing::debug!(?config, "client configuration");

    let catalog = CatalogLoader::load(&config.catalog_path)?;
    let session = SessionLoader::load(&config.session_path)?;
    let battle = if config.config_path.exists() {
        ConfigLoader::load(&config.config_path)?
    } else {
        tracing::info!(
            path = %config.config_path.display(),
            "no battle config found; using defaults"
        );
        BattleConfig::default()
    };

    let mut runtime_config = RuntimeConfig {
        battle,
        ..RuntimeConfig::default()
    };
    if let Some(countdown) = config.countdown {
        runtime_config.countdown = countdown;
    }
    if let Some(reveal_delay) = config.reveal_delay {
        runtime_config.reveal_delay = reveal_delay;
    }

    let runtime = BattleRuntime::builder()
        .session(session)
        .catalog(catalog)
        .config(runtime_config)
        .player_provider(PolicyProvider::new(AllInAttack))
        .build()
        .await
        .context("failed to set up battle")?;

    let mut events = runtime.subscribe_events();
    let reporter = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    tracing::info!(
                        target: "skirmish",
                        seq = event.sequence,
                        "{}",
                        report::describe(&event.event)
                    );
                    if event.event.is_terminal() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "skirmish", skipped, "event log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let outcome = runtime.run().await?;
    reporter.await.context("event reporter panicked")?;

    match outcome {
        BattleOutcome::Victory(winner) => println!("{winner} side wins"),
        BattleOutcome::Aborted => println!("battle aborted"),
    }

    Ok(())
}

//! Tick binary for the colony decision core.
//!
//! The host recreates this process every tick. Each run loads the world
//! snapshot and the persisted agent records the host wrote, decides every
//! facility's and agent's action, and leaves behind the accepted intents
//! and the updated records for the host to commit.
//!
//! # Run Sequence
//!
//! 1. Load configuration from `colony-config.yaml` (or `COLONY_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Read the snapshot and memory files named in `host`
//! 4. Run one tick
//! 5. Write intents and memory, print the tick summary as JSON

mod error;

use std::path::PathBuf;

use colony_core::config::ColonyConfig;
use colony_core::tick::run_host_tick;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, resolved against the working directory.
const DEFAULT_CONFIG_PATH: &str = "colony-config.yaml";

fn main() -> Result<(), EngineError> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        snapshot = %config.host.snapshot_path.display(),
        memory = %config.host.memory_path.display(),
        reconcile_phase = ?config.memory.reconcile_phase,
        "colony-tick starting"
    );

    let summary = run_host_tick(&config.host, &config)?;
    for decision in &summary.decisions {
        debug!(
            agent = %decision.agent,
            role = %decision.role,
            before = %decision.before,
            after = %decision.after,
            action = ?decision.action,
            movement = ?decision.movement,
            "decision"
        );
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Load configuration, falling back to defaults when no file exists.
fn load_config() -> Result<ColonyConfig, EngineError> {
    let path = std::env::var("COLONY_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        Ok(ColonyConfig::from_file(&path)?)
    } else {
        Ok(ColonyConfig::default())
    }
}

/// `COLONY_LOG`, then `RUST_LOG`, then `logging.level`.
fn log_filter(config: &ColonyConfig) -> EnvFilter {
    EnvFilter::try_from_env("COLONY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
}

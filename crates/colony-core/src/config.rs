//! Configuration loading and typed config structures for the colony.
//!
//! The canonical configuration lives in `colony-config.yaml` next to the
//! tick binary. Every section and field is optional; anything omitted
//! takes the default documented on its field.

use std::path::{Path, PathBuf};

use colony_agents::{BehaviorConfig, DEFAULT_ATTACK_MARKER, DEFAULT_GUARD_RADIUS};
use colony_types::Role;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level colony configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ColonyConfig {
    /// Desired population per role.
    #[serde(default)]
    pub quotas: RoleQuotas,

    /// Production facility settings.
    #[serde(default)]
    pub spawning: SpawningConfig,

    /// Attacker behavior.
    #[serde(default)]
    pub attack: AttackConfig,

    /// Persisted-state housekeeping.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// File locations used by the tick binary.
    #[serde(default)]
    pub host: HostConfig,
}

impl ColonyConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override the host file locations:
    /// - `COLONY_SNAPSHOT` overrides `host.snapshot_path`
    /// - `COLONY_MEMORY` overrides `host.memory_path`
    /// - `COLONY_INTENTS` overrides `host.intents_path`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.host.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document is a valid, all-default config.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Role behavior tunables derived from this config.
    pub fn behavior(&self) -> BehaviorConfig {
        BehaviorConfig {
            attack_marker: self.attack.marker_name.clone(),
            guard_radius: self.attack.guard_radius,
        }
    }
}

/// Desired live population per role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleQuotas {
    /// Harvesters.
    #[serde(default = "default_harvesters")]
    pub harvester: u32,

    /// Upgraders.
    #[serde(default = "default_upgraders")]
    pub upgrader: u32,

    /// Builders.
    #[serde(default = "default_builders")]
    pub builder: u32,

    /// Maintainers.
    #[serde(default = "default_maintainers")]
    pub maintainer: u32,

    /// Attackers.
    #[serde(default = "default_attackers")]
    pub attacker: u32,
}

impl RoleQuotas {
    /// The quota for one role.
    pub const fn quota(&self, role: Role) -> u32 {
        match role {
            Role::Harvester => self.harvester,
            Role::Upgrader => self.upgrader,
            Role::Builder => self.builder,
            Role::Maintainer => self.maintainer,
            Role::Attacker => self.attacker,
        }
    }
}

impl Default for RoleQuotas {
    fn default() -> Self {
        Self {
            harvester: default_harvesters(),
            upgrader: default_upgraders(),
            builder: default_builders(),
            maintainer: default_maintainers(),
            attacker: default_attackers(),
        }
    }
}

/// Production facility settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpawningConfig {
    /// Completed extensions required before attackers are produced.
    #[serde(default = "default_attacker_extension_threshold")]
    pub attacker_extension_threshold: usize,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            attacker_extension_threshold: default_attacker_extension_threshold(),
        }
    }
}

/// Attacker behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttackConfig {
    /// Name of the marker designating a structure to attack.
    #[serde(default = "default_marker_name")]
    pub marker_name: String,

    /// Range from the home facility a waiting attacker stays within.
    #[serde(default = "default_guard_radius")]
    pub guard_radius: u32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            marker_name: default_marker_name(),
            guard_radius: default_guard_radius(),
        }
    }
}

/// When dead agents' records are garbage-collected within a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePhase {
    /// Before spawning, at the very start of the tick.
    #[default]
    BeforeSpawn,
    /// After every agent has been evaluated.
    AfterAgents,
}

/// Persisted-state housekeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Where in the tick the reconciler runs.
    #[serde(default)]
    pub reconcile_phase: ReconcilePhase,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// File locations used by the tick binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    /// World snapshot JSON written by the host at tick start.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Persisted agent records, read at tick start and rewritten at the end.
    #[serde(default = "default_memory_path")]
    pub memory_path: PathBuf,

    /// Where accepted intents are written for the host to commit.
    #[serde(default = "default_intents_path")]
    pub intents_path: PathBuf,
}

impl HostConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("COLONY_SNAPSHOT") {
            self.snapshot_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("COLONY_MEMORY") {
            self.memory_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("COLONY_INTENTS") {
            self.intents_path = PathBuf::from(path);
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            memory_path: default_memory_path(),
            intents_path: default_intents_path(),
        }
    }
}

const fn default_harvesters() -> u32 {
    3
}

const fn default_upgraders() -> u32 {
    2
}

const fn default_builders() -> u32 {
    4
}

const fn default_maintainers() -> u32 {
    2
}

const fn default_attackers() -> u32 {
    2
}

const fn default_attacker_extension_threshold() -> usize {
    4
}

fn default_marker_name() -> String {
    DEFAULT_ATTACK_MARKER.to_owned()
}

const fn default_guard_radius() -> u32 {
    DEFAULT_GUARD_RADIUS
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("snapshot.json")
}

fn default_memory_path() -> PathBuf {
    PathBuf::from("memory.json")
}

fn default_intents_path() -> PathBuf {
    PathBuf::from("intents.json")
}

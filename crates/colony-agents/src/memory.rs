//! Persisted per-agent state.
//!
//! The host keeps one [`AgentRecord`] per agent name across ticks. The core
//! reaches it only through [`MemoryStore`], passing the agent's name
//! explicitly; nothing is cached between ticks.

use std::collections::BTreeMap;
use std::path::Path;

use colony_types::{AgentName, AgentRecord};

use crate::error::StoreError;

/// Keyed access to persisted agent records.
pub trait MemoryStore {
    /// The record for `name`, if one is persisted.
    fn get(&self, name: &AgentName) -> Option<&AgentRecord>;

    /// Insert or replace the record for `name`.
    fn set(&mut self, name: &AgentName, record: AgentRecord);

    /// Remove the record for `name`. Returns whether one existed.
    fn delete(&mut self, name: &AgentName) -> bool;

    /// Every persisted name, in key order.
    fn names(&self) -> Vec<AgentName>;
}

/// A [`MemoryStore`] backed by an ordered map.
///
/// Serializes as a plain JSON object keyed by agent name, which is the
/// layout the host persists between ticks.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct InMemoryStore {
    records: BTreeMap<AgentName, AgentRecord>,
}

impl InMemoryStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Parse a store from its JSON object form.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a file. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write to a file, replacing its contents.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Number of persisted records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are persisted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MemoryStore for InMemoryStore {
    fn get(&self, name: &AgentName) -> Option<&AgentRecord> {
        self.records.get(name)
    }

    fn set(&mut self, name: &AgentName, record: AgentRecord) {
        self.records.insert(name.clone(), record);
    }

    fn delete(&mut self, name: &AgentName) -> bool {
        self.records.remove(name).is_some()
    }

    fn names(&self) -> Vec<AgentName> {
        self.records.keys().cloned().collect()
    }
}

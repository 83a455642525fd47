//! JSON persistence format for Q-tables.
//!
//! A saved table is one JSON document holding the action space, the
//! hyperparameters, the scheduler step and one row per visited state:
//!
//! ```text
//! {"version":1,"actions":["rock","paper","scissors"],"config":{...},"step":3,
//!  "q":{"\"rock\"":{"paper":0.19}}}
//! ```
//!
//! Older files written with flat `"state|action": value` keys, or without
//! `actions`, `config` or `step`, are still accepted. Flat keys carry the
//! bare state label (`START|heads`), which is re-encoded as a string key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Result,
    app::QConfig,
    error::Error,
    q_learning::{
        agent::QLearningAgent,
        q_table::QTable,
        state_key::{StateValue, encode},
    },
    types::{Action, ActionSpace, StateKey},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum SavedEntry {
    Row(BTreeMap<Action, f64>),
    Flat(f64),
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedDocument {
    #[serde(default = "SavedQTable::current_version")]
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actions: Option<ActionSpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<QConfig>,
    #[serde(default)]
    step: u64,
    #[serde(default)]
    q: BTreeMap<String, SavedEntry>,
}

/// A decoded table together with whatever configuration was stored with it.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedQTable {
    pub version: u32,
    pub actions: Option<ActionSpace>,
    pub config: Option<QConfig>,
    pub step: u64,
    pub table: QTable,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    fn current_version() -> u32 {
        Self::VERSION
    }

    pub fn from_agent(agent: &QLearningAgent) -> Self {
        Self {
            version: Self::VERSION,
            actions: Some(agent.actions().clone()),
            config: Some(agent.config().clone()),
            step: agent.step(),
            table: agent.q_table().clone(),
        }
    }

    /// Rebuild an agent, filling in anything the file did not record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the stored action space is not
    /// `default_actions`, or if the table holds actions outside it.
    pub fn into_agent(
        self,
        default_actions: &ActionSpace,
        default_config: &QConfig,
    ) -> Result<QLearningAgent> {
        if let Some(stored) = &self.actions
            && stored != default_actions
        {
            return Err(Error::decode(format!(
                "stored actions {:?} do not match {:?}",
                stored.as_slice(),
                default_actions.as_slice()
            )));
        }
        let actions = default_actions.clone();
        let config = self.config.unwrap_or_else(|| default_config.clone());

        if let Some((state, action, _)) = self
            .table
            .iter()
            .find(|(_, action, _)| !actions.contains(action))
        {
            return Err(Error::decode(format!(
                "entry for state {state} uses action '{action}' outside the action space"
            )));
        }

        QLearningAgent::from_parts(actions, config, self.table, self.step)
    }

    /// Write the table as a JSON document.
    pub fn to_json(&self) -> Result<String> {
        let mut q: BTreeMap<String, SavedEntry> = BTreeMap::new();
        for (state, action, value) in self.table.iter() {
            let entry = q
                .entry(state.as_str().to_string())
                .or_insert_with(|| SavedEntry::Row(BTreeMap::new()));
            if let SavedEntry::Row(row) = entry {
                row.insert(action.clone(), value);
            }
        }

        let document = SavedDocument {
            version: self.version,
            actions: self.actions.clone(),
            config: self.config.clone(),
            step: self.step,
            q,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for malformed JSON, an unsupported version,
    /// an invalid stored configuration or a flat key without a `|` separator.
    pub fn from_json(text: &str) -> Result<Self> {
        let document: SavedDocument =
            serde_json::from_str(text).map_err(|e| Error::decode(e.to_string()))?;

        if document.version != Self::VERSION {
            return Err(Error::decode(format!(
                "unsupported save format version {}, expected {}",
                document.version,
                Self::VERSION
            )));
        }

        if let Some(config) = &document.config {
            config
                .validate()
                .map_err(|e| Error::decode(format!("stored config rejected: {e}")))?;
        }

        let mut table = QTable::new();
        for (key, entry) in document.q {
            match entry {
                SavedEntry::Row(row) => {
                    let state = row_state_key(&key)?;
                    for (action, value) in row {
                        table.set(state.clone(), action, value);
                    }
                }
                SavedEntry::Flat(value) => {
                    let (state, action) = key.rsplit_once('|').ok_or_else(|| {
                        Error::decode(format!("flat key '{key}' has no '|' separator"))
                    })?;
                    table.set(flat_state_key(state)?, Action::from(action), value);
                }
            }
        }

        Ok(Self {
            version: document.version,
            actions: document.actions,
            config: document.config,
            step: document.step,
            table,
        })
    }
}

/// Row keys are JSON; re-encoding makes `[0, 1]` and `[0,1]` the same row.
/// Text that is not JSON at all is taken as a string label.
fn row_state_key(text: &str) -> Result<StateKey> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => canonical_key(value),
        Err(_) => encode(text),
    }
}

/// Flat keys hold bare labels, so only quoted strings, arrays and objects
/// are read as JSON. `3|4` is the string state "3".
fn flat_state_key(text: &str) -> Result<StateKey> {
    if text.starts_with(['"', '[', '{'])
        && let Ok(value) = serde_json::from_str::<Value>(text)
    {
        return canonical_key(value);
    }
    encode(text)
}

fn canonical_key(value: Value) -> Result<StateKey> {
    StateValue::try_from(value)
        .and_then(|value| encode(&value))
        .map_err(|e| Error::decode(format!("unusable state key: {e}")))
}

/// Serialize an agent's table, configuration and step counter.
pub fn serialize(agent: &QLearningAgent) -> Result<String> {
    SavedQTable::from_agent(agent).to_json()
}

/// Parse a saved table. Fails with [`Error::Decode`] on malformed input.
pub fn deserialize(text: &str) -> Result<SavedQTable> {
    SavedQTable::from_json(text)
}

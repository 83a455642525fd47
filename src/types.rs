//! Newtype wrappers for improved type safety and domain modeling.

use std::{collections::HashSet, fmt, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error};

/// Label of a single action (a move, a guess, a direction or a board cell).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    /// Create a new action label.
    pub fn new(label: impl Into<String>) -> Self {
        Action(label.into())
    }

    /// Get the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Action {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Action {
    fn from(label: &str) -> Self {
        Action(label.to_string())
    }
}

impl From<String> for Action {
    fn from(label: String) -> Self {
        Action(label)
    }
}

impl From<usize> for Action {
    fn from(index: usize) -> Self {
        Action(index.to_string())
    }
}

/// The fixed, ordered set of actions a table is built for.
///
/// An action space is never empty and never contains the same label twice.
/// It cannot be changed after construction; the agent that owns it keeps it
/// for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionSpace(Vec<Action>);

impl ActionSpace {
    /// Build an action space from labels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the list is empty or has duplicates.
    pub fn new<I, A>(actions: I) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        let actions: Vec<Action> = actions.into_iter().map(Into::into).collect();
        if actions.is_empty() {
            return Err(Error::config("action space must not be empty"));
        }

        let mut seen = HashSet::with_capacity(actions.len());
        for action in &actions {
            if !seen.insert(action) {
                return Err(Error::config(format!(
                    "duplicate action '{action}' in action space"
                )));
            }
        }

        Ok(ActionSpace(actions))
    }

    /// Build from labels known to be valid, without validation.
    ///
    /// Only use with fixed per-game label lists.
    pub(crate) fn from_known<I, A>(actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        let actions: Vec<Action> = actions.into_iter().map(Into::into).collect();
        debug_assert!(ActionSpace::new(actions.clone()).is_ok());
        ActionSpace(actions)
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.0.contains(action)
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }
}

impl Deref for ActionSpace {
    type Target = [Action];

    fn deref(&self) -> &[Action] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ActionSpace {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let actions = Vec::<Action>::deserialize(deserializer)?;
        ActionSpace::new(actions).map_err(serde::de::Error::custom)
    }
}

/// A canonical, hashable encoding of a game state.
///
/// Produced by [`crate::q_learning::state_key::encode`]; semantically equal
/// states always share the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Wrap an already canonical key, e.g. one read back from storage.
    pub(crate) fn from_raw(key: impl Into<String>) -> Self {
        StateKey(key.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

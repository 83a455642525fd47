//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use rand::{Rng, seq::IndexedRandom};

use crate::{
    Result,
    error::Error,
    types::{Action, StateKey},
};

/// Pick the highest-valued candidate, breaking ties uniformly at random.
///
/// `values[i]` is the estimate for `candidates[i]`. Every maximiser is
/// equally likely to be returned, so equal estimates never bias the policy
/// toward whichever action happens to be listed first.
///
/// # Errors
///
/// Returns [`Error::EmptyActionSet`] if there are no candidates, or
/// [`Error::InvalidValue`] if a value is NaN (which only overflowing
/// updates can produce).
pub fn tie_broken_argmax<R: Rng + ?Sized>(
    candidates: &[Action],
    values: &[f64],
    rng: &mut R,
) -> Result<(Action, f64)> {
    debug_assert_eq!(candidates.len(), values.len());
    if candidates.is_empty() {
        return Err(Error::EmptyActionSet);
    }
    if let Some((action, _)) = candidates
        .iter()
        .zip(values)
        .find(|(_, value)| value.is_nan())
    {
        return Err(Error::InvalidValue {
            action: action.to_string(),
        });
    }

    let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let maximisers: Vec<&Action> = candidates
        .iter()
        .zip(values)
        .filter(|(_, value)| **value == max_value)
        .map(|(action, _)| action)
        .collect();

    let action = maximisers.choose(rng).ok_or(Error::EmptyActionSet)?;
    Ok(((*action).clone(), max_value))
}

/// Q-table mapping (state, action) pairs to Q-values
///
/// Unseen pairs read as `0.0`. Rows are created on first write and never
/// evicted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: HashMap<StateKey, HashMap<Action, f64>>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &StateKey, action: &Action) -> f64 {
        self.rows
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.rows.entry(state).or_default().insert(action, value);
    }

    /// Q-values for every candidate, in candidate order
    pub fn values(&self, state: &StateKey, candidates: &[Action]) -> Vec<f64> {
        candidates
            .iter()
            .map(|action| self.get(state, action))
            .collect()
    }

    /// Get maximum Q-value over the given actions in a state
    ///
    /// Returns `None` when there are no actions to maximise over.
    pub fn max_value(&self, state: &StateKey, candidates: &[Action]) -> Option<f64> {
        candidates
            .iter()
            .map(|action| self.get(state, action))
            .reduce(f64::max)
    }

    /// Best action among `candidates`, ties broken uniformly at random
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] if `candidates` is empty.
    pub fn best_action<R: Rng + ?Sized>(
        &self,
        state: &StateKey,
        candidates: &[Action],
        rng: &mut R,
    ) -> Result<(Action, f64)> {
        tie_broken_argmax(candidates, &self.values(state, candidates), rng)
    }

    /// Stored entries for one state, if any were ever written
    pub fn row(&self, state: &StateKey) -> Option<&HashMap<Action, f64>> {
        self.rows.get(state)
    }

    /// States that have at least one stored entry
    pub fn states(&self) -> impl Iterator<Item = &StateKey> {
        self.rows.keys()
    }

    /// Every stored `(state, action, value)` entry, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &Action, f64)> {
        self.rows.iter().flat_map(|(state, row)| {
            row.iter()
                .map(move |(action, value)| (state, action, *value))
        })
    }

    /// Total number of stored Q-values
    pub fn len(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all Q-values
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

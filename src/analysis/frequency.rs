//! Frequency model of the human's moves
//!
//! Counts every move the human plays (each starting at one, so nothing is
//! ever ruled out) and samples a prediction in proportion to those counts.

use std::collections::BTreeMap;

use rand::{Rng, rngs::StdRng};

use crate::{
    Result,
    error::Error,
    q_learning::scheduler::build_rng,
    types::{Action, ActionSpace},
};

#[derive(Debug, Clone)]
pub struct FrequencyModel {
    actions: ActionSpace,
    counts: BTreeMap<Action, u64>,
    rng: StdRng,
}

impl FrequencyModel {
    pub fn new(actions: ActionSpace, seed: Option<u64>) -> Self {
        let counts = actions.iter().map(|action| (action.clone(), 1)).collect();
        Self {
            actions,
            counts,
            rng: build_rng(seed),
        }
    }

    /// Record one move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] for a move outside the action space.
    pub fn observe(&mut self, action: &Action) -> Result<()> {
        let count = self
            .counts
            .get_mut(action)
            .ok_or_else(|| Error::UnknownAction {
                action: action.to_string(),
            })?;
        *count += 1;
        Ok(())
    }

    pub fn count(&self, action: &Action) -> u64 {
        self.counts.get(action).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Sample the human's next move, weighted by how often each was played.
    pub fn predict(&mut self) -> Result<Action> {
        let mut pick = self.rng.random_range(0..self.total());
        self.actions
            .iter()
            .find(|action| {
                let count = self.counts.get(*action).copied().unwrap_or(0);
                if pick < count {
                    true
                } else {
                    pick -= count;
                    false
                }
            })
            .cloned()
            .ok_or(Error::EmptyActionSet)
    }
}

//! Where the learned policy disagrees with the human

use crate::{
    Result,
    q_learning::{Encodable, QLearningAgent, encode},
    types::{Action, StateKey},
};

/// A recorded decision the agent would have made differently.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub state: StateKey,
    pub taken: Action,
    pub taken_value: f64,
    pub suggested: Action,
    pub suggested_value: f64,
}

impl Suggestion {
    /// Estimated value lost by the human's choice
    pub fn regret(&self) -> f64 {
        self.suggested_value - self.taken_value
    }
}

/// Compare each `(state, action)` of a human trajectory with the agent's
/// greedy choice, keeping only the steps where the human's action is worth
/// strictly less than the best one.
pub fn suggestions<S: Encodable>(
    agent: &mut QLearningAgent,
    trajectory: &[(S, Action)],
) -> Result<Vec<Suggestion>> {
    let mut found = Vec::new();
    for (state, taken) in trajectory {
        let taken_value = agent.q_value(state, taken)?;
        let (suggested, suggested_value) = agent.best_action(state)?;
        if taken_value < suggested_value {
            found.push(Suggestion {
                state: encode(state)?,
                taken: taken.clone(),
                taken_value,
                suggested,
                suggested_value,
            });
        }
    }
    log::debug!("{} of {} steps differ from the learned policy", found.len(), trajectory.len());
    Ok(found)
}

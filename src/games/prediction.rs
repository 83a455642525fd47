//! Shared driver for the guessing games (coin flip, dice)
//!
//! The bot learns to predict the human's next outcome from the previous one.
//! Training on a sequence rewards, at each step, the guess that would have
//! been right: state is the previous outcome (or `START`), action and next
//! state are the outcome that actually followed.

use crate::{
    Result,
    q_learning::{Encodable, QLearningAgent, StateValue, Transition},
    types::Action,
};

pub const START: &str = "START";

/// What the bot has seen so far: nothing, or the last outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredictionState {
    Start,
    After(Action),
}

impl Encodable for PredictionState {
    fn state_value(&self) -> Result<StateValue> {
        Ok(match self {
            PredictionState::Start => StateValue::str(START),
            PredictionState::After(action) => StateValue::str(action.as_str()),
        })
    }
}

/// Counter-training transitions for a sequence of outcomes.
pub fn prediction_transitions(history: &[Action]) -> Vec<Transition<PredictionState>> {
    let mut previous = PredictionState::Start;
    let mut transitions = Vec::with_capacity(history.len());
    for current in history {
        let next = PredictionState::After(current.clone());
        transitions.push(Transition::new(
            previous,
            current.clone(),
            1.0,
            Some(next.clone()),
        ));
        previous = next;
    }
    transitions
}

/// Predict the outcome following `previous` (`None` at the start).
pub fn predict(agent: &mut QLearningAgent, previous: Option<&Action>) -> Result<Action> {
    let state = match previous {
        Some(action) => PredictionState::After(action.clone()),
        None => PredictionState::Start,
    };
    agent.choose_action(&state, false)
}

/// One revealed guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    pub actual: Action,
    pub guess: Action,
}

impl Guess {
    pub fn is_correct(&self) -> bool {
        self.actual == self.guess
    }
}

/// Running record of the bot's guesses during one play session.
#[derive(Debug, Clone, Default)]
pub struct PredictionLog {
    entries: Vec<Guess>,
}

impl PredictionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Have the bot guess, then reveal `actual` and record the result.
    pub fn reveal(&mut self, agent: &mut QLearningAgent, actual: Action) -> Result<&Guess> {
        let previous = self.entries.last().map(|entry| entry.actual.clone());
        let guess = predict(agent, previous.as_ref())?;
        self.entries.push(Guess { actual, guess });
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn entries(&self) -> &[Guess] {
        &self.entries
    }

    pub fn correct(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_correct()).count()
    }

    pub fn wrong(&self) -> usize {
        self.entries.len() - self.correct()
    }

    /// Share of correct guesses; `None` before the first guess.
    pub fn accuracy(&self) -> Option<f64> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.correct() as f64 / self.entries.len() as f64)
        }
    }

    /// Start a new play session.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

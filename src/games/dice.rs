//! Dice predictor: the coin flip game with six faces

use std::fmt;

use crate::{
    Result,
    error::Error,
    games::prediction::{predict, prediction_transitions},
    q_learning::QLearningAgent,
    types::{Action, ActionSpace},
};

pub const FACES: u8 = 6;

/// A die face, 1 to 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Face(u8);

impl Face {
    /// # Errors
    ///
    /// Returns [`Error::InvalidMove`] if `value` is not between 1 and 6.
    pub fn new(value: u8) -> Result<Self> {
        if (1..=FACES).contains(&value) {
            Ok(Face(value))
        } else {
            Err(Error::InvalidMove {
                message: format!("die face {value} must be between 1 and {FACES}"),
            })
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn action(&self) -> Action {
        Action::new(self.0.to_string())
    }

    pub fn from_action(action: &Action) -> Result<Self> {
        let value = action.as_str().parse::<u8>().map_err(|_| Error::InvalidMove {
            message: format!("'{action}' is not a die face"),
        })?;
        Face::new(value)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn action_space() -> ActionSpace {
    ActionSpace::from_known((1..=FACES).map(|face| face.to_string()))
}

/// Train on a recorded sequence of rolls. Returns the number of updates.
pub fn train(agent: &mut QLearningAgent, rolls: &[Face]) -> Result<usize> {
    let actions: Vec<Action> = rolls.iter().map(Face::action).collect();
    agent.train(&prediction_transitions(&actions))
}

/// The bot's guess for the roll after `previous`.
pub fn guess(agent: &mut QLearningAgent, previous: Option<Face>) -> Result<Face> {
    let previous = previous.map(|face| face.action());
    Face::from_action(&predict(agent, previous.as_ref())?)
}

//! Coin flip predictor: learns the human's tendencies in a heads/tails sequence

use std::str::FromStr;

use crate::{
    Result,
    error::Error,
    games::prediction::{predict, prediction_transitions},
    q_learning::QLearningAgent,
    types::{Action, ActionSpace},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Heads,
    Tails,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Heads, Side::Tails];

    pub fn label(&self) -> &'static str {
        match self {
            Side::Heads => "heads",
            Side::Tails => "tails",
        }
    }

    pub fn action(&self) -> Action {
        Action::from(self.label())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "heads" => Ok(Side::Heads),
            "tails" => Ok(Side::Tails),
            other => Err(Error::InvalidMove {
                message: format!("'{other}' is not heads or tails"),
            }),
        }
    }
}

pub fn action_space() -> ActionSpace {
    ActionSpace::from_known(Side::ALL.map(|side| side.label()))
}

/// Train on a recorded sequence of outcomes. Returns the number of updates.
pub fn train(agent: &mut QLearningAgent, history: &[Side]) -> Result<usize> {
    let actions: Vec<Action> = history.iter().map(Side::action).collect();
    agent.train(&prediction_transitions(&actions))
}

/// The bot's guess for the outcome after `previous`.
pub fn guess(agent: &mut QLearningAgent, previous: Option<Side>) -> Result<Side> {
    let previous = previous.map(|side| side.action());
    predict(agent, previous.as_ref())?.as_str().parse()
}

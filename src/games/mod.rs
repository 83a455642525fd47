//! Game drivers
//!
//! Each game supplies its state type (implementing
//! [`crate::q_learning::Encodable`]), its action space, and the code that
//! turns a recorded human session into transitions for the engine.
//!
//! Two update protocols are in use:
//!
//! - self-value (gridworld, tic-tac-toe): the state is the position before
//!   the move, the action is the move taken, and the next state is the
//!   position the move led to.
//! - counter-training (rps, coin flip, dice): the state is what the human
//!   just showed, the action is the bot's ideal response, and the next state
//!   is the human's next move.

pub mod coinflip;
pub mod dice;
pub mod gridworld;
pub mod prediction;
pub mod rps;
pub mod tictactoe;

use std::{fmt, str::FromStr};

use crate::{Result, error::Error, types::ActionSpace};

/// Every game that owns a persisted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    RockPaperScissors,
    CoinFlip,
    Dice,
    GridWorld,
    TicTacToe,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::RockPaperScissors,
        GameKind::CoinFlip,
        GameKind::Dice,
        GameKind::GridWorld,
        GameKind::TicTacToe,
    ];

    /// Identifier used in file names.
    pub fn name(&self) -> &'static str {
        match self {
            GameKind::RockPaperScissors => "rps",
            GameKind::CoinFlip => "coinflip",
            GameKind::Dice => "dice",
            GameKind::GridWorld => "gridworld",
            GameKind::TicTacToe => "tictactoe",
        }
    }

    pub fn action_space(&self) -> ActionSpace {
        match self {
            GameKind::RockPaperScissors => rps::action_space(),
            GameKind::CoinFlip => coinflip::action_space(),
            GameKind::Dice => dice::action_space(),
            GameKind::GridWorld => gridworld::action_space(),
            GameKind::TicTacToe => tictactoe::action_space(),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GameKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GameKind::ALL
            .into_iter()
            .find(|game| game.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown game '{s}'. Expected one of: rps, coinflip, dice, gridworld, tictactoe"
                ))
            })
    }
}

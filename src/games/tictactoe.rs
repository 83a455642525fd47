//! Tic-tac-toe: the human plays X and moves first, the bot plays O
//!
//! The bot learns from finished games. Every one of its moves earns the
//! game's result. Each move's next state is the board at the bot's following
//! turn, bootstrapped only over the cells still free there; the last move is
//! terminal.

use std::fmt;

use crate::{
    Result,
    error::Error,
    q_learning::{Encodable, QLearningAgent, StateValue, Transition},
    types::{Action, ActionSpace},
};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

pub const WIN_REWARD: f64 = 1.0;
pub const DRAW_REWARD: f64 = 0.2;
pub const LOSS_REWARD: f64 = -1.0;

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub const HUMAN: Player = Player::X;
    pub const BOT: Player = Player::O;

    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Draw,
}

/// Reward for `player` given the final outcome.
pub fn reward_for_outcome(outcome: Outcome, player: Player) -> f64 {
    match outcome {
        Outcome::Draw => DRAW_REWARD,
        Outcome::Win(winner) if winner == player => WIN_REWARD,
        Outcome::Win(_) => LOSS_REWARD,
    }
}

/// Board cells in row-major order, `None` for an empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Option<Player>; 9],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a nine character board, `.` or space for empty cells.
    pub fn from_str_cells(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 9 {
            return Err(Error::InvalidMove {
                message: format!("board '{s}' must have 9 cells"),
            });
        }
        let mut board = Board::new();
        for (idx, c) in chars.into_iter().enumerate() {
            board.cells[idx] = match c {
                '.' | ' ' => None,
                'X' | 'x' => Some(Player::X),
                'O' | 'o' => Some(Player::O),
                other => {
                    return Err(Error::InvalidMove {
                        message: format!("'{other}' is not a board cell"),
                    });
                }
            };
        }
        Ok(board)
    }

    pub fn get(&self, idx: usize) -> Option<Player> {
        self.cells.get(idx).copied().flatten()
    }

    pub fn is_empty_cell(&self, idx: usize) -> bool {
        idx < 9 && self.cells[idx].is_none()
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        (0..9).filter(|&idx| self.cells[idx].is_none()).collect()
    }

    /// Empty cells as actions
    pub fn legal_actions(&self) -> Vec<Action> {
        self.empty_cells().into_iter().map(Action::from).collect()
    }

    /// Place `player` on `idx`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMove`] if the cell is out of range or taken.
    pub fn play(&mut self, idx: usize, player: Player) -> Result<()> {
        if !self.is_empty_cell(idx) {
            return Err(Error::InvalidMove {
                message: format!("cell {idx} is not available"),
            });
        }
        self.cells[idx] = Some(player);
        Ok(())
    }

    pub fn winner(&self) -> Option<Player> {
        WINNING_LINES.iter().find_map(|&[a, b, c]| {
            let first = self.cells[a]?;
            (self.cells[b] == Some(first) && self.cells[c] == Some(first)).then_some(first)
        })
    }

    /// `None` while the game is still running
    pub fn outcome(&self) -> Option<Outcome> {
        match self.winner() {
            Some(winner) => Some(Outcome::Win(winner)),
            None if self.cells.iter().all(Option::is_some) => Some(Outcome::Draw),
            None => None,
        }
    }

    pub fn encode(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.map_or('.', Player::to_char))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.encode();
        for (row, chunk) in encoded.as_bytes().chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", String::from_utf8_lossy(chunk))?;
        }
        Ok(())
    }
}

impl Encodable for Board {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::str(self.encode()))
    }
}

pub fn action_space() -> ActionSpace {
    ActionSpace::from_known((0..9usize).map(|idx| idx.to_string()))
}

fn cell_from_action(action: &Action) -> Result<usize> {
    action
        .as_str()
        .parse::<usize>()
        .ok()
        .filter(|&idx| idx < 9)
        .ok_or_else(|| Error::InvalidMove {
            message: format!("'{action}' is not a board cell"),
        })
}

/// One game between the human and the bot, recorded move by move.
#[derive(Debug, Clone)]
pub struct Match {
    board: Board,
    to_move: Player,
    bot_moves: Vec<(Board, Action)>,
}

impl Match {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Player::HUMAN,
            bot_moves: Vec::new(),
        }
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.board.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    fn ensure_turn(&self, player: Player) -> Result<()> {
        if self.is_over() {
            return Err(Error::GameOver);
        }
        if self.to_move != player {
            return Err(Error::InvalidMove {
                message: format!("it is not {}'s turn", player.to_char()),
            });
        }
        Ok(())
    }

    /// The human plays X on `idx`.
    pub fn human_move(&mut self, idx: usize) -> Result<()> {
        self.ensure_turn(Player::HUMAN)?;
        self.board.play(idx, Player::HUMAN)?;
        self.to_move = Player::BOT;
        Ok(())
    }

    /// The bot picks among the free cells and plays O there. Returns the cell.
    pub fn bot_move(&mut self, agent: &mut QLearningAgent, training: bool) -> Result<usize> {
        self.ensure_turn(Player::BOT)?;
        let state = self.board;
        let action = agent.choose_legal_action(&state, &state.legal_actions(), training)?;
        let idx = cell_from_action(&action)?;
        self.board.play(idx, Player::BOT)?;
        self.bot_moves.push((state, action));
        self.to_move = Player::HUMAN;
        Ok(idx)
    }

    /// The cell the bot would take in the human's position; `None` once the game is over.
    pub fn hint(&self, agent: &mut QLearningAgent) -> Result<Option<usize>> {
        if self.is_over() {
            return Ok(None);
        }
        let action = agent.choose_legal_action(&self.board, &self.board.legal_actions(), false)?;
        cell_from_action(&action).map(Some)
    }

    /// Bot transitions for a finished game, all rewarded with its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMove`] while the game is still running.
    pub fn transitions(&self) -> Result<Vec<Transition<Board>>> {
        let outcome = self.outcome().ok_or_else(|| Error::InvalidMove {
            message: "game is not finished".to_string(),
        })?;
        let reward = reward_for_outcome(outcome, Player::BOT);

        Ok(self
            .bot_moves
            .iter()
            .enumerate()
            .map(|(i, (state, action))| match self.bot_moves.get(i + 1) {
                Some((next, _)) => {
                    Transition::new(*state, action.clone(), reward, Some(*next))
                        .with_next_actions(next.legal_actions())
                }
                None => Transition::terminal(*state, action.clone(), reward),
            })
            .collect())
    }

    /// Train on this finished game. Returns the number of updates.
    pub fn train(&self, agent: &mut QLearningAgent) -> Result<usize> {
        let transitions = self.transitions()?;
        log::debug!(
            "tic-tac-toe game over ({:?}), {} bot moves",
            self.outcome(),
            transitions.len()
        );
        agent.train(&transitions)
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

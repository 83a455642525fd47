//! GridWorld: walk to the goal; the bot learns from the human's path

use std::{fmt, str::FromStr};

use crate::{
    Result,
    error::Error,
    q_learning::{Encodable, QLearningAgent, StateValue, Transition},
    types::{Action, ActionSpace},
};

/// Reward for reaching the goal.
pub const GOAL_REWARD: f64 = 10.0;
/// Reward for every other step, including bumping into a wall.
pub const STEP_REWARD: f64 = -1.0;
/// Longest policy rollout before giving up.
pub const MAX_ROLLOUT_STEPS: usize = 50;

/// A cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Encodable for Position {
    fn state_value(&self) -> Result<StateValue> {
        (self.row, self.col).state_value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn action(&self) -> Action {
        Action::from(self.label())
    }

    pub fn from_action(action: &Action) -> Result<Self> {
        action.as_str().parse()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.label() == s)
            .ok_or_else(|| Error::InvalidMove {
                message: format!("'{s}' is not a direction"),
            })
    }
}

pub fn action_space() -> ActionSpace {
    ActionSpace::from_known(Direction::ALL.map(|direction| direction.label()))
}

/// Result of one move on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub next: Position,
    pub reward: f64,
    pub done: bool,
}

/// A square grid with a start, a goal and optional walls.
#[derive(Debug, Clone, PartialEq)]
pub struct GridWorld {
    pub size: usize,
    pub start: Position,
    pub goal: Position,
    pub walls: Vec<Position>,
}

impl Default for GridWorld {
    fn default() -> Self {
        Self {
            size: 4,
            start: Position::new(0, 0),
            goal: Position::new(3, 3),
            walls: Vec::new(),
        }
    }
}

impl GridWorld {
    pub fn with_walls(mut self, walls: Vec<Position>) -> Self {
        self.walls = walls;
        self
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.size && position.col < self.size
    }

    /// Move one cell; leaving the grid or walking into a wall stays put.
    pub fn step(&self, position: Position, direction: Direction) -> Step {
        let (dr, dc) = direction.delta();
        let candidate = position
            .row
            .checked_add_signed(dr)
            .zip(position.col.checked_add_signed(dc))
            .map(|(row, col)| Position::new(row, col))
            .filter(|&next| self.contains(next) && !self.walls.contains(&next));
        let next = candidate.unwrap_or(position);

        let done = next == self.goal;
        Step {
            next,
            reward: if done { GOAL_REWARD } else { STEP_REWARD },
            done,
        }
    }
}

/// A human's walk through the grid, recorded step by step.
#[derive(Debug, Clone)]
pub struct Run {
    steps: Vec<(Position, Direction, f64)>,
    position: Position,
    done: bool,
}

impl Run {
    pub fn new(world: &GridWorld) -> Self {
        Self {
            steps: Vec::new(),
            position: world.start,
            done: false,
        }
    }

    /// Take one step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GameOver`] once the goal has been reached.
    pub fn play(&mut self, world: &GridWorld, direction: Direction) -> Result<Step> {
        if self.done {
            return Err(Error::GameOver);
        }
        let step = world.step(self.position, direction);
        self.steps.push((self.position, direction, step.reward));
        self.position = step.next;
        self.done = step.done;
        Ok(step)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn steps(&self) -> &[(Position, Direction, f64)] {
        &self.steps
    }

    /// (position, direction) decisions made along the way
    pub fn decisions(&self) -> Vec<(Position, Action)> {
        self.steps
            .iter()
            .map(|(position, direction, _)| (*position, direction.action()))
            .collect()
    }

    /// Self-value transitions for the recorded path.
    ///
    /// The last step is terminal only if it reached the goal.
    pub fn transitions(&self) -> Vec<Transition<Position>> {
        let last = self.steps.len().saturating_sub(1);
        self.steps
            .iter()
            .enumerate()
            .map(|(i, &(position, direction, reward))| {
                let next = self
                    .steps
                    .get(i + 1)
                    .map(|&(next, _, _)| next)
                    .unwrap_or(self.position);
                Transition {
                    terminal: i == last && self.done,
                    ..Transition::new(position, direction.action(), reward, Some(next))
                }
            })
            .collect()
    }
}

/// Train the agent on a recorded run. Returns the number of updates.
pub fn train(agent: &mut QLearningAgent, run: &Run) -> Result<usize> {
    agent.train(&run.transitions())
}

/// Outcome of playing the learned policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollout {
    pub path: Vec<(Position, Direction)>,
    pub end: Position,
    pub reached_goal: bool,
}

/// Follow the greedy policy from `start` for at most [`MAX_ROLLOUT_STEPS`] steps.
pub fn rollout(agent: &mut QLearningAgent, world: &GridWorld, start: Position) -> Result<Rollout> {
    let mut position = start;
    let mut path = Vec::new();
    let mut reached_goal = position == world.goal;

    while !reached_goal && path.len() < MAX_ROLLOUT_STEPS {
        let direction = Direction::from_action(&agent.choose_action(&position, false)?)?;
        let step = world.step(position, direction);
        path.push((position, direction));
        position = step.next;
        reached_goal = step.done;
    }

    Ok(Rollout {
        path,
        end: position,
        reached_goal,
    })
}

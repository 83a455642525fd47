//! Tabular Q-learning game bots
//!
//! This crate provides:
//! - A tabular Q-learning engine with canonical state keys, ε-greedy
//!   exploration and a persisted JSON table format
//! - Drivers for rock-paper-scissors, coin flip, dice, grid world and
//!   tic-tac-toe that turn a human's recorded play into training data
//! - File-backed and in-memory table repositories, and play sessions on top
//! - Pattern and suggestion analysis of the human's play, and CSV export

pub mod adapters;
pub mod analysis;
pub mod app;
pub mod error;
pub mod export;
pub mod games;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use app::{QConfig, Session, SessionConfig};
pub use error::{Error, Result};
pub use games::GameKind;
pub use q_learning::QLearningAgent;
pub use types::{Action, ActionSpace, StateKey};

//! Application layer: configuration, storage layout and play sessions.
//!
//! A [`Session`] ties one game to its agent and to the repository its table
//! is kept in. The file-backed default stores one table per game under
//! [`SessionConfig::models_dir`]; tests swap in an in-memory repository.
//!
//! ```no_run
//! use gamebot::{app::{Session, SessionConfig}, games::{GameKind, rps}};
//!
//! let mut session = Session::open(GameKind::RockPaperScissors, &SessionConfig::default())?;
//! rps::train(session.agent_mut(), &[rps::Move::Rock, rps::Move::Rock, rps::Move::Paper])?;
//! session.save()?;
//! # Ok::<(), gamebot::Error>(())
//! ```

pub mod config;
pub mod session;
pub mod storage;

pub use config::{QConfig, SessionConfig};
pub use session::Session;
pub use storage::{clear_model, model_path};

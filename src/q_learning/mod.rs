//! Tabular Q-learning
//!
//! This module implements the value-learning engine every game is built on:
//!
//! - [`state_key`]: canonical, order-insensitive keys for arbitrary states
//! - [`q_table`]: the (state, action) → value table with random tie-breaking
//! - [`scheduler`]: ε-greedy selection with a linear decay schedule
//! - [`agent`]: the one-step temporal difference update
//! - [`serialization`]: the JSON format tables are saved in
//!
//! ## Update rule
//!
//! | Step | Target |
//! |------|--------|
//! | terminal, or no next state | `r` |
//! | otherwise | `r + γ · max_a' Q(s', a')` |
//!
//! followed by `Q(s,a) ← (1-α)·Q(s,a) + α·target`.
//!
//! ## Usage Example
//!
//! ```
//! use gamebot::{
//!     app::QConfig,
//!     q_learning::QLearningAgent,
//!     types::{Action, ActionSpace},
//! };
//!
//! let actions = ActionSpace::new(["heads", "tails"])?;
//! let mut agent = QLearningAgent::new(actions, QConfig::default().with_seed(1))?;
//!
//! agent.update("START", &Action::from("tails"), 1.0, Some("tails"), false)?;
//! assert_eq!(agent.choose_action("START", false)?, Action::from("tails"));
//! # Ok::<(), gamebot::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod scheduler;
pub mod serialization;
pub mod state_key;
pub mod transition;

// Public re-exports
pub use agent::QLearningAgent;
pub use q_table::{QTable, tie_broken_argmax};
pub use scheduler::{EpsilonSchedule, EpsilonScheduler};
pub use serialization::{SavedQTable, deserialize, serialize};
pub use state_key::{Encodable, StateValue, encode, encode_serialize};
pub use transition::Transition;

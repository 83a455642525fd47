//! Configuration types for agent and session creation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, q_learning::scheduler::EpsilonSchedule};

/// Hyperparameters of a Q-learning agent.
///
/// This type provides a builder-style API. A config is fixed once an agent is
/// built from it; to change it, replace it wholesale with
/// [`crate::q_learning::QLearningAgent::reconfigure`].
///
/// # Examples
///
/// ```
/// use gamebot::app::QConfig;
///
/// let config = QConfig::default()
///     .with_learning_rate(0.3)
///     .with_discount(0.9)
///     .with_epsilon(0.2, 0.01)
///     .with_decay_steps(500)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QConfig {
    /// Learning rate α, in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ, in [0, 1]
    pub discount: f64,
    /// Exploration rate at step 0
    pub epsilon_start: f64,
    /// Exploration rate once the decay window is over
    pub epsilon_end: f64,
    /// Length of the decay window, at least 1
    pub epsilon_decay_steps: u64,
    /// Random seed for reproducibility (None = non-deterministic)
    pub seed: Option<u64>,
}

impl Default for QConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.95,
            epsilon_start: 1.0,
            epsilon_end: 0.05,
            epsilon_decay_steps: 5000,
            seed: Some(42),
        }
    }
}

impl QConfig {
    /// Set the learning rate α.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor γ.
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Set the start and end exploration rates.
    pub fn with_epsilon(mut self, start: f64, end: f64) -> Self {
        self.epsilon_start = start;
        self.epsilon_end = end;
        self
    }

    /// Set the number of steps over which exploration decays.
    pub fn with_decay_steps(mut self, steps: u64) -> Self {
        self.epsilon_decay_steps = steps;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draw randomness from the operating system instead of a fixed seed.
    pub fn without_seed(mut self) -> Self {
        self.seed = None;
        self
    }

    pub fn schedule(&self) -> EpsilonSchedule {
        EpsilonSchedule::new(
            self.epsilon_start,
            self.epsilon_end,
            self.epsilon_decay_steps,
        )
    }

    /// Check every parameter is inside its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::config(format!(
                "learning_rate {} must be in (0, 1]",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::config(format!(
                "discount {} must be in [0, 1]",
                self.discount
            )));
        }
        for (name, value) in [
            ("epsilon_start", self.epsilon_start),
            ("epsilon_end", self.epsilon_end),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!("{name} {value} must be in [0, 1]")));
            }
        }
        if self.epsilon_decay_steps == 0 {
            return Err(Error::config("epsilon_decay_steps must be at least 1"));
        }
        Ok(())
    }
}

/// Where a session keeps its tables and how fresh tables are configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding one `<game>_qtable.json` file per game
    pub models_dir: PathBuf,
    /// Hyperparameters used when no stored table exists
    pub defaults: QConfig,
}

impl SessionConfig {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            defaults: QConfig::default(),
        }
    }

    /// Set the hyperparameters for fresh tables.
    pub fn with_defaults(mut self, defaults: QConfig) -> Self {
        self.defaults = defaults;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("models")
    }
}

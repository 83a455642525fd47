//! Repository port for Q-table persistence.
//!
//! This module defines the trait boundary between the learning engine and
//! wherever tables are kept.

use std::path::Path;

use crate::{
    Result,
    app::QConfig,
    q_learning::{QLearningAgent, SavedQTable},
    types::ActionSpace,
};

/// Port for persisting and loading Q-tables.
///
/// Implementations distinguish a table that was never saved (`Ok(None)`)
/// from one that exists but cannot be decoded (`Err(Error::Decode)`).
///
/// # Examples
///
/// ```no_run
/// use gamebot::{
///     app::QConfig,
///     adapters::JsonFileRepository,
///     ports::TableRepository,
///     types::ActionSpace,
/// };
/// use std::path::Path;
///
/// let repo = JsonFileRepository::new();
/// let actions = ActionSpace::new(["heads", "tails"])?;
/// let agent = repo.load(Path::new("models/coinflip_qtable.json"), &actions, &QConfig::default())?;
/// repo.save(&agent, Path::new("models/coinflip_qtable.json"))?;
/// # Ok::<(), gamebot::Error>(())
/// ```
pub trait TableRepository {
    /// Save an agent's table, replacing whatever was stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the storage cannot be written.
    fn save(&self, agent: &QLearningAgent, path: &Path) -> Result<()>;

    /// Read the table stored at `path`, or `None` if nothing is stored there.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Decode`] if the stored data is corrupt, or
    /// [`crate::Error::Io`] if it cannot be read.
    fn load_saved(&self, path: &Path) -> Result<Option<SavedQTable>>;

    /// Remove the table stored at `path`. Returns whether anything was removed.
    fn remove(&self, path: &Path) -> Result<bool>;

    /// Load an agent, starting a fresh one if nothing is stored at `path`.
    ///
    /// `default_actions` and `default_config` fill in whatever the stored
    /// table does not record.
    ///
    /// # Errors
    ///
    /// Same as [`TableRepository::load_saved`]; a missing table is not an error.
    fn load(
        &self,
        path: &Path,
        default_actions: &ActionSpace,
        default_config: &QConfig,
    ) -> Result<QLearningAgent> {
        match self.load_saved(path)? {
            Some(saved) => saved.into_agent(default_actions, default_config),
            None => QLearningAgent::new(default_actions.clone(), default_config.clone()),
        }
    }
}

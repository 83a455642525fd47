//! In-memory table repository for testing.
//!
//! Tables are kept as their serialized JSON text, so loading goes through
//! exactly the same decoder as the file repository without touching disk.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use crate::{
    Result,
    ports::TableRepository,
    q_learning::{QLearningAgent, SavedQTable, serialize},
};

/// In-memory repository for testing.
///
/// # Examples
///
/// ```
/// use gamebot::adapters::InMemoryRepository;
/// use gamebot::app::QConfig;
/// use gamebot::ports::TableRepository;
/// use gamebot::types::ActionSpace;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let actions = ActionSpace::new(["heads", "tails"])?;
/// let agent = repo.load(Path::new("coinflip"), &actions, &QConfig::default())?;
///
/// // Save to "memory" (not disk)
/// repo.save(&agent, Path::new("coinflip"))?;
/// assert!(repo.contains(Path::new("coinflip")));
/// # Ok::<(), gamebot::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    fn storage(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // a poisoned lock still holds consistent strings
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored tables.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&Self::key(path))
    }

    /// Store raw text at `path`, e.g. to simulate a corrupt file.
    pub fn insert_raw(&self, path: &Path, text: impl Into<String>) {
        self.storage().insert(Self::key(path), text.into());
    }

    /// Raw text stored at `path`.
    pub fn raw(&self, path: &Path) -> Option<String> {
        self.storage().get(&Self::key(path)).cloned()
    }
}

impl TableRepository for InMemoryRepository {
    fn save(&self, agent: &QLearningAgent, path: &Path) -> Result<()> {
        let text = serialize(agent)?;
        self.storage().insert(Self::key(path), text);
        Ok(())
    }

    fn load_saved(&self, path: &Path) -> Result<Option<SavedQTable>> {
        match self.raw(path) {
            Some(text) => SavedQTable::from_json(&text).map(Some),
            None => Ok(None),
        }
    }

    fn remove(&self, path: &Path) -> Result<bool> {
        Ok(self.storage().remove(&Self::key(path)).is_some())
    }
}

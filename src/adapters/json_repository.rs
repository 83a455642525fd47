//! JSON file implementation of the table repository.
//!
//! Each table lives in its own file. Saves go to a temporary file next to
//! the destination which is then renamed over it, so a crash mid-write never
//! leaves a half-written table behind.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::{
    Result,
    error::Error,
    ports::TableRepository,
    q_learning::{QLearningAgent, SavedQTable, serialize},
};

/// File-backed repository writing the JSON table format.
///
/// # Examples
///
/// ```no_run
/// use gamebot::adapters::JsonFileRepository;
/// use gamebot::app::QConfig;
/// use gamebot::ports::TableRepository;
/// use gamebot::types::ActionSpace;
/// use std::path::Path;
///
/// let repo = JsonFileRepository;
/// let actions = ActionSpace::new(["up", "down", "left", "right"])?;
/// let path = Path::new("models/gridworld_qtable.json");
/// let agent = repo.load(path, &actions, &QConfig::default())?;
///
/// repo.save(&agent, Path::new("models/gridworld_qtable.json"))?;
/// # Ok::<(), gamebot::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileRepository;

impl JsonFileRepository {
    /// Create a new JSON file repository.
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for JsonFileRepository {
    fn save(&self, agent: &QLearningAgent, path: &Path) -> Result<()> {
        let text = serialize(agent)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| Error::Io {
            operation: format!("create directory {dir:?}"),
            source,
        })?;

        let mut file = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
            operation: format!("create temporary file in {dir:?}"),
            source,
        })?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|source| Error::Io {
                operation: format!("write table for {path:?}"),
                source,
            })?;
        file.persist(path).map_err(|e| Error::Io {
            operation: format!("replace {path:?}"),
            source: e.error,
        })?;

        log::info!("{:<32}{:<32}", "saving      q-table", path.display());
        Ok(())
    }

    fn load_saved(&self, path: &Path) -> Result<Option<SavedQTable>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("{:<32}{:<32}", "no saved    q-table", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("read file {path:?}"),
                    source,
                });
            }
        };

        log::info!("{:<32}{:<32}", "loading     q-table", path.display());
        SavedQTable::from_json(&text).map(Some)
    }

    fn remove(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => {
                log::info!("{:<32}{:<32}", "removed     q-table", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(Error::Io {
                operation: format!("remove file {path:?}"),
                source,
            }),
        }
    }
}

//! A play session: one game, one agent, one place to keep its table

use std::path::{Path, PathBuf};

use crate::{
    Result,
    adapters::JsonFileRepository,
    app::{SessionConfig, storage::model_path},
    error::Error,
    games::GameKind,
    ports::TableRepository,
    q_learning::QLearningAgent,
};

/// Owns the agent for one game together with the repository it is saved to.
///
/// Opening a session loads the stored table, or starts a fresh one if none
/// exists. A stored table that cannot be decoded is replaced by a fresh one
/// and a warning is logged; it is overwritten on the next [`Session::save`].
#[derive(Debug)]
pub struct Session<R: TableRepository = JsonFileRepository> {
    game: GameKind,
    path: PathBuf,
    agent: QLearningAgent,
    repository: R,
}

impl Session<JsonFileRepository> {
    /// Open a file-backed session under `config.models_dir`.
    pub fn open(game: GameKind, config: &SessionConfig) -> Result<Self> {
        Self::open_with(JsonFileRepository::new(), game, config)
    }
}

impl<R: TableRepository> Session<R> {
    pub fn open_with(repository: R, game: GameKind, config: &SessionConfig) -> Result<Self> {
        let path = model_path(&config.models_dir, game);
        let actions = game.action_space();
        let agent = match repository.load(&path, &actions, &config.defaults) {
            Ok(agent) => agent,
            Err(Error::Decode { message }) => {
                log::warn!(
                    "discarding unreadable {game} table at {}: {message}",
                    path.display()
                );
                QLearningAgent::new(actions, config.defaults.clone())?
            }
            Err(e) => return Err(e),
        };
        log::info!(
            "{:<32}{:<32}",
            format!("opened      {game} session"),
            format!("{} states", agent.q_table().len())
        );
        Ok(Self {
            game,
            path,
            agent,
            repository,
        })
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut QLearningAgent {
        &mut self.agent
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Persist the agent's table.
    pub fn save(&self) -> Result<()> {
        self.repository.save(&self.agent, &self.path)
    }

    /// Forget everything learned and remove the stored table.
    pub fn clear(&mut self) -> Result<()> {
        self.agent.reset();
        self.repository.remove(&self.path)?;
        Ok(())
    }
}

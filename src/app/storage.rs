//! Where each game's table lives on disk

use std::path::{Path, PathBuf};

use crate::{Result, adapters::JsonFileRepository, games::GameKind, ports::TableRepository};

/// `<dir>/<game>_qtable.json`
pub fn model_path(dir: &Path, game: GameKind) -> PathBuf {
    dir.join(format!("{}_qtable.json", game.name()))
}

/// Delete the stored table for `game`. Returns whether a file was removed.
pub fn clear_model(dir: &Path, game: GameKind) -> Result<bool> {
    JsonFileRepository::new().remove(&model_path(dir, game))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_model_path_per_game() {
        let dir = Path::new("models");
        assert_eq!(
            model_path(dir, GameKind::RockPaperScissors),
            PathBuf::from("models/rps_qtable.json")
        );
        assert_eq!(
            model_path(dir, GameKind::TicTacToe),
            PathBuf::from("models/tictactoe_qtable.json")
        );
    }

    #[test]
    fn test_clear_missing_model() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!clear_model(temp_dir.path(), GameKind::Dice).unwrap());

        std::fs::write(model_path(temp_dir.path(), GameKind::Dice), "{}").unwrap();
        assert!(clear_model(temp_dir.path(), GameKind::Dice).unwrap());
        assert!(!model_path(temp_dir.path(), GameKind::Dice).exists());
    }
}

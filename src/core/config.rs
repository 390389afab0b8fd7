//! Session configuration.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Where a session keeps its files and how it seeds randomness.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding `{name}_save.txt` character snapshots
    pub save_dir: PathBuf,

    /// Directory holding `quests.txt` and `items.txt`
    pub data_dir: PathBuf,

    /// Random seed for reproducible battles (None = random)
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            data_dir: PathBuf::from("data"),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Config rooted at a single directory, with `save_games/` and `data/` beneath it.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            save_dir: root.join("save_games"),
            data_dir: root.join("data"),
            ..Default::default()
        }
    }

    /// Same config with a fixed seed.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }
}

/// Platform data directory for saves, falling back to `data/save_games`.
pub fn default_save_dir() -> PathBuf {
    ProjectDirs::from("", "", "quest-chronicles")
        .map(|dirs| dirs.data_dir().join("save_games"))
        .unwrap_or_else(|| PathBuf::from("data").join("save_games"))
}

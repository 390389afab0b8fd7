//! Error types shared by every game subsystem.

use std::io;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type GameResult<T> = Result<T, GameError>;

/// Every recoverable failure the engine can report.
///
/// Corrupted persisted data (`SaveFileCorrupted`, `InvalidSaveData`) is kept
/// distinct from a missing save (`CharacterNotFound`).
#[derive(Debug, Error)]
pub enum GameError {
    // Character
    #[error("invalid character class: {0}")]
    InvalidClass(String),

    #[error("invalid character name: {0}")]
    InvalidName(String),

    #[error("character not found: {0}")]
    CharacterNotFound(String),

    #[error("character {0} is dead")]
    CharacterDead(String),

    // Persistence
    #[error("save file corrupted: {0}")]
    SaveFileCorrupted(String),

    #[error("invalid save data: {0}")]
    InvalidSaveData(String),

    // Inventory
    #[error("inventory full: capacity {capacity}")]
    InventoryFull { capacity: usize },

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("item {item_id} is not a {expected}")]
    InvalidItemType { item_id: String, expected: String },

    #[error("insufficient resources: need {needed} gold, have {available}")]
    InsufficientResources { needed: i64, available: i64 },

    #[error("gold overflow: adding {amount} to {available} exceeds the purse limit")]
    GoldOverflow { amount: i64, available: i64 },

    // Quests
    #[error("quest not found: {0}")]
    QuestNotFound(String),

    #[error("quest {quest_id} requires {prerequisite} to be completed first")]
    QuestRequirementsNotMet {
        quest_id: String,
        prerequisite: String,
    },

    #[error("quest already completed: {0}")]
    QuestAlreadyCompleted(String),

    #[error("quest not active: {0}")]
    QuestNotActive(String),

    #[error("level {required} required, character is level {current}")]
    InsufficientLevel { required: u32, current: u32 },

    #[error("prerequisite cycle detected at quest {0}")]
    QuestCycle(String),

    // Combat
    #[error("special ability already used this battle")]
    AbilityOnCooldown,

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("combat is not active")]
    CombatNotActive,

    // Game data files
    #[error("data file not found: {0}")]
    MissingDataFile(String),

    #[error("invalid data format: {0}")]
    InvalidDataFormat(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl GameError {
    /// True for errors caused by malformed persisted character data.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            GameError::SaveFileCorrupted(_) | GameError::InvalidSaveData(_)
        )
    }
}

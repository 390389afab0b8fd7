//! Quest Chronicles - single-player text RPG state engine.
//!
//! Characters level up, carry and equip items, take on quests with
//! prerequisite chains, and fight turn-based battles. Everything mutates one
//! [`Character`] in place; randomness is supplied by the caller so outcomes
//! can be pinned in tests.

pub mod character;
pub mod combat;
pub mod core;
pub mod data;
pub mod error;
pub mod items;
pub mod quests;
pub mod session;

pub use character::{Character, CharacterClass, SaveManager};
pub use combat::{Battle, BattleController, BattleResult, BattleState, Enemy, PlayerAction};
pub use crate::core::config::SessionConfig;
pub use error::{GameError, GameResult};
pub use items::{ItemCatalog, ItemDef, ItemType};
pub use quests::{QuestCatalog, QuestDef};
pub use session::GameSession;

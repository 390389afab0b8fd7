use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quest definitions keyed by quest id.
pub type QuestCatalog = BTreeMap<String, QuestDef>;

/// A static quest definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    pub quest_id: String,
    pub title: String,
    pub description: String,
    pub reward_xp: u32,
    /// Signed: a negative reward is charged on completion
    pub reward_gold: i64,
    pub required_level: u32,
    pub prerequisite: Option<String>,
}

impl QuestDef {
    /// The prerequisite quest id, treating a literal "none" as absent.
    pub fn prerequisite(&self) -> Option<&str> {
        self.prerequisite
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("none"))
    }
}

/// What completing a quest granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRewards {
    pub xp: u32,
    pub gold: i64,
}

/// Sum of rewards over every completed quest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTotals {
    pub total_xp: u64,
    pub total_gold: i64,
}

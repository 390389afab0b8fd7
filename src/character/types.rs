use crate::core::constants::*;
use crate::error::GameError;
use crate::items::types::StatEffect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

impl CharacterClass {
    pub fn all() -> [CharacterClass; 4] {
        [
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
        }
    }

    /// Starting (max_health, strength, magic) for this class.
    pub fn base_stats(&self) -> (u32, u32, u32) {
        match self {
            CharacterClass::Warrior => WARRIOR_BASE_STATS,
            CharacterClass::Mage => MAGE_BASE_STATS,
            CharacterClass::Rogue => ROGUE_BASE_STATS,
            CharacterClass::Cleric => CLERIC_BASE_STATS,
        }
    }

    /// Display name of the class's once-per-battle special ability.
    pub fn ability_name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Power Strike",
            CharacterClass::Mage => "Fireball",
            CharacterClass::Rogue => "Critical Strike",
            CharacterClass::Cleric => "Heal",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CharacterClass::all()
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::InvalidClass(s.to_string()))
    }
}

/// An item sitting in an equipment slot, with the bonus it applied so it
/// can be reversed exactly on unequip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item_id: String,
    pub bonus: StatEffect,
}

/// The player character.
///
/// Fields are crate-visible so the inventory, quest and combat modules can
/// mutate them; every mutation site keeps `health <= max_health`, no
/// duplicate quest ids, and disjoint active/completed sets.
///
/// Only `Serialize` is derived; characters are read back through
/// [`deserialize_character`](crate::character::save::deserialize_character),
/// which enforces those invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub(crate) name: String,
    pub(crate) class: CharacterClass,
    pub(crate) level: u32,
    pub(crate) experience: u32,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) strength: u32,
    pub(crate) magic: u32,
    pub(crate) gold: u32,
    pub(crate) inventory: Vec<String>,
    pub(crate) active_quests: Vec<String>,
    pub(crate) completed_quests: Vec<String>,
    pub(crate) equipped_weapon: Option<EquippedItem>,
    pub(crate) equipped_armor: Option<EquippedItem>,
}

impl Character {
    /// Fresh level-1 character with the class's base stats.
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        let (max_health, strength, magic) = class.base_stats();
        Self {
            name: name.into(),
            class,
            level: STARTING_LEVEL,
            experience: 0,
            health: max_health,
            max_health,
            strength,
            magic,
            gold: STARTING_GOLD,
            inventory: Vec::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> CharacterClass {
        self.class
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    pub fn magic(&self) -> u32 {
        self.magic
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn active_quests(&self) -> &[String] {
        &self.active_quests
    }

    pub fn completed_quests(&self) -> &[String] {
        &self.completed_quests
    }

    pub fn equipped_weapon(&self) -> Option<&EquippedItem> {
        self.equipped_weapon.as_ref()
    }

    pub fn equipped_armor(&self) -> Option<&EquippedItem> {
        self.equipped_armor.as_ref()
    }

    /// XP needed to reach the next level.
    pub fn xp_to_next_level(&self) -> u32 {
        self.level * XP_PER_LEVEL
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Sets health, clamped to `max_health`.
    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }

    /// Reduces health (never below 0) and returns the remaining health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = crate::core::combat_math::apply_damage(self.health, amount);
        self.health
    }
}

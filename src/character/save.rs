//! Character snapshots: the `KEY: value` text codec and the on-disk save store.
//!
//! File format, one field per line:
//!
//! ```text
//! NAME: Hero
//! CLASS: Warrior
//! LEVEL: 1
//! HEALTH: 120
//! MAX_HEALTH: 120
//! STRENGTH: 15
//! MAGIC: 5
//! EXPERIENCE: 0
//! GOLD: 100
//! INVENTORY: rusty_sword,minor_potion
//! ACTIVE_QUESTS: intro_quest
//! COMPLETED_QUESTS:
//! ```
//!
//! EQUIPPED_WEAPON / WEAPON_BONUS and EQUIPPED_ARMOR / ARMOR_BONUS follow
//! only when a slot is filled. Unknown keys and blank lines are ignored.

use super::logic::validate_name;
use super::types::{Character, CharacterClass, EquippedItem};
use crate::core::config::default_save_dir;
use crate::core::constants::{MAX_INVENTORY_SIZE, SAVE_FILE_SUFFIX};
use crate::error::{GameError, GameResult};
use crate::items::types::StatEffect;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Renders a character as save-file text.
pub fn serialize_character(character: &Character) -> String {
    let mut out = String::new();
    let mut line = |key: &str, value: &dyn std::fmt::Display| {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}: {}", key, value);
    };

    line("NAME", &character.name);
    line("CLASS", &character.class);
    line("LEVEL", &character.level);
    line("HEALTH", &character.health);
    line("MAX_HEALTH", &character.max_health);
    line("STRENGTH", &character.strength);
    line("MAGIC", &character.magic);
    line("EXPERIENCE", &character.experience);
    line("GOLD", &character.gold);
    line("INVENTORY", &character.inventory.join(","));
    line("ACTIVE_QUESTS", &character.active_quests.join(","));
    line("COMPLETED_QUESTS", &character.completed_quests.join(","));

    if let Some(weapon) = &character.equipped_weapon {
        line("EQUIPPED_WEAPON", &weapon.item_id);
        line("WEAPON_BONUS", &weapon.bonus);
    }
    if let Some(armor) = &character.equipped_armor {
        line("EQUIPPED_ARMOR", &armor.item_id);
        line("ARMOR_BONUS", &armor.bonus);
    }

    out
}

/// Raw fields as read from the text, before validation.
#[derive(Default)]
struct SnapshotFields {
    name: Option<String>,
    class: Option<String>,
    level: Option<u32>,
    health: Option<u32>,
    max_health: Option<u32>,
    strength: Option<u32>,
    magic: Option<u32>,
    experience: Option<u32>,
    gold: Option<u32>,
    inventory: Option<Vec<String>>,
    active_quests: Option<Vec<String>>,
    completed_quests: Option<Vec<String>>,
    weapon: Option<String>,
    weapon_bonus: Option<StatEffect>,
    armor: Option<String>,
    armor_bonus: Option<StatEffect>,
}

fn parse_int(key: &str, value: &str) -> GameResult<u32> {
    value.parse::<u32>().map_err(|_| {
        GameError::InvalidSaveData(format!(
            "{} must be a non-negative integer, got {:?}",
            key, value
        ))
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bonus(key: &str, value: &str) -> GameResult<StatEffect> {
    value.parse::<StatEffect>().map_err(|_| {
        GameError::InvalidSaveData(format!("{} must be stat:value, got {:?}", key, value))
    })
}

fn require<T>(field: Option<T>, key: &str) -> GameResult<T> {
    field.ok_or_else(|| GameError::InvalidSaveData(format!("Missing required field: {}", key)))
}

fn check_unique(ids: &[String], key: &str) -> GameResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(GameError::InvalidSaveData(format!(
                "{} lists {} more than once",
                key, id
            )));
        }
    }
    Ok(())
}

fn equipped(
    item: Option<String>,
    bonus: Option<StatEffect>,
    slot: &str,
) -> GameResult<Option<EquippedItem>> {
    match (item, bonus) {
        (Some(item_id), Some(bonus)) => Ok(Some(EquippedItem { item_id, bonus })),
        (None, None) => Ok(None),
        _ => Err(GameError::InvalidSaveData(format!(
            "{} slot needs both an item and a bonus",
            slot
        ))),
    }
}

/// Parses save-file text back into a character.
///
/// Every required field must be present with the right type, and the
/// result must satisfy the character invariants; otherwise this fails
/// with `InvalidSaveData`.
pub fn deserialize_character(text: &str) -> GameResult<Character> {
    let mut fields = SnapshotFields::default();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| GameError::InvalidSaveData(format!("Invalid line format: {}", line)))?;
        let key = key.trim().to_uppercase();
        let value = value.trim();

        match key.as_str() {
            "NAME" => fields.name = Some(value.to_string()),
            "CLASS" => fields.class = Some(value.to_string()),
            "LEVEL" => fields.level = Some(parse_int(&key, value)?),
            "HEALTH" => fields.health = Some(parse_int(&key, value)?),
            "MAX_HEALTH" => fields.max_health = Some(parse_int(&key, value)?),
            "STRENGTH" => fields.strength = Some(parse_int(&key, value)?),
            "MAGIC" => fields.magic = Some(parse_int(&key, value)?),
            "EXPERIENCE" => fields.experience = Some(parse_int(&key, value)?),
            "GOLD" => fields.gold = Some(parse_int(&key, value)?),
            "INVENTORY" => fields.inventory = Some(parse_list(value)),
            "ACTIVE_QUESTS" => fields.active_quests = Some(parse_list(value)),
            "COMPLETED_QUESTS" => fields.completed_quests = Some(parse_list(value)),
            "EQUIPPED_WEAPON" => fields.weapon = Some(value.to_string()),
            "WEAPON_BONUS" => fields.weapon_bonus = Some(parse_bonus(&key, value)?),
            "EQUIPPED_ARMOR" => fields.armor = Some(value.to_string()),
            "ARMOR_BONUS" => fields.armor_bonus = Some(parse_bonus(&key, value)?),
            _ => debug!(key = %key, "ignoring unknown save field"),
        }
    }

    let name = require(fields.name, "NAME")?;
    if name.is_empty() {
        return Err(GameError::InvalidSaveData("NAME is empty".to_string()));
    }
    let class_name = require(fields.class, "CLASS")?;
    let class = class_name
        .parse::<CharacterClass>()
        .map_err(|_| GameError::InvalidSaveData(format!("Unknown class: {}", class_name)))?;

    let character = Character {
        name,
        class,
        level: require(fields.level, "LEVEL")?,
        experience: require(fields.experience, "EXPERIENCE")?,
        health: require(fields.health, "HEALTH")?,
        max_health: require(fields.max_health, "MAX_HEALTH")?,
        strength: require(fields.strength, "STRENGTH")?,
        magic: require(fields.magic, "MAGIC")?,
        gold: require(fields.gold, "GOLD")?,
        inventory: require(fields.inventory, "INVENTORY")?,
        active_quests: require(fields.active_quests, "ACTIVE_QUESTS")?,
        completed_quests: require(fields.completed_quests, "COMPLETED_QUESTS")?,
        equipped_weapon: equipped(fields.weapon, fields.weapon_bonus, "Weapon")?,
        equipped_armor: equipped(fields.armor, fields.armor_bonus, "Armor")?,
    };

    validate_snapshot(&character)?;
    Ok(character)
}

fn validate_snapshot(character: &Character) -> GameResult<()> {
    if character.level == 0 {
        return Err(GameError::InvalidSaveData("LEVEL must be at least 1".to_string()));
    }
    if character.health > character.max_health {
        return Err(GameError::InvalidSaveData(format!(
            "HEALTH {} exceeds MAX_HEALTH {}",
            character.health, character.max_health
        )));
    }
    if character.inventory.len() > MAX_INVENTORY_SIZE {
        return Err(GameError::InvalidSaveData(format!(
            "INVENTORY holds {} items, capacity is {}",
            character.inventory.len(),
            MAX_INVENTORY_SIZE
        )));
    }

    check_unique(&character.active_quests, "ACTIVE_QUESTS")?;
    check_unique(&character.completed_quests, "COMPLETED_QUESTS")?;
    if let Some(id) = character
        .active_quests
        .iter()
        .find(|id| character.completed_quests.contains(id))
    {
        return Err(GameError::InvalidSaveData(format!(
            "Quest {} is both active and completed",
            id
        )));
    }

    Ok(())
}

/// Stores character snapshots as `{name}_save.txt` files in one directory.
#[derive(Debug, Clone)]
pub struct SaveManager {
    save_dir: PathBuf,
}

impl SaveManager {
    /// Save store in the platform data directory.
    pub fn new() -> Self {
        Self::with_dir(default_save_dir())
    }

    pub fn with_dir(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
        }
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    fn save_path(&self, name: &str) -> PathBuf {
        self.save_dir.join(format!("{}{}", name, SAVE_FILE_SUFFIX))
    }

    pub fn save_exists(&self, name: &str) -> bool {
        self.save_path(name).exists()
    }

    /// Writes the character's snapshot, creating the directory if needed.
    pub fn save_character(&self, character: &Character) -> GameResult<PathBuf> {
        validate_name(&character.name)?;
        fs::create_dir_all(&self.save_dir)?;

        let path = self.save_path(&character.name);
        fs::write(&path, serialize_character(character))?;
        info!(name = %character.name, path = %path.display(), "character saved");
        Ok(path)
    }

    /// Loads a character by name.
    ///
    /// Returns `CharacterNotFound` when there is no save, `SaveFileCorrupted`
    /// when the file cannot be read as text, and `InvalidSaveData` when its
    /// contents are malformed.
    pub fn load_character(&self, name: &str) -> GameResult<Character> {
        validate_name(name)?;
        let path = self.save_path(name);
        if !path.exists() {
            return Err(GameError::CharacterNotFound(name.to_string()));
        }

        let text = fs::read_to_string(&path).map_err(|e| {
            warn!(name, error = %e, "save file unreadable");
            GameError::SaveFileCorrupted(format!("{}: {}", path.display(), e))
        })?;

        let character = deserialize_character(&text)?;
        info!(name, level = character.level, "character loaded");
        Ok(character)
    }

    /// Names of every saved character, sorted. Empty if the directory is missing.
    pub fn list_saved_characters(&self) -> GameResult<Vec<String>> {
        if !self.save_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.save_dir)? {
            let entry = entry?;
            let filename = entry.file_name();
            let Some(filename) = filename.to_str() else {
                continue;
            };
            if let Some(name) = filename.strip_suffix(SAVE_FILE_SUFFIX) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    pub fn delete_character(&self, name: &str) -> GameResult<()> {
        validate_name(name)?;
        let path = self.save_path(name);
        if !path.exists() {
            return Err(GameError::CharacterNotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        info!(name, "character deleted");
        Ok(())
    }
}

impl Default for SaveManager {
    fn default() -> Self {
        Self::new()
    }
}

//! Quest and item definition files.
//!
//! Both formats are blocks of `KEY: value` lines separated by blank lines.

use crate::core::constants::{ITEMS_FILE_NAME, QUESTS_FILE_NAME};
use crate::error::{GameError, GameResult};
use crate::items::{ItemCatalog, ItemDef, ItemType, StatEffect};
use crate::quests::{QuestCatalog, QuestDef};
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

pub const DEFAULT_QUESTS: &str = "\
QUEST_ID: intro_quest
TITLE: First Steps
DESCRIPTION: Your journey begins in a quiet village.
REWARD_XP: 50
REWARD_GOLD: 10
REQUIRED_LEVEL: 1
PREREQUISITE: NONE

QUEST_ID: goblin_menace
TITLE: Goblin Menace
DESCRIPTION: Clear the nearby woods of goblins.
REWARD_XP: 100
REWARD_GOLD: 25
REQUIRED_LEVEL: 2
PREREQUISITE: intro_quest
";

pub const DEFAULT_ITEMS: &str = "\
ITEM_ID: rusty_sword
NAME: Rusty Sword
TYPE: weapon
EFFECT: strength:2
COST: 15
DESCRIPTION: A worn blade, but better than nothing.

ITEM_ID: leather_armor
NAME: Leather Armor
TYPE: armor
EFFECT: health:10
COST: 30
DESCRIPTION: Basic protection for new adventurers.

ITEM_ID: minor_potion
NAME: Minor Healing Potion
TYPE: consumable
EFFECT: health:20
COST: 10
DESCRIPTION: Restores a small amount of health.
";

/// Groups non-blank lines into blocks, trimming each line.
fn blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn split_line<'a>(line: &'a str, kind: &str) -> GameResult<(String, &'a str)> {
    let (key, value) = line.split_once(": ").ok_or_else(|| {
        GameError::InvalidDataFormat(format!("Invalid {} line format: {}", kind, line))
    })?;
    Ok((key.trim().to_uppercase(), value.trim()))
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> GameResult<T> {
    value
        .parse()
        .map_err(|_| GameError::InvalidDataFormat(format!("{} must be an integer", key)))
}

fn required<T>(field: Option<T>, kind: &str, name: &str) -> GameResult<T> {
    field.ok_or_else(|| {
        GameError::InvalidDataFormat(format!("Missing required {} field: {}", kind, name))
    })
}

/// Parses one quest block.
pub fn parse_quest_block(lines: &[&str]) -> GameResult<QuestDef> {
    let mut quest_id = None;
    let mut title = None;
    let mut description = None;
    let mut reward_xp = None;
    let mut reward_gold = None;
    let mut required_level = None;
    let mut prerequisite = None;

    for line in lines {
        let (key, value) = split_line(line, "quest")?;
        match key.as_str() {
            "QUEST_ID" => quest_id = Some(value.to_string()),
            "TITLE" => title = Some(value.to_string()),
            "DESCRIPTION" => description = Some(value.to_string()),
            "REWARD_XP" => reward_xp = Some(parse_number(&key, value)?),
            "REWARD_GOLD" => reward_gold = Some(parse_number(&key, value)?),
            "REQUIRED_LEVEL" => required_level = Some(parse_number(&key, value)?),
            "PREREQUISITE" => {
                let prereq = (!value.eq_ignore_ascii_case("none")).then(|| value.to_string());
                prerequisite = Some(prereq);
            }
            _ => {
                return Err(GameError::InvalidDataFormat(format!(
                    "Unknown quest field: {}",
                    key
                )))
            }
        }
    }

    Ok(QuestDef {
        quest_id: required(quest_id, "quest", "quest_id")?,
        title: required(title, "quest", "title")?,
        description: required(description, "quest", "description")?,
        reward_xp: required(reward_xp, "quest", "reward_xp")?,
        reward_gold: required(reward_gold, "quest", "reward_gold")?,
        required_level: required(required_level, "quest", "required_level")?,
        prerequisite: required(prerequisite, "quest", "prerequisite")?,
    })
}

/// Parses one item block.
pub fn parse_item_block(lines: &[&str]) -> GameResult<ItemDef> {
    let mut item_id = None;
    let mut name = None;
    let mut item_type = None;
    let mut effect = None;
    let mut cost = None;
    let mut description = None;

    for line in lines {
        let (key, value) = split_line(line, "item")?;
        match key.as_str() {
            "ITEM_ID" => item_id = Some(value.to_string()),
            "NAME" => name = Some(value.to_string()),
            "TYPE" => item_type = Some(value.parse::<ItemType>()?),
            "EFFECT" => effect = Some(value.parse::<StatEffect>()?),
            "COST" => cost = Some(parse_number(&key, value)?),
            "DESCRIPTION" => description = Some(value.to_string()),
            _ => {
                return Err(GameError::InvalidDataFormat(format!(
                    "Unknown item field: {}",
                    key
                )))
            }
        }
    }

    Ok(ItemDef {
        item_id: required(item_id, "item", "item_id")?,
        name: required(name, "item", "name")?,
        item_type: required(item_type, "item", "type")?,
        effect: required(effect, "item", "effect")?,
        cost: required(cost, "item", "cost")?,
        description: required(description, "item", "description")?,
    })
}

/// Parses a whole quest file. Duplicate ids are rejected.
pub fn parse_quests(content: &str) -> GameResult<QuestCatalog> {
    let mut quests = QuestCatalog::new();
    for block in blocks(content) {
        let quest = parse_quest_block(&block)?;
        if quests.contains_key(&quest.quest_id) {
            return Err(GameError::InvalidDataFormat(format!(
                "Duplicate quest id: {}",
                quest.quest_id
            )));
        }
        quests.insert(quest.quest_id.clone(), quest);
    }
    Ok(quests)
}

/// Parses a whole item file. Duplicate ids are rejected.
pub fn parse_items(content: &str) -> GameResult<ItemCatalog> {
    let mut items = ItemCatalog::new();
    for block in blocks(content) {
        let item = parse_item_block(&block)?;
        if items.contains_key(&item.item_id) {
            return Err(GameError::InvalidDataFormat(format!(
                "Duplicate item id: {}",
                item.item_id
            )));
        }
        items.insert(item.item_id.clone(), item);
    }
    Ok(items)
}

fn read_data_file(path: &Path) -> GameResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => GameError::MissingDataFile(path.display().to_string()),
        _ => GameError::CorruptedData(format!("{}: {}", path.display(), e)),
    })
}

pub fn load_quests(path: &Path) -> GameResult<QuestCatalog> {
    let quests = parse_quests(&read_data_file(path)?)?;
    debug!(path = %path.display(), count = quests.len(), "quests loaded");
    Ok(quests)
}

pub fn load_items(path: &Path) -> GameResult<ItemCatalog> {
    let items = parse_items(&read_data_file(path)?)?;
    debug!(path = %path.display(), count = items.len(), "items loaded");
    Ok(items)
}

/// Loads `quests.txt` and `items.txt` from `data_dir`.
pub fn load_game_data(data_dir: &Path) -> GameResult<(QuestCatalog, ItemCatalog)> {
    let quests = load_quests(&data_dir.join(QUESTS_FILE_NAME))?;
    let items = load_items(&data_dir.join(ITEMS_FILE_NAME))?;
    Ok((quests, items))
}

/// Writes the starter quest and item files into `data_dir`.
///
/// Existing files are left alone.
pub fn write_default_data_files(data_dir: &Path) -> GameResult<()> {
    let write_err = |e: io::Error| {
        GameError::CorruptedData(format!("creating default data files: {}", e))
    };

    fs::create_dir_all(data_dir).map_err(write_err)?;
    let defaults = [
        (QUESTS_FILE_NAME, DEFAULT_QUESTS),
        (ITEMS_FILE_NAME, DEFAULT_ITEMS),
    ];
    for (file_name, content) in defaults {
        let path = data_dir.join(file_name);
        if path.exists() {
            continue;
        }
        fs::write(&path, content).map_err(write_err)?;
        info!(path = %path.display(), "default data file written");
    }
    Ok(())
}

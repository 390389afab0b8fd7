//! Character creation, leveling, gold, healing, death and revival.

use super::types::{Character, CharacterClass};
use crate::core::constants::*;
use crate::error::{GameError, GameResult};
use tracing::{debug, info};

/// Creates a level-1 character of the named class.
///
/// Class names are matched case-insensitively; anything outside
/// Warrior/Mage/Rogue/Cleric fails with `InvalidClass`. The name must pass
/// [`validate_name`] and is stored trimmed.
pub fn create_character(name: &str, class: &str) -> GameResult<Character> {
    validate_name(name)?;
    let name = name.trim();
    let class: CharacterClass = class.parse()?;
    let character = Character::new(name, class);
    info!(name, class = %class, "character created");
    Ok(character)
}

/// Adds experience and applies every level-up it pays for.
///
/// Returns true if at least one level was gained.
pub fn gain_experience(character: &mut Character, amount: u32) -> GameResult<bool> {
    if is_dead(character) {
        return Err(GameError::CharacterDead(character.name.clone()));
    }

    character.experience = character.experience.saturating_add(amount);

    let mut leveled = false;
    while character.experience >= character.xp_to_next_level() {
        character.experience -= character.xp_to_next_level();
        character.level += 1;
        character.max_health += LEVEL_UP_MAX_HEALTH;
        character.strength += LEVEL_UP_STRENGTH;
        character.magic += LEVEL_UP_MAGIC;
        character.health = character.max_health;
        leveled = true;
        info!(name = %character.name, level = character.level, "level up");
    }

    Ok(leveled)
}

/// Adds (or, with a negative amount, spends) gold.
///
/// Fails without changing anything if the total would go negative or past
/// `u32::MAX`.
pub fn add_gold(character: &mut Character, amount: i64) -> GameResult<u32> {
    character.gold = gold_after(character, amount)?;
    debug!(name = %character.name, amount, gold = character.gold, "gold changed");
    Ok(character.gold)
}

/// The gold total `amount` would leave, without applying it.
pub(crate) fn gold_after(character: &Character, amount: i64) -> GameResult<u32> {
    let current = i64::from(character.gold);
    let overflow = || GameError::GoldOverflow {
        amount,
        available: current,
    };

    let new_total = current.checked_add(amount).ok_or_else(overflow)?;
    if new_total < 0 {
        return Err(GameError::InsufficientResources {
            needed: amount.saturating_neg(),
            available: current,
        });
    }
    u32::try_from(new_total).map_err(|_| overflow())
}

/// Heals up to `amount`, never past max health. Returns the amount applied.
pub fn heal_character(character: &mut Character, amount: i32) -> u32 {
    if amount <= 0 {
        return 0;
    }

    let missing = character.max_health.saturating_sub(character.health);
    let healed = missing.min(amount.unsigned_abs());
    character.health += healed;
    healed
}

pub fn is_dead(character: &Character) -> bool {
    character.health == 0
}

/// Brings a dead character back at half max health (at least 1).
///
/// Returns false, and does nothing, if the character is alive.
pub fn revive_character(character: &mut Character) -> bool {
    if !is_dead(character) {
        return false;
    }

    character.health = (character.max_health / 2).max(1);
    info!(name = %character.name, health = character.health, "character revived");
    true
}

/// Checks a name is usable as a save key.
pub fn validate_name(name: &str) -> GameResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(GameError::InvalidName("Name cannot be empty".to_string()));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(GameError::InvalidName(format!(
            "Name must be {} characters or less",
            MAX_NAME_LENGTH
        )));
    }

    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');

    if !valid_chars {
        return Err(GameError::InvalidName(
            "Name can only contain letters, numbers, spaces, hyphens, and underscores".to_string(),
        ));
    }

    Ok(())
}

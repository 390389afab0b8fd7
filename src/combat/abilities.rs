//! Class special abilities.
//!
//! Damage abilities bypass the defense subtraction of a basic attack.
//! Cooldown is tracked per battle by the caller.

use super::types::{AbilityOutcome, Enemy};
use crate::character::logic::heal_character;
use crate::character::{Character, CharacterClass};
use crate::core::combat_math::{roll_chance, scaled_damage};
use crate::core::constants::*;
use rand::Rng;

/// Runs the character's class ability against `enemy`.
pub fn use_special_ability(
    character: &mut Character,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> AbilityOutcome {
    let ability = character.class().ability_name();
    match character.class() {
        CharacterClass::Warrior => AbilityOutcome::Damage {
            ability,
            damage: warrior_power_strike(character, enemy),
            critical: false,
        },
        CharacterClass::Mage => AbilityOutcome::Damage {
            ability,
            damage: mage_fireball(character, enemy),
            critical: false,
        },
        CharacterClass::Rogue => {
            let (damage, critical) = rogue_critical_strike(character, enemy, rng);
            AbilityOutcome::Damage {
                ability,
                damage,
                critical,
            }
        }
        CharacterClass::Cleric => AbilityOutcome::Heal {
            ability,
            amount: cleric_heal(character),
        },
    }
}

/// Strength x2. Returns damage dealt.
pub fn warrior_power_strike(character: &Character, enemy: &mut Enemy) -> u32 {
    let damage = scaled_damage(character.strength(), POWER_STRIKE_MULTIPLIER);
    enemy.take_damage(damage);
    damage
}

/// Magic x2. Returns damage dealt.
pub fn mage_fireball(character: &Character, enemy: &mut Enemy) -> u32 {
    let damage = scaled_damage(character.magic(), FIREBALL_MULTIPLIER);
    enemy.take_damage(damage);
    damage
}

/// Strength x3 on a successful roll, plain strength otherwise.
///
/// Returns `(damage, was_critical)`.
pub fn rogue_critical_strike(
    character: &Character,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> (u32, bool) {
    let critical = roll_chance(CRITICAL_STRIKE_CHANCE, rng);
    let multiplier = if critical {
        CRITICAL_STRIKE_MULTIPLIER
    } else {
        1
    };
    let damage = scaled_damage(character.strength(), multiplier);
    enemy.take_damage(damage);
    (damage, critical)
}

/// Restores health to the caster, capped at max health. Returns the amount.
pub fn cleric_heal(character: &mut Character) -> u32 {
    heal_character(character, CLERIC_HEAL_AMOUNT as i32)
}

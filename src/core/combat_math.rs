//! Shared combat math functions.
//!
//! These pure functions calculate combat outcomes without side effects.
//! Both basic attacks and class abilities go through them.

use super::constants::{DEFENSE_DIVISOR, MIN_DAMAGE};
use rand::Rng;

/// Calculate basic attack damage.
///
/// # Arguments
/// * `attacker_strength` - Strength of the attacking side
/// * `defender_strength` - Strength of the defending side (a quarter of it is subtracted)
///
/// # Returns
/// Damage dealt (minimum 1)
pub fn calculate_damage(attacker_strength: u32, defender_strength: u32) -> u32 {
    attacker_strength
        .saturating_sub(defender_strength / DEFENSE_DIVISOR)
        .max(MIN_DAMAGE)
}

/// Damage for abilities that bypass defense: `stat * multiplier`, minimum 1.
pub fn scaled_damage(stat: u32, multiplier: u32) -> u32 {
    stat.saturating_mul(multiplier).max(MIN_DAMAGE)
}

/// Apply damage to HP, returning remaining HP.
///
/// # Returns
/// HP remaining after damage (minimum 0)
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Check if entity is still alive.
pub fn is_alive(current_hp: u32) -> bool {
    current_hp > 0
}

/// Roll an independent chance in `[0.0, 1.0]`.
pub fn roll_chance(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen_bool(chance.clamp(0.0, 1.0))
}

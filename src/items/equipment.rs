use super::inventory::{add_item, has_item, remove_item};
use super::types::{ItemDef, ItemType, Stat, StatEffect};
use crate::character::{Character, EquippedItem};
use crate::core::constants::MAX_INVENTORY_SIZE;
use crate::error::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

impl EquipmentSlot {
    /// The item type this slot accepts.
    pub fn item_type(&self) -> ItemType {
        match self {
            EquipmentSlot::Weapon => ItemType::Weapon,
            EquipmentSlot::Armor => ItemType::Armor,
        }
    }

    pub fn for_item_type(item_type: ItemType) -> Option<EquipmentSlot> {
        match item_type {
            ItemType::Weapon => Some(EquipmentSlot::Weapon),
            ItemType::Armor => Some(EquipmentSlot::Armor),
            ItemType::Consumable => None,
        }
    }
}

impl Character {
    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&EquippedItem> {
        match slot {
            EquipmentSlot::Weapon => self.equipped_weapon.as_ref(),
            EquipmentSlot::Armor => self.equipped_armor.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<EquippedItem> {
        match slot {
            EquipmentSlot::Weapon => &mut self.equipped_weapon,
            EquipmentSlot::Armor => &mut self.equipped_armor,
        }
    }
}

/// Applies a signed change to a named stat and returns the change that
/// actually landed.
///
/// Only health, max_health, strength and magic are recognised; anything
/// else is ignored and reports 0. Stats stop at 0 and health stays within
/// `0..=max_health`, so the returned delta can be smaller than `value`.
pub fn apply_stat_effect(character: &mut Character, stat: &str, value: i32) -> i32 {
    let Some(stat) = Stat::from_name(stat) else {
        return 0;
    };

    let target = match stat {
        Stat::Health => &mut character.health,
        Stat::MaxHealth => &mut character.max_health,
        Stat::Strength => &mut character.strength,
        Stat::Magic => &mut character.magic,
    };
    let before = *target;
    *target = target.saturating_add_signed(value);
    let after = *target;

    character.health = character.health.min(character.max_health);
    stat_delta(before, after)
}

// |after - before| never exceeds |value|, so it fits back into an i32.
fn stat_delta(before: u32, after: u32) -> i32 {
    (i64::from(after) - i64::from(before)) as i32
}

/// Applies `effect` and returns the effect as it actually landed.
fn apply_effect(character: &mut Character, effect: &StatEffect) -> StatEffect {
    let applied = apply_stat_effect(character, &effect.stat, effect.value);
    StatEffect::new(effect.stat.clone(), applied)
}

/// Equips `item_id` into `slot`, swapping out whatever is there.
///
/// The swapped-out item goes back to the inventory. If that cannot happen
/// (inventory full) nothing changes and `InventoryFull` is returned.
/// Returns the id of the item that was swapped out, if any.
pub fn equip(
    character: &mut Character,
    slot: EquipmentSlot,
    item_id: &str,
    item: &ItemDef,
) -> GameResult<Option<String>> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    if item.item_type != slot.item_type() {
        return Err(GameError::InvalidItemType {
            item_id: item_id.to_string(),
            expected: slot.item_type().to_string(),
        });
    }
    if character.equipped(slot).is_some() && character.inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(GameError::InventoryFull {
            capacity: MAX_INVENTORY_SIZE,
        });
    }

    let previous = character.slot_mut(slot).take();
    if let Some(old) = &previous {
        apply_effect(character, &old.bonus.reversed());
        add_item(character, &old.item_id)?;
    }

    let bonus = apply_effect(character, &item.effect);
    *character.slot_mut(slot) = Some(EquippedItem {
        item_id: item_id.to_string(),
        bonus,
    });
    remove_item(character, item_id)?;

    info!(
        name = %character.name,
        ?slot,
        item_id,
        effect = %item.effect,
        "item equipped"
    );
    Ok(previous.map(|old| old.item_id))
}

pub fn equip_weapon(
    character: &mut Character,
    item_id: &str,
    item: &ItemDef,
) -> GameResult<Option<String>> {
    equip(character, EquipmentSlot::Weapon, item_id, item)
}

pub fn equip_armor(
    character: &mut Character,
    item_id: &str,
    item: &ItemDef,
) -> GameResult<Option<String>> {
    equip(character, EquipmentSlot::Armor, item_id, item)
}

/// Empties `slot`, reversing its bonus and returning the item to inventory.
///
/// Returns `Ok(None)` if nothing was equipped. With a full inventory this
/// fails and leaves both the equipped item and its bonus in place.
pub fn unequip(character: &mut Character, slot: EquipmentSlot) -> GameResult<Option<String>> {
    if character.equipped(slot).is_some() && character.inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(GameError::InventoryFull {
            capacity: MAX_INVENTORY_SIZE,
        });
    }

    let Some(old) = character.slot_mut(slot).take() else {
        return Ok(None);
    };
    apply_effect(character, &old.bonus.reversed());
    add_item(character, &old.item_id)?;

    info!(name = %character.name, ?slot, item_id = %old.item_id, "item unequipped");
    Ok(Some(old.item_id))
}

pub fn unequip_weapon(character: &mut Character) -> GameResult<Option<String>> {
    unequip(character, EquipmentSlot::Weapon)
}

pub fn unequip_armor(character: &mut Character) -> GameResult<Option<String>> {
    unequip(character, EquipmentSlot::Armor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;

    fn hero() -> Character {
        Character::new("Hero", CharacterClass::Warrior)
    }

    fn weapon(id: &str, strength: i32) -> ItemDef {
        ItemDef {
            item_id: id.to_string(),
            name: id.to_string(),
            item_type: ItemType::Weapon,
            effect: StatEffect::new("strength", strength),
            cost: 20,
            description: String::new(),
        }
    }

    fn armor(id: &str, max_health: i32) -> ItemDef {
        ItemDef {
            item_id: id.to_string(),
            name: id.to_string(),
            item_type: ItemType::Armor,
            effect: StatEffect::new("max_health", max_health),
            cost: 30,
            description: String::new(),
        }
    }

    #[test]
    fn test_apply_stat_effect_health_clamps() {
        let mut c = hero();
        c.take_damage(10);
        apply_stat_effect(&mut c, "health", 50);
        assert_eq!(c.health(), 120);
        apply_stat_effect(&mut c, "health", -500);
        assert_eq!(c.health(), 0);
    }

    #[test]
    fn test_apply_stat_effect_max_health_drags_health_down() {
        let mut c = hero();
        apply_stat_effect(&mut c, "max_health", -20);
        assert_eq!(c.max_health(), 100);
        assert_eq!(c.health(), 100);

        apply_stat_effect(&mut c, "max_health", 30);
        assert_eq!(c.max_health(), 130);
        assert_eq!(c.health(), 100);
    }

    #[test]
    fn test_apply_stat_effect_unknown_ignored() {
        let mut c = hero();
        let before = c.clone();
        assert_eq!(apply_stat_effect(&mut c, "charisma", 99), 0);
        assert_eq!(c, before);
    }

    #[test]
    fn test_apply_stat_effect_reports_landed_delta() {
        let mut c = hero();
        assert_eq!(apply_stat_effect(&mut c, "magic", -10), -5);
        assert_eq!(c.magic(), 0);
        assert_eq!(apply_stat_effect(&mut c, "health", 10), 0);
        assert_eq!(apply_stat_effect(&mut c, "strength", 3), 3);
    }

    #[test]
    fn test_negative_bonus_cycles_restore_stats() {
        let mut c = hero();
        let cursed = ItemDef {
            effect: StatEffect::new("magic", -10),
            ..weapon("cursed_blade", 0)
        };
        let before = c.clone();

        for _ in 0..3 {
            add_item(&mut c, "cursed_blade").unwrap();
            equip_weapon(&mut c, "cursed_blade", &cursed).unwrap();
            assert_eq!(c.magic(), 0);
            assert_eq!(c.equipped_weapon().unwrap().bonus, StatEffect::new("magic", -5));
            unequip_weapon(&mut c).unwrap();
            remove_item(&mut c, "cursed_blade").unwrap();
        }
        assert_eq!(c, before);
    }

    #[test]
    fn test_health_bonus_at_full_health_costs_nothing() {
        let mut c = hero();
        let leather = ItemDef {
            effect: StatEffect::new("health", 10),
            ..armor("leather_armor", 0)
        };
        add_item(&mut c, "leather_armor").unwrap();

        for _ in 0..3 {
            equip_armor(&mut c, "leather_armor", &leather).unwrap();
            assert_eq!(c.health(), 120);
            unequip_armor(&mut c).unwrap();
            assert_eq!(c.health(), 120);
        }
    }

    #[test]
    fn test_health_bonus_when_hurt_is_reversed() {
        let mut c = hero();
        let leather = ItemDef {
            effect: StatEffect::new("health", 10),
            ..armor("leather_armor", 0)
        };
        add_item(&mut c, "leather_armor").unwrap();
        c.take_damage(4);

        equip_armor(&mut c, "leather_armor", &leather).unwrap();
        assert_eq!(c.health(), 120);
        assert_eq!(c.equipped_armor().unwrap().bonus, StatEffect::new("health", 4));
        unequip_armor(&mut c).unwrap();
        assert_eq!(c.health(), 116);
    }

    #[test]
    fn test_equip_weapon_applies_bonus() {
        let mut c = hero();
        let sword = weapon("iron_sword", 5);
        add_item(&mut c, "iron_sword").unwrap();

        assert_eq!(equip_weapon(&mut c, "iron_sword", &sword).unwrap(), None);
        assert_eq!(c.strength(), 20);
        assert!(!has_item(&c, "iron_sword"));
        let equipped = c.equipped_weapon().unwrap();
        assert_eq!(equipped.item_id, "iron_sword");
        assert_eq!(equipped.bonus, StatEffect::new("strength", 5));
    }

    #[test]
    fn test_equip_swap_reverses_old_bonus() {
        let mut c = hero();
        let rusty = weapon("rusty_sword", 2);
        let iron = weapon("iron_sword", 5);
        add_item(&mut c, "rusty_sword").unwrap();
        add_item(&mut c, "iron_sword").unwrap();

        equip_weapon(&mut c, "rusty_sword", &rusty).unwrap();
        assert_eq!(c.strength(), 17);

        let swapped = equip_weapon(&mut c, "iron_sword", &iron).unwrap();
        assert_eq!(swapped.as_deref(), Some("rusty_sword"));
        assert_eq!(c.strength(), 20);
        assert!(has_item(&c, "rusty_sword"));
        assert!(!has_item(&c, "iron_sword"));
        assert_eq!(c.equipped_weapon().unwrap().item_id, "iron_sword");
    }

    #[test]
    fn test_equip_wrong_type() {
        let mut c = hero();
        let plate = armor("plate", 20);
        add_item(&mut c, "plate").unwrap();
        let result = equip_weapon(&mut c, "plate", &plate);
        assert!(matches!(result, Err(GameError::InvalidItemType { .. })));
        assert!(c.equipped_weapon().is_none());
    }

    #[test]
    fn test_equip_missing_item() {
        let mut c = hero();
        let result = equip_armor(&mut c, "plate", &armor("plate", 20));
        assert!(matches!(result, Err(GameError::ItemNotFound(_))));
    }

    #[test]
    fn test_equip_swap_full_inventory_is_atomic() {
        let mut c = hero();
        let rusty = weapon("rusty_sword", 2);
        let iron = weapon("iron_sword", 5);
        add_item(&mut c, "rusty_sword").unwrap();
        equip_weapon(&mut c, "rusty_sword", &rusty).unwrap();

        add_item(&mut c, "iron_sword").unwrap();
        while c.inventory().len() < MAX_INVENTORY_SIZE {
            add_item(&mut c, "pebble").unwrap();
        }
        let before = c.clone();

        let result = equip_weapon(&mut c, "iron_sword", &iron);
        assert!(matches!(result, Err(GameError::InventoryFull { .. })));
        assert_eq!(c, before);
    }

    #[test]
    fn test_equip_armor_max_health() {
        let mut c = hero();
        let plate = armor("plate", 25);
        add_item(&mut c, "plate").unwrap();
        equip_armor(&mut c, "plate", &plate).unwrap();
        assert_eq!(c.max_health(), 145);

        assert_eq!(unequip_armor(&mut c).unwrap().as_deref(), Some("plate"));
        assert_eq!(c.max_health(), 120);
        assert_eq!(c.health(), 120);
        assert!(has_item(&c, "plate"));
    }

    #[test]
    fn test_unequip_nothing() {
        let mut c = hero();
        assert_eq!(unequip_weapon(&mut c).unwrap(), None);
    }

    #[test]
    fn test_unequip_full_inventory_keeps_bonus() {
        let mut c = hero();
        let sword = weapon("iron_sword", 5);
        add_item(&mut c, "iron_sword").unwrap();
        equip_weapon(&mut c, "iron_sword", &sword).unwrap();
        while c.inventory().len() < MAX_INVENTORY_SIZE {
            add_item(&mut c, "pebble").unwrap();
        }

        let result = unequip_weapon(&mut c);
        assert!(matches!(result, Err(GameError::InventoryFull { .. })));
        assert_eq!(c.strength(), 20);
        assert_eq!(c.equipped_weapon().unwrap().item_id, "iron_sword");
    }

    #[test]
    fn test_slot_for_item_type() {
        assert_eq!(
            EquipmentSlot::for_item_type(ItemType::Weapon),
            Some(EquipmentSlot::Weapon)
        );
        assert_eq!(
            EquipmentSlot::for_item_type(ItemType::Armor),
            Some(EquipmentSlot::Armor)
        );
        assert_eq!(EquipmentSlot::for_item_type(ItemType::Consumable), None);
    }
}

//! Capacity-bounded inventory of item ids.

use super::equipment::apply_stat_effect;
use super::types::{ItemCatalog, ItemDef, ItemType};
use crate::character::Character;
use crate::core::constants::MAX_INVENTORY_SIZE;
use crate::error::{GameError, GameResult};
use tracing::debug;

/// One line of an inventory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub item_id: String,
    pub name: String,
    /// None when the id has no definition in the catalog
    pub item_type: Option<ItemType>,
    pub quantity: usize,
}

pub fn add_item(character: &mut Character, item_id: &str) -> GameResult<()> {
    if character.inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(GameError::InventoryFull {
            capacity: MAX_INVENTORY_SIZE,
        });
    }
    character.inventory.push(item_id.to_string());
    debug!(name = %character.name, item_id, "item added");
    Ok(())
}

/// Removes one occurrence of `item_id`.
pub fn remove_item(character: &mut Character, item_id: &str) -> GameResult<()> {
    let index = character
        .inventory
        .iter()
        .position(|id| id == item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    character.inventory.remove(index);
    debug!(name = %character.name, item_id, "item removed");
    Ok(())
}

pub fn has_item(character: &Character, item_id: &str) -> bool {
    character.inventory.iter().any(|id| id == item_id)
}

pub fn count_item(character: &Character, item_id: &str) -> usize {
    character
        .inventory
        .iter()
        .filter(|id| id.as_str() == item_id)
        .count()
}

pub fn space_remaining(character: &Character) -> usize {
    MAX_INVENTORY_SIZE.saturating_sub(character.inventory.len())
}

/// Empties the inventory, returning what was in it.
pub fn clear_inventory(character: &mut Character) -> Vec<String> {
    std::mem::take(&mut character.inventory)
}

/// Uses one consumable: applies its effect, then removes it.
pub fn use_item(character: &mut Character, item_id: &str, item: &ItemDef) -> GameResult<()> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    if item.item_type != ItemType::Consumable {
        return Err(GameError::InvalidItemType {
            item_id: item_id.to_string(),
            expected: ItemType::Consumable.to_string(),
        });
    }

    apply_stat_effect(character, &item.effect.stat, item.effect.value);
    remove_item(character, item_id)?;
    debug!(name = %character.name, item_id, effect = %item.effect, "item used");
    Ok(())
}

/// Groups the inventory by id in first-seen order.
pub fn inventory_summary(character: &Character, catalog: &ItemCatalog) -> Vec<InventoryEntry> {
    let mut entries: Vec<InventoryEntry> = Vec::new();

    for item_id in &character.inventory {
        if let Some(entry) = entries.iter_mut().find(|e| &e.item_id == item_id) {
            entry.quantity += 1;
            continue;
        }

        let def = catalog.get(item_id);
        entries.push(InventoryEntry {
            item_id: item_id.clone(),
            name: def.map_or_else(|| item_id.clone(), |d| d.name.clone()),
            item_type: def.map(|d| d.item_type),
            quantity: 1,
        });
    }

    entries
}

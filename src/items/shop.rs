//! Buying and selling items for gold.

use super::inventory::{add_item, has_item, remove_item, space_remaining};
use super::types::ItemDef;
use crate::character::Character;
use crate::core::constants::MAX_INVENTORY_SIZE;
use crate::error::{GameError, GameResult};
use tracing::info;

/// Buys one `item_id` at the item's cost. Gold and inventory are untouched
/// on failure.
pub fn purchase_item(character: &mut Character, item_id: &str, item: &ItemDef) -> GameResult<()> {
    if character.gold < item.cost {
        return Err(GameError::InsufficientResources {
            needed: i64::from(item.cost),
            available: i64::from(character.gold),
        });
    }
    if space_remaining(character) == 0 {
        return Err(GameError::InventoryFull {
            capacity: MAX_INVENTORY_SIZE,
        });
    }

    character.gold -= item.cost;
    add_item(character, item_id)?;
    info!(name = %character.name, item_id, cost = item.cost, "item purchased");
    Ok(())
}

/// Sells one `item_id` for half its cost (rounded down). Returns the gold paid.
pub fn sell_item(character: &mut Character, item_id: &str, item: &ItemDef) -> GameResult<u32> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }

    let price = item.sell_price();
    remove_item(character, item_id)?;
    character.gold = character.gold.saturating_add(price);
    info!(name = %character.name, item_id, price, "item sold");
    Ok(price)
}

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Item definitions keyed by item id.
pub type ItemCatalog = BTreeMap<String, ItemDef>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Consumable => "consumable",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Ok(ItemType::Weapon),
            "armor" => Ok(ItemType::Armor),
            "consumable" => Ok(ItemType::Consumable),
            other => Err(GameError::InvalidDataFormat(format!(
                "Invalid item type: {}",
                other
            ))),
        }
    }
}

/// Character stats an item effect can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
}

impl Stat {
    /// Parses a stat name; unknown names yield None.
    pub fn from_name(name: &str) -> Option<Stat> {
        match name.trim() {
            "health" => Some(Stat::Health),
            "max_health" => Some(Stat::MaxHealth),
            "strength" => Some(Stat::Strength),
            "magic" => Some(Stat::Magic),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::MaxHealth => "max_health",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
        }
    }
}

/// A signed change to one named stat, written `stat:value` in data files.
///
/// The stat name is kept verbatim so effects on unknown stats survive a
/// load/save cycle; they are ignored when applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEffect {
    pub stat: String,
    pub value: i32,
}

impl StatEffect {
    pub fn new(stat: impl Into<String>, value: i32) -> Self {
        Self {
            stat: stat.into(),
            value,
        }
    }

    pub fn known_stat(&self) -> Option<Stat> {
        Stat::from_name(&self.stat)
    }

    /// The effect that exactly undoes this one.
    pub fn reversed(&self) -> Self {
        Self {
            stat: self.stat.clone(),
            value: -self.value,
        }
    }
}

impl fmt::Display for StatEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stat, self.value)
    }
}

impl FromStr for StatEffect {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stat, value) = s
            .split_once(':')
            .ok_or_else(|| GameError::InvalidDataFormat(format!("Invalid effect format: {}", s)))?;

        let stat = stat.trim();
        if stat.is_empty() {
            return Err(GameError::InvalidDataFormat(format!(
                "Effect has no stat name: {}",
                s
            )));
        }

        let value = value.trim().parse::<i32>().map_err(|_| {
            GameError::InvalidDataFormat(format!("Effect value must be an integer: {}", s))
        })?;

        Ok(StatEffect::new(stat, value))
    }
}

/// A static item definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub item_id: String,
    pub name: String,
    pub item_type: ItemType,
    pub effect: StatEffect,
    pub cost: u32,
    pub description: String,
}

impl ItemDef {
    /// Gold paid when selling one of these back.
    pub fn sell_price(&self) -> u32 {
        self.cost / crate::core::constants::SELL_PRICE_DIVISOR
    }
}

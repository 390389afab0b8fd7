//! A play session: one character plus the static catalogs it acts against.

use crate::character::logic::{
    add_gold, create_character, gain_experience, is_dead, revive_character,
};
use crate::character::{Character, SaveManager};
use crate::combat::{enemy_for_level, Battle, BattleController, BattleResult, Enemy};
use crate::core::config::SessionConfig;
use crate::core::constants::REVIVE_COST;
use crate::data::{load_game_data, write_default_data_files};
use crate::error::{GameError, GameResult};
use crate::items::{
    equip, purchase_item, sell_item, unequip, use_item, EquipmentSlot, ItemCatalog, ItemDef,
};
use crate::quests::{self, QuestCatalog, QuestRewards};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::info;

fn lookup_item<'a>(items: &'a ItemCatalog, item_id: &str) -> GameResult<&'a ItemDef> {
    items
        .get(item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))
}

/// Owns the active character for the length of play.
pub struct GameSession<R: Rng = StdRng> {
    character: Character,
    quests: QuestCatalog,
    items: ItemCatalog,
    config: SessionConfig,
    rng: R,
}

impl GameSession<StdRng> {
    /// Session seeded from `config.seed`, or from entropy when unset.
    pub fn new(
        character: Character,
        quests: QuestCatalog,
        items: ItemCatalog,
        config: SessionConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(character, quests, items, config, rng)
    }

    /// Creates a fresh character and loads game data from `config.data_dir`,
    /// writing the default data files first if they are missing.
    pub fn new_game(name: &str, class: &str, config: SessionConfig) -> GameResult<Self> {
        let character = create_character(name, class)?;
        write_default_data_files(&config.data_dir)?;
        let (quests, items) = load_game_data(&config.data_dir)?;
        info!(name, class, "new game");
        Ok(Self::new(character, quests, items, config))
    }

    /// Resumes a saved character.
    pub fn load(
        store: &SaveManager,
        name: &str,
        quests: QuestCatalog,
        items: ItemCatalog,
        config: SessionConfig,
    ) -> GameResult<Self> {
        let character = store.load_character(name)?;
        Ok(Self::new(character, quests, items, config))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(
        character: Character,
        quests: QuestCatalog,
        items: ItemCatalog,
        config: SessionConfig,
        rng: R,
    ) -> Self {
        Self {
            character,
            quests,
            items,
            config,
            rng,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn quests(&self) -> &QuestCatalog {
        &self.quests
    }

    pub fn items(&self) -> &ItemCatalog {
        &self.items
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Save store rooted at the configured save directory.
    pub fn save_manager(&self) -> SaveManager {
        SaveManager::with_dir(&self.config.save_dir)
    }

    /// Fights an enemy suited to the character's level and applies the rewards.
    pub fn explore(&mut self, controller: &mut impl BattleController) -> GameResult<BattleResult> {
        let enemy = enemy_for_level(self.character.level());
        self.fight(enemy, controller)
    }

    /// Fights `enemy` to resolution and applies the rewards.
    ///
    /// If the controller picks an action the battle rejects, the battle is
    /// abandoned and the error returned; damage taken so far stays.
    pub fn fight(
        &mut self,
        enemy: Enemy,
        controller: &mut impl BattleController,
    ) -> GameResult<BattleResult> {
        let mut battle = Battle::new(&mut self.character, enemy);
        let result = battle.run(controller, &mut self.rng)?;
        self.apply_battle_rewards(&result)?;
        Ok(result)
    }

    /// Grants a battle's XP and gold. Returns true if the character levelled up.
    pub fn apply_battle_rewards(&mut self, result: &BattleResult) -> GameResult<bool> {
        if !result.player_won() {
            return Ok(false);
        }
        add_gold(&mut self.character, i64::from(result.gold_gained))?;
        gain_experience(&mut self.character, result.xp_gained)
    }

    /// Revives a dead character for a fee.
    ///
    /// Returns false, charging nothing, if the character is alive.
    pub fn revive_for_gold(&mut self) -> GameResult<bool> {
        if !is_dead(&self.character) {
            return Ok(false);
        }
        add_gold(&mut self.character, -i64::from(REVIVE_COST))?;
        revive_character(&mut self.character);
        Ok(true)
    }

    pub fn buy(&mut self, item_id: &str) -> GameResult<()> {
        let item = lookup_item(&self.items, item_id)?;
        purchase_item(&mut self.character, item_id, item)
    }

    pub fn sell(&mut self, item_id: &str) -> GameResult<u32> {
        let item = lookup_item(&self.items, item_id)?;
        sell_item(&mut self.character, item_id, item)
    }

    pub fn use_item(&mut self, item_id: &str) -> GameResult<()> {
        let item = lookup_item(&self.items, item_id)?;
        use_item(&mut self.character, item_id, item)
    }

    /// Equips a weapon or armor into the matching slot.
    ///
    /// Returns the id of the item swapped out, if any.
    pub fn equip(&mut self, item_id: &str) -> GameResult<Option<String>> {
        let item = lookup_item(&self.items, item_id)?;
        let slot = EquipmentSlot::for_item_type(item.item_type).ok_or_else(|| {
            GameError::InvalidItemType {
                item_id: item_id.to_string(),
                expected: "weapon or armor".to_string(),
            }
        })?;
        equip(&mut self.character, slot, item_id, item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> GameResult<Option<String>> {
        unequip(&mut self.character, slot)
    }

    pub fn accept_quest(&mut self, quest_id: &str) -> GameResult<bool> {
        quests::accept_quest(&mut self.character, quest_id, &self.quests)
    }

    pub fn complete_quest(&mut self, quest_id: &str) -> GameResult<QuestRewards> {
        quests::complete_quest(&mut self.character, quest_id, &self.quests)
    }

    pub fn abandon_quest(&mut self, quest_id: &str) -> GameResult<()> {
        quests::abandon_quest(&mut self.character, quest_id)
    }

    pub fn save(&self, store: &SaveManager) -> GameResult<PathBuf> {
        store.save_character(&self.character)
    }
}

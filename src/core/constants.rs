// Inventory
pub const MAX_INVENTORY_SIZE: usize = 20;

// XP and leveling
pub const XP_PER_LEVEL: u32 = 100;
pub const LEVEL_UP_MAX_HEALTH: u32 = 10;
pub const LEVEL_UP_STRENGTH: u32 = 2;
pub const LEVEL_UP_MAGIC: u32 = 2;

// New characters
pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_GOLD: u32 = 100;

// Character class base stats: (max_health, strength, magic)
pub const WARRIOR_BASE_STATS: (u32, u32, u32) = (120, 15, 5);
pub const MAGE_BASE_STATS: (u32, u32, u32) = (80, 8, 20);
pub const ROGUE_BASE_STATS: (u32, u32, u32) = (90, 12, 10);
pub const CLERIC_BASE_STATS: (u32, u32, u32) = (100, 10, 15);

// Combat
pub const DEFENSE_DIVISOR: u32 = 4;
pub const MIN_DAMAGE: u32 = 1;
pub const ESCAPE_CHANCE: f64 = 0.5;

// Special abilities
pub const POWER_STRIKE_MULTIPLIER: u32 = 2;
pub const FIREBALL_MULTIPLIER: u32 = 2;
pub const CRITICAL_STRIKE_MULTIPLIER: u32 = 3;
pub const CRITICAL_STRIKE_CHANCE: f64 = 0.5;
pub const CLERIC_HEAL_AMOUNT: u32 = 30;

// Enemy table: (name, max_health, strength, magic, xp_reward, gold_reward)
pub const GOBLIN_STATS: (&str, u32, u32, u32, u32, u32) = ("Goblin", 50, 8, 2, 25, 10);
pub const ORC_STATS: (&str, u32, u32, u32, u32, u32) = ("Orc", 80, 12, 5, 50, 25);
pub const DRAGON_STATS: (&str, u32, u32, u32, u32, u32) = ("Dragon", 200, 25, 15, 200, 100);

// Enemy tiers by character level (inclusive upper bounds)
pub const GOBLIN_TIER_MAX_LEVEL: u32 = 2;
pub const ORC_TIER_MAX_LEVEL: u32 = 5;

// Death and revival
pub const REVIVE_COST: u32 = 50;

// Economy
pub const SELL_PRICE_DIVISOR: u32 = 2;

// Character names
pub const MAX_NAME_LENGTH: usize = 16;

// Persistence
pub const SAVE_FILE_SUFFIX: &str = "_save.txt";
pub const QUESTS_FILE_NAME: &str = "quests.txt";
pub const ITEMS_FILE_NAME: &str = "items.txt";

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::combat_math::apply_damage;
use crate::core::constants::*;
use crate::error::{GameError, GameResult};

/// The fixed enemy roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
}

impl EnemyKind {
    pub fn all() -> &'static [EnemyKind] {
        &[EnemyKind::Goblin, EnemyKind::Orc, EnemyKind::Dragon]
    }

    /// (name, max_health, strength, magic, xp_reward, gold_reward)
    fn stats(&self) -> (&'static str, u32, u32, u32, u32, u32) {
        match self {
            EnemyKind::Goblin => GOBLIN_STATS,
            EnemyKind::Orc => ORC_STATS,
            EnemyKind::Dragon => DRAGON_STATS,
        }
    }

    pub fn name(&self) -> &'static str {
        self.stats().0
    }

    /// Goblins through level 2, orcs through level 5, dragons beyond.
    pub fn for_level(level: u32) -> EnemyKind {
        if level <= GOBLIN_TIER_MAX_LEVEL {
            EnemyKind::Goblin
        } else if level <= ORC_TIER_MAX_LEVEL {
            EnemyKind::Orc
        } else {
            EnemyKind::Dragon
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnemyKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnemyKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidTarget(s.to_string()))
    }
}

/// An enemy snapshot. Rewards are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        let (name, max_health, strength, magic, xp_reward, gold_reward) = kind.stats();
        Self {
            kind,
            name: name.to_string(),
            health: max_health,
            max_health,
            strength,
            magic,
            xp_reward,
            gold_reward,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Returns remaining health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = apply_damage(self.health, amount);
        self.health
    }
}

/// Builds an enemy by type name, case-insensitively.
///
/// Unknown names fail with `InvalidTarget`.
pub fn create_enemy(enemy_type: &str) -> GameResult<Enemy> {
    enemy_type.parse::<EnemyKind>().map(Enemy::new)
}

pub fn enemy_for_level(level: u32) -> Enemy {
    Enemy::new(EnemyKind::for_level(level))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleState {
    NotStarted,
    InProgress,
    /// `winner` is `None` when the player escaped.
    Resolved { winner: Option<Side> },
}

/// Outcome of a finished battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    pub winner: Option<Side>,
    pub xp_gained: u32,
    pub gold_gained: u32,
}

impl BattleResult {
    pub fn escaped() -> Self {
        Self {
            winner: None,
            xp_gained: 0,
            gold_gained: 0,
        }
    }

    pub fn player_won(&self) -> bool {
        self.winner == Some(Side::Player)
    }

    pub fn player_lost(&self) -> bool {
        self.winner == Some(Side::Enemy)
    }

    pub fn player_escaped(&self) -> bool {
        self.winner.is_none()
    }
}

/// What the player does on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    Attack,
    Special,
    Escape,
}

/// Result of a class ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityOutcome {
    Damage {
        ability: &'static str,
        damage: u32,
        critical: bool,
    },
    Heal {
        ability: &'static str,
        amount: u32,
    },
}

/// Something that happened during a battle, for the caller to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatEvent {
    BattleStarted { enemy: String },
    PlayerAttack { damage: u32 },
    AbilityUsed(AbilityOutcome),
    EscapeSucceeded,
    EscapeFailed,
    EnemyAttack { damage: u32 },
    EnemyDefeated { xp_gained: u32, gold_gained: u32 },
    PlayerDefeated,
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::BattleStarted { enemy } => write!(f, "A {} appears!", enemy),
            CombatEvent::PlayerAttack { damage } => {
                write!(f, "You attack for {} damage!", damage)
            }
            CombatEvent::AbilityUsed(AbilityOutcome::Damage {
                ability,
                damage,
                critical: true,
            }) => write!(f, "{} lands for {} critical damage!", ability, damage),
            CombatEvent::AbilityUsed(AbilityOutcome::Damage {
                ability, damage, ..
            }) => write!(f, "{} deals {} damage!", ability, damage),
            CombatEvent::AbilityUsed(AbilityOutcome::Heal { ability, amount }) => {
                write!(f, "{} restores {} health.", ability, amount)
            }
            CombatEvent::EscapeSucceeded => f.write_str("You successfully escaped!"),
            CombatEvent::EscapeFailed => f.write_str("You failed to escape!"),
            CombatEvent::EnemyAttack { damage } => {
                write!(f, "The enemy attacks you for {} damage!", damage)
            }
            CombatEvent::EnemyDefeated {
                xp_gained,
                gold_gained,
            } => write!(
                f,
                "Victory! Gained {} XP and {} gold.",
                xp_gained, gold_gained
            ),
            CombatEvent::PlayerDefeated => f.write_str("You have been defeated..."),
        }
    }
}

//! Turn-based battle state machine.

use super::abilities::use_special_ability;
use super::types::*;
use crate::character::Character;
use crate::core::combat_math::{calculate_damage, roll_chance};
use crate::core::constants::ESCAPE_CHANCE;
use crate::error::{GameError, GameResult};
use rand::Rng;
use tracing::{debug, info};

/// Picks the player's action each turn of [`Battle::run`].
pub trait BattleController {
    fn choose_action(
        &mut self,
        character: &Character,
        enemy: &Enemy,
        ability_ready: bool,
    ) -> PlayerAction;
}

impl<F> BattleController for F
where
    F: FnMut(&Character, &Enemy, bool) -> PlayerAction,
{
    fn choose_action(
        &mut self,
        character: &Character,
        enemy: &Enemy,
        ability_ready: bool,
    ) -> PlayerAction {
        self(character, enemy, ability_ready)
    }
}

pub fn can_character_fight(character: &Character) -> bool {
    character.is_alive()
}

/// The result a player victory over `enemy` earns.
pub fn victory_rewards(enemy: &Enemy) -> BattleResult {
    BattleResult {
        winner: Some(Side::Player),
        xp_gained: enemy.xp_reward,
        gold_gained: enemy.gold_reward,
    }
}

/// One fight between a character and an enemy.
///
/// Borrows the character mutably for the battle's lifetime; damage and
/// healing land on it directly. Rewards are reported, not applied.
pub struct Battle<'a> {
    character: &'a mut Character,
    enemy: Enemy,
    state: BattleState,
    turn_count: u32,
    ability_used: bool,
    events: Vec<CombatEvent>,
}

impl<'a> Battle<'a> {
    pub fn new(character: &'a mut Character, enemy: Enemy) -> Self {
        Self {
            character,
            enemy,
            state: BattleState::NotStarted,
            turn_count: 0,
            ability_used: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BattleState::InProgress
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn ability_ready(&self) -> bool {
        !self.ability_used
    }

    pub fn character(&self) -> &Character {
        &*self.character
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    /// Everything that has happened so far, oldest first.
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Moves `NotStarted` to `InProgress`.
    pub fn start(&mut self) -> GameResult<()> {
        if self.state != BattleState::NotStarted {
            return Err(GameError::CombatNotActive);
        }
        if !can_character_fight(&*self.character) {
            return Err(GameError::CharacterDead(self.character.name().to_string()));
        }

        self.state = BattleState::InProgress;
        self.events.push(CombatEvent::BattleStarted {
            enemy: self.enemy.name.clone(),
        });
        info!(
            name = %self.character.name(),
            enemy = %self.enemy.name,
            "battle started"
        );
        Ok(())
    }

    fn ensure_active(&self) -> GameResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(GameError::CombatNotActive)
        }
    }

    /// Performs the player's action and checks for resolution.
    ///
    /// A special ability already used this battle fails with
    /// `AbilityOnCooldown` and the turn is not consumed.
    pub fn player_turn(
        &mut self,
        action: PlayerAction,
        rng: &mut impl Rng,
    ) -> GameResult<BattleState> {
        self.ensure_active()?;
        if action == PlayerAction::Special && self.ability_used {
            return Err(GameError::AbilityOnCooldown);
        }

        self.turn_count += 1;
        match action {
            PlayerAction::Attack => {
                let damage = calculate_damage(self.character.strength(), self.enemy.strength);
                self.enemy.take_damage(damage);
                self.events.push(CombatEvent::PlayerAttack { damage });
                debug!(
                    turn = self.turn_count,
                    damage,
                    enemy_hp = self.enemy.health,
                    "player attack"
                );
            }
            PlayerAction::Special => {
                self.ability_used = true;
                let outcome = use_special_ability(&mut *self.character, &mut self.enemy, rng);
                debug!(turn = self.turn_count, ?outcome, "special ability");
                self.events.push(CombatEvent::AbilityUsed(outcome));
            }
            PlayerAction::Escape => {
                if self.attempt_escape(rng)? {
                    return Ok(self.state);
                }
            }
        }

        self.check_battle_end();
        Ok(self.state)
    }

    /// The enemy's basic attack, then a resolution check.
    pub fn enemy_turn(&mut self) -> GameResult<BattleState> {
        self.ensure_active()?;

        let damage = calculate_damage(self.enemy.strength, self.character.strength());
        let remaining = self.character.take_damage(damage);
        self.events.push(CombatEvent::EnemyAttack { damage });
        debug!(turn = self.turn_count, damage, player_hp = remaining, "enemy attack");

        self.check_battle_end();
        Ok(self.state)
    }

    /// Rolls the escape chance. On success the battle resolves with no winner.
    pub fn attempt_escape(&mut self, rng: &mut impl Rng) -> GameResult<bool> {
        self.ensure_active()?;

        if roll_chance(ESCAPE_CHANCE, rng) {
            self.state = BattleState::Resolved { winner: None };
            self.events.push(CombatEvent::EscapeSucceeded);
            info!(
                name = %self.character.name(),
                enemy = %self.enemy.name,
                "escaped from battle"
            );
            Ok(true)
        } else {
            self.events.push(CombatEvent::EscapeFailed);
            Ok(false)
        }
    }

    /// Resolves the battle if either side is down. Enemy death is checked
    /// first, so a simultaneous knockout goes to the player.
    pub fn check_battle_end(&mut self) -> Option<Side> {
        if !self.is_active() {
            return match self.state {
                BattleState::Resolved { winner } => winner,
                _ => None,
            };
        }

        let winner = if !self.enemy.is_alive() {
            Side::Player
        } else if !self.character.is_alive() {
            Side::Enemy
        } else {
            return None;
        };

        self.state = BattleState::Resolved {
            winner: Some(winner),
        };
        match winner {
            Side::Player => self.events.push(CombatEvent::EnemyDefeated {
                xp_gained: self.enemy.xp_reward,
                gold_gained: self.enemy.gold_reward,
            }),
            Side::Enemy => self.events.push(CombatEvent::PlayerDefeated),
        }
        info!(
            name = %self.character.name(),
            enemy = %self.enemy.name,
            ?winner,
            turns = self.turn_count,
            "battle resolved"
        );
        Some(winner)
    }

    /// The battle's result once resolved.
    pub fn result(&self) -> Option<BattleResult> {
        match self.state {
            BattleState::Resolved {
                winner: Some(Side::Player),
            } => Some(victory_rewards(&self.enemy)),
            BattleState::Resolved { winner } => Some(BattleResult {
                winner,
                xp_gained: 0,
                gold_gained: 0,
            }),
            _ => None,
        }
    }

    /// Runs the battle to resolution, starting it if needed.
    ///
    /// An action the battle rejects (a special on cooldown) aborts the run
    /// with that error; the battle stays in progress and `run` may be called
    /// again to resume it.
    pub fn run(
        &mut self,
        controller: &mut impl BattleController,
        rng: &mut impl Rng,
    ) -> GameResult<BattleResult> {
        if self.state == BattleState::NotStarted {
            self.start()?;
        }
        self.ensure_active()?;

        while self.is_active() {
            let action =
                controller.choose_action(&*self.character, &self.enemy, self.ability_ready());
            self.player_turn(action, rng)?;
            if !self.is_active() {
                break;
            }
            self.enemy_turn()?;
        }

        self.result().ok_or(GameError::CombatNotActive)
    }
}

//! Quest acceptance, completion, and prerequisite chains.

use super::types::{QuestCatalog, QuestDef, QuestRewards, RewardTotals};
use crate::character::logic::{add_gold, gain_experience, gold_after, is_dead};
use crate::character::Character;
use crate::error::{GameError, GameResult};
use std::collections::HashSet;
use tracing::info;

fn lookup<'a>(quests: &'a QuestCatalog, quest_id: &str) -> GameResult<&'a QuestDef> {
    quests
        .get(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))
}

pub fn is_quest_active(character: &Character, quest_id: &str) -> bool {
    character.active_quests.iter().any(|id| id == quest_id)
}

pub fn is_quest_completed(character: &Character, quest_id: &str) -> bool {
    character.completed_quests.iter().any(|id| id == quest_id)
}

/// Accepts a quest.
///
/// Returns `Ok(false)` if the quest is already active. Fails if the quest is
/// unknown, already completed, above the character's level, or its
/// prerequisite is not completed.
pub fn accept_quest(
    character: &mut Character,
    quest_id: &str,
    quests: &QuestCatalog,
) -> GameResult<bool> {
    let quest = lookup(quests, quest_id)?;

    if is_quest_completed(character, quest_id) {
        return Err(GameError::QuestAlreadyCompleted(quest_id.to_string()));
    }
    if is_quest_active(character, quest_id) {
        return Ok(false);
    }
    if character.level < quest.required_level {
        return Err(GameError::InsufficientLevel {
            required: quest.required_level,
            current: character.level,
        });
    }
    if let Some(prerequisite) = quest.prerequisite() {
        if !is_quest_completed(character, prerequisite) {
            return Err(GameError::QuestRequirementsNotMet {
                quest_id: quest_id.to_string(),
                prerequisite: prerequisite.to_string(),
            });
        }
    }

    character.active_quests.push(quest_id.to_string());
    info!(name = %character.name, quest_id, "quest accepted");
    Ok(true)
}

/// Completes an active quest and grants its XP and gold.
///
/// Rewards that cannot be granted (XP for a dead character, a gold charge
/// the character cannot afford) fail the call before anything changes.
pub fn complete_quest(
    character: &mut Character,
    quest_id: &str,
    quests: &QuestCatalog,
) -> GameResult<QuestRewards> {
    let quest = lookup(quests, quest_id)?;

    if !is_quest_active(character, quest_id) {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }
    if quest.reward_xp > 0 && is_dead(character) {
        return Err(GameError::CharacterDead(character.name.clone()));
    }
    gold_after(character, quest.reward_gold)?;

    character.active_quests.retain(|id| id != quest_id);
    if !is_quest_completed(character, quest_id) {
        character.completed_quests.push(quest_id.to_string());
    }

    if quest.reward_xp > 0 {
        gain_experience(character, quest.reward_xp)?;
    }
    if quest.reward_gold != 0 {
        add_gold(character, quest.reward_gold)?;
    }

    info!(
        name = %character.name,
        quest_id,
        xp = quest.reward_xp,
        gold = quest.reward_gold,
        "quest completed"
    );
    Ok(QuestRewards {
        xp: quest.reward_xp,
        gold: quest.reward_gold,
    })
}

/// Drops an active quest without rewards.
pub fn abandon_quest(character: &mut Character, quest_id: &str) -> GameResult<()> {
    if !is_quest_active(character, quest_id) {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }
    character.active_quests.retain(|id| id != quest_id);
    info!(name = %character.name, quest_id, "quest abandoned");
    Ok(())
}

/// Whether `accept_quest` would newly accept this quest. Never fails.
pub fn can_accept_quest(character: &Character, quest_id: &str, quests: &QuestCatalog) -> bool {
    let Some(quest) = quests.get(quest_id) else {
        return false;
    };

    if is_quest_completed(character, quest_id) || is_quest_active(character, quest_id) {
        return false;
    }
    if character.level < quest.required_level {
        return false;
    }
    match quest.prerequisite() {
        Some(prerequisite) => is_quest_completed(character, prerequisite),
        None => true,
    }
}

/// Walks prerequisites back to the root quest.
///
/// Returns the chain ordered root first, ending with `quest_id`. Fails with
/// `QuestNotFound` on a dangling reference and `QuestCycle` if the walk
/// revisits a quest.
pub fn get_prerequisite_chain(quest_id: &str, quests: &QuestCatalog) -> GameResult<Vec<String>> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = quest_id;

    loop {
        let quest = lookup(quests, current)?;
        if !visited.insert(current) {
            return Err(GameError::QuestCycle(current.to_string()));
        }
        chain.push(current.to_string());

        match quest.prerequisite() {
            Some(prerequisite) => current = prerequisite,
            None => break,
        }
    }

    chain.reverse();
    Ok(chain)
}

/// Checks every prerequisite reference resolves and no chain loops.
pub fn validate_quest_prerequisites(quests: &QuestCatalog) -> GameResult<()> {
    for quest in quests.values() {
        if let Some(prerequisite) = quest.prerequisite() {
            if !quests.contains_key(prerequisite) {
                return Err(GameError::QuestNotFound(prerequisite.to_string()));
            }
        }
    }
    for quest_id in quests.keys() {
        get_prerequisite_chain(quest_id, quests)?;
    }
    Ok(())
}

/// Definitions of the character's active quests, in acceptance order.
pub fn active_quests<'a>(character: &Character, quests: &'a QuestCatalog) -> Vec<&'a QuestDef> {
    character
        .active_quests
        .iter()
        .filter_map(|id| quests.get(id))
        .collect()
}

/// Definitions of the character's completed quests, in completion order.
pub fn completed_quests<'a>(character: &Character, quests: &'a QuestCatalog) -> Vec<&'a QuestDef> {
    character
        .completed_quests
        .iter()
        .filter_map(|id| quests.get(id))
        .collect()
}

/// Every quest the character could accept right now.
pub fn available_quests<'a>(character: &Character, quests: &'a QuestCatalog) -> Vec<&'a QuestDef> {
    quests
        .iter()
        .filter(|(id, _)| can_accept_quest(character, id, quests))
        .map(|(_, quest)| quest)
        .collect()
}

/// Quests whose required level lies in `min_level..=max_level`.
pub fn quests_by_level(quests: &QuestCatalog, min_level: u32, max_level: u32) -> Vec<&QuestDef> {
    quests
        .values()
        .filter(|q| (min_level..=max_level).contains(&q.required_level))
        .collect()
}

/// Percentage (0–100) of known quests completed; 0 when there are none.
pub fn completion_percentage(character: &Character, quests: &QuestCatalog) -> f64 {
    if quests.is_empty() {
        return 0.0;
    }
    let completed = character
        .completed_quests
        .iter()
        .filter(|id| quests.contains_key(id.as_str()))
        .count();
    completed as f64 / quests.len() as f64 * 100.0
}

pub fn total_rewards_earned(character: &Character, quests: &QuestCatalog) -> RewardTotals {
    completed_quests(character, quests)
        .into_iter()
        .fold(RewardTotals::default(), |totals, quest| RewardTotals {
            total_xp: totals.total_xp + u64::from(quest.reward_xp),
            total_gold: totals.total_gold + quest.reward_gold,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;

    fn quest(id: &str, level: u32, prerequisite: Option<&str>, xp: u32, gold: i64) -> QuestDef {
        QuestDef {
            quest_id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            reward_xp: xp,
            reward_gold: gold,
            required_level: level,
            prerequisite: prerequisite.map(str::to_string),
        }
    }

    fn catalog(defs: Vec<QuestDef>) -> QuestCatalog {
        defs.into_iter().map(|q| (q.quest_id.clone(), q)).collect()
    }

    fn chain_catalog() -> QuestCatalog {
        catalog(vec![
            quest("intro_quest", 1, Some("NONE"), 50, 10),
            quest("goblin_menace", 2, Some("intro_quest"), 100, 25),
            quest("orc_warlord", 5, Some("goblin_menace"), 300, 100),
            quest("dragon_rumors", 5, None, 0, 0),
        ])
    }

    fn hero() -> Character {
        Character::new("Hero", CharacterClass::Warrior)
    }

    fn level_to(character: &mut Character, level: u32) {
        while character.level() < level {
            let needed = character.xp_to_next_level() - character.experience();
            gain_experience(character, needed).unwrap();
        }
    }

    #[test]
    fn test_accept_quest() {
        let quests = chain_catalog();
        let mut c = hero();
        assert!(accept_quest(&mut c, "intro_quest", &quests).unwrap());
        assert!(is_quest_active(&c, "intro_quest"));
    }

    #[test]
    fn test_accept_already_active_is_noop() {
        let quests = chain_catalog();
        let mut c = hero();
        accept_quest(&mut c, "intro_quest", &quests).unwrap();
        assert!(!accept_quest(&mut c, "intro_quest", &quests).unwrap());
        assert_eq!(c.active_quests().len(), 1);
    }

    #[test]
    fn test_accept_unknown() {
        let mut c = hero();
        let result = accept_quest(&mut c, "nope", &chain_catalog());
        assert!(matches!(result, Err(GameError::QuestNotFound(_))));
    }

    #[test]
    fn test_accept_insufficient_level() {
        let mut c = hero();
        let result = accept_quest(&mut c, "dragon_rumors", &chain_catalog());
        assert!(matches!(
            result,
            Err(GameError::InsufficientLevel {
                required: 5,
                current: 1
            })
        ));
        assert!(c.active_quests().is_empty());
    }

    #[test]
    fn test_accept_at_required_level_without_prerequisite() {
        let mut c = hero();
        level_to(&mut c, 5);
        assert!(accept_quest(&mut c, "dragon_rumors", &chain_catalog()).unwrap());
    }

    #[test]
    fn test_accept_prerequisite_not_met() {
        let mut c = hero();
        level_to(&mut c, 2);
        let result = accept_quest(&mut c, "goblin_menace", &chain_catalog());
        assert!(matches!(
            result,
            Err(GameError::QuestRequirementsNotMet { ref prerequisite, .. }) if prerequisite == "intro_quest"
        ));
    }

    #[test]
    fn test_accept_completed() {
        let quests = chain_catalog();
        let mut c = hero();
        accept_quest(&mut c, "intro_quest", &quests).unwrap();
        complete_quest(&mut c, "intro_quest", &quests).unwrap();
        let result = accept_quest(&mut c, "intro_quest", &quests);
        assert!(matches!(result, Err(GameError::QuestAlreadyCompleted(_))));
    }

    #[test]
    fn test_complete_quest_grants_rewards() {
        let quests = chain_catalog();
        let mut c = hero();
        accept_quest(&mut c, "intro_quest", &quests).unwrap();
        let rewards = complete_quest(&mut c, "intro_quest", &quests).unwrap();
        assert_eq!(rewards, QuestRewards { xp: 50, gold: 10 });
        assert_eq!(c.experience(), 50);
        assert_eq!(c.gold(), 110);
        assert!(!is_quest_active(&c, "intro_quest"));
        assert!(is_quest_completed(&c, "intro_quest"));
    }

    #[test]
    fn test_complete_quest_can_level_up() {
        let quests = chain_catalog();
        let mut c = hero();
        accept_quest(&mut c, "intro_quest", &quests).unwrap();
        complete_quest(&mut c, "intro_quest", &quests).unwrap();
        level_to(&mut c, 2);
        accept_quest(&mut c, "goblin_menace", &quests).unwrap();
        complete_quest(&mut c, "goblin_menace", &quests).unwrap();
        assert_eq!(c.level(), 2);
        assert_eq!(c.experience(), 100);
    }

    #[test]
    fn test_complete_not_active() {
        let mut c = hero();
        let result = complete_quest(&mut c, "intro_quest", &chain_catalog());
        assert!(matches!(result, Err(GameError::QuestNotActive(_))));
    }

    #[test]
    fn test_complete_negative_gold_unaffordable_is_atomic() {
        let quests = catalog(vec![quest("tithe", 1, None, 10, -500)]);
        let mut c = hero();
        accept_quest(&mut c, "tithe", &quests).unwrap();
        let before = c.clone();
        let result = complete_quest(&mut c, "tithe", &quests);
        assert!(matches!(result, Err(GameError::InsufficientResources { .. })));
        assert_eq!(c, before);
    }

    #[test]
    fn test_complete_gold_overflow_is_atomic() {
        let quests = catalog(vec![quest("hoard", 1, None, 10, i64::MAX)]);
        let mut c = hero();
        accept_quest(&mut c, "hoard", &quests).unwrap();
        let before = c.clone();
        let result = complete_quest(&mut c, "hoard", &quests);
        assert!(matches!(result, Err(GameError::GoldOverflow { .. })));
        assert_eq!(c, before);
    }

    #[test]
    fn test_complete_negative_gold() {
        let quests = catalog(vec![quest("tithe", 1, None, 0, -30)]);
        let mut c = hero();
        accept_quest(&mut c, "tithe", &quests).unwrap();
        assert_eq!(complete_quest(&mut c, "tithe", &quests).unwrap().gold, -30);
        assert_eq!(c.gold(), 70);
    }

    #[test]
    fn test_abandon() {
        let quests = chain_catalog();
        let mut c = hero();
        accept_quest(&mut c, "intro_quest", &quests).unwrap();
        abandon_quest(&mut c, "intro_quest").unwrap();
        assert!(c.active_quests().is_empty());
        assert!(matches!(
            abandon_quest(&mut c, "intro_quest"),
            Err(GameError::QuestNotActive(_))
        ));
    }

    #[test]
    fn test_can_accept_quest() {
        let quests = chain_catalog();
        let mut c = hero();
        assert!(can_accept_quest(&c, "intro_quest", &quests));
        assert!(!can_accept_quest(&c, "goblin_menace", &quests));
        assert!(!can_accept_quest(&c, "dragon_rumors", &quests));
        assert!(!can_accept_quest(&c, "missing", &quests));

        accept_quest(&mut c, "intro_quest", &quests).unwrap();
        assert!(!can_accept_quest(&c, "intro_quest", &quests));
    }

    #[test]
    fn test_prerequisite_chain() {
        let quests = chain_catalog();
        assert_eq!(
            get_prerequisite_chain("orc_warlord", &quests).unwrap(),
            vec!["intro_quest", "goblin_menace", "orc_warlord"]
        );
        assert_eq!(
            get_prerequisite_chain("intro_quest", &quests).unwrap(),
            vec!["intro_quest"]
        );
    }

    #[test]
    fn test_prerequisite_chain_missing_ancestor() {
        let quests = catalog(vec![quest("b", 1, Some("a"), 0, 0)]);
        assert!(matches!(
            get_prerequisite_chain("b", &quests),
            Err(GameError::QuestNotFound(ref id)) if id == "a"
        ));
        assert!(matches!(
            get_prerequisite_chain("zzz", &quests),
            Err(GameError::QuestNotFound(_))
        ));
    }

    #[test]
    fn test_prerequisite_chain_cycle() {
        let quests = catalog(vec![
            quest("a", 1, Some("c"), 0, 0),
            quest("b", 1, Some("a"), 0, 0),
            quest("c", 1, Some("b"), 0, 0),
        ]);
        assert!(matches!(
            get_prerequisite_chain("a", &quests),
            Err(GameError::QuestCycle(_))
        ));

        let self_loop = catalog(vec![quest("s", 1, Some("s"), 0, 0)]);
        assert!(matches!(
            get_prerequisite_chain("s", &self_loop),
            Err(GameError::QuestCycle(_))
        ));
    }

    #[test]
    fn test_validate_prerequisites() {
        assert!(validate_quest_prerequisites(&chain_catalog()).is_ok());

        let dangling = catalog(vec![quest("b", 1, Some("a"), 0, 0)]);
        assert!(matches!(
            validate_quest_prerequisites(&dangling),
            Err(GameError::QuestNotFound(_))
        ));

        let looped = catalog(vec![
            quest("a", 1, Some("b"), 0, 0),
            quest("b", 1, Some("a"), 0, 0),
        ]);
        assert!(matches!(
            validate_quest_prerequisites(&looped),
            Err(GameError::QuestCycle(_))
        ));
    }

    #[test]
    fn test_listings() {
        let quests = chain_catalog();
        let mut c = hero();

        let available: Vec<&str> = available_quests(&c, &quests)
            .iter()
            .map(|q| q.quest_id.as_str())
            .collect();
        assert_eq!(available, vec!["intro_quest"]);

        accept_quest(&mut c, "intro_quest", &quests).unwrap();
        assert_eq!(active_quests(&c, &quests).len(), 1);
        assert!(available_quests(&c, &quests).is_empty());

        complete_quest(&mut c, "intro_quest", &quests).unwrap();
        assert_eq!(completed_quests(&c, &quests)[0].quest_id, "intro_quest");
        assert!(active_quests(&c, &quests).is_empty());
    }

    #[test]
    fn test_quests_by_level() {
        let quests = chain_catalog();
        let ids: Vec<&str> = quests_by_level(&quests, 2, 5)
            .iter()
            .map(|q| q.quest_id.as_str())
            .collect();
        assert_eq!(ids, vec!["dragon_rumors", "goblin_menace", "orc_warlord"]);
        assert!(quests_by_level(&quests, 6, 10).is_empty());
    }

    #[test]
    fn test_completion_percentage_and_totals() {
        let quests = chain_catalog();
        let mut c = hero();
        assert_eq!(completion_percentage(&c, &quests), 0.0);
        assert_eq!(completion_percentage(&c, &QuestCatalog::new()), 0.0);

        accept_quest(&mut c, "intro_quest", &quests).unwrap();
        complete_quest(&mut c, "intro_quest", &quests).unwrap();
        assert!((completion_percentage(&c, &quests) - 25.0).abs() < f64::EPSILON);

        assert_eq!(
            total_rewards_earned(&c, &quests),
            RewardTotals {
                total_xp: 50,
                total_gold: 10
            }
        );
    }
}

//! Integration test: Quest graph over loaded data
//!
//! Loads quest definitions through the data parser, then walks a character
//! through a prerequisite chain: level gates, prerequisite gates, rewards,
//! listings and totals.

use quest_chronicles::character::{gain_experience, Character, CharacterClass};
use quest_chronicles::data::parse_quests;
use quest_chronicles::quests::*;
use quest_chronicles::GameError;

const QUESTS: &str = "\
QUEST_ID: intro_quest
TITLE: First Steps
DESCRIPTION: Your journey begins in a quiet village.
REWARD_XP: 50
REWARD_GOLD: 10
REQUIRED_LEVEL: 1
PREREQUISITE: NONE

QUEST_ID: goblin_menace
TITLE: Goblin Menace
DESCRIPTION: Clear the nearby woods of goblins.
REWARD_XP: 100
REWARD_GOLD: 25
REQUIRED_LEVEL: 2
PREREQUISITE: intro_quest

QUEST_ID: orc_warlord
TITLE: The Orc Warlord
DESCRIPTION: Break the warband camped in the hills.
REWARD_XP: 300
REWARD_GOLD: 100
REQUIRED_LEVEL: 3
PREREQUISITE: goblin_menace

QUEST_ID: lost_heirloom
TITLE: Lost Heirloom
DESCRIPTION: Recover a ring, and pay the finder's fee.
REWARD_XP: 0
REWARD_GOLD: -20
REQUIRED_LEVEL: 5
PREREQUISITE: NONE
";

fn catalog() -> QuestCatalog {
    parse_quests(QUESTS).unwrap()
}

fn ids(quests: Vec<&QuestDef>) -> Vec<&str> {
    quests.iter().map(|q| q.quest_id.as_str()).collect()
}

// =========================================================================
// Full chain playthrough
// =========================================================================

#[test]
fn test_full_chain_playthrough() {
    let quests = catalog();
    validate_quest_prerequisites(&quests).unwrap();
    let mut hero = Character::new("Hero", CharacterClass::Warrior);

    assert_eq!(ids(available_quests(&hero, &quests)), vec!["intro_quest"]);

    accept_quest(&mut hero, "intro_quest", &quests).unwrap();
    complete_quest(&mut hero, "intro_quest", &quests).unwrap();
    assert_eq!(hero.experience(), 50);

    // Prerequisite met but level 1 < 2
    assert!(matches!(
        accept_quest(&mut hero, "goblin_menace", &quests),
        Err(GameError::InsufficientLevel {
            required: 2,
            current: 1
        })
    ));

    gain_experience(&mut hero, 50).unwrap();
    assert_eq!(hero.level(), 2);
    accept_quest(&mut hero, "goblin_menace", &quests).unwrap();
    complete_quest(&mut hero, "goblin_menace", &quests).unwrap();
    assert_eq!(hero.experience(), 100);
    assert_eq!(hero.gold(), 135);

    gain_experience(&mut hero, 100).unwrap();
    assert_eq!(hero.level(), 3);
    accept_quest(&mut hero, "orc_warlord", &quests).unwrap();
    let rewards = complete_quest(&mut hero, "orc_warlord", &quests).unwrap();
    assert_eq!(rewards, QuestRewards { xp: 300, gold: 100 });
    assert_eq!(hero.level(), 4);

    assert_eq!(
        ids(completed_quests(&hero, &quests)),
        vec!["intro_quest", "goblin_menace", "orc_warlord"]
    );
    assert!((completion_percentage(&hero, &quests) - 75.0).abs() < f64::EPSILON);
    assert_eq!(
        total_rewards_earned(&hero, &quests),
        RewardTotals {
            total_xp: 450,
            total_gold: 135
        }
    );
}

#[test]
fn test_negative_gold_reward_charges_character() {
    let quests = catalog();
    let mut hero = Character::new("Hero", CharacterClass::Cleric);
    gain_experience(&mut hero, 1000).unwrap();
    assert!(hero.level() >= 5);

    accept_quest(&mut hero, "lost_heirloom", &quests).unwrap();
    let rewards = complete_quest(&mut hero, "lost_heirloom", &quests).unwrap();
    assert_eq!(rewards, QuestRewards { xp: 0, gold: -20 });
    assert_eq!(hero.gold(), 80);
}

#[test]
fn test_abandon_then_reaccept() {
    let quests = catalog();
    let mut hero = Character::new("Hero", CharacterClass::Mage);
    accept_quest(&mut hero, "intro_quest", &quests).unwrap();
    abandon_quest(&mut hero, "intro_quest").unwrap();
    assert!(can_accept_quest(&hero, "intro_quest", &quests));
    assert!(accept_quest(&mut hero, "intro_quest", &quests).unwrap());
}

// =========================================================================
// Prerequisite chains
// =========================================================================

#[test]
fn test_chain_root_first() {
    let quests = catalog();
    assert_eq!(
        get_prerequisite_chain("orc_warlord", &quests).unwrap(),
        vec!["intro_quest", "goblin_menace", "orc_warlord"]
    );
    assert_eq!(
        get_prerequisite_chain("lost_heirloom", &quests).unwrap(),
        vec!["lost_heirloom"]
    );
}

#[test]
fn test_cycle_in_loaded_data_is_reported() {
    let looped = QUESTS.replace(
        "REQUIRED_LEVEL: 1\nPREREQUISITE: NONE",
        "REQUIRED_LEVEL: 1\nPREREQUISITE: orc_warlord",
    );
    let quests = parse_quests(&looped).unwrap();
    assert!(matches!(
        get_prerequisite_chain("goblin_menace", &quests),
        Err(GameError::QuestCycle(_))
    ));
    assert!(matches!(
        validate_quest_prerequisites(&quests),
        Err(GameError::QuestCycle(_))
    ));
}

#[test]
fn test_quests_by_level_range() {
    let quests = catalog();
    assert_eq!(
        ids(quests_by_level(&quests, 1, 2)),
        vec!["goblin_menace", "intro_quest"]
    );
}

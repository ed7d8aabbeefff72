//! Fixed rule tables.

use crate::core_api::Ability;

pub const BASE_ABILITY_SCORE: i64 = 10;
pub const BASE_ARMOR_CLASS: i64 = 10;
pub const BOOST_AMOUNT: i64 = 2;
pub const UNCAPPED_DEX: i64 = 99;
pub const DEFAULT_PERCEPTION_RANK: i64 = 2;
pub const EXPERT_MELEE_LEVEL: i64 = 5;
pub const FORTITUDE_EXPERTISE_FEAT: &str = "Fortitude Expertise";

/// Skill key to the ability it keys off. Unknown skills fall back to
/// [`UNLISTED_SKILL_ABILITY`]; lore and labelled skills use intelligence.
#[rustfmt::skip]
pub const SKILL_ABILITIES: [(&str, Ability); 17] = [
    ("acrobatics",   Ability::Dex),
    ("arcana",       Ability::Int),
    ("athletics",    Ability::Str),
    ("crafting",     Ability::Int),
    ("deception",    Ability::Cha),
    ("diplomacy",    Ability::Cha),
    ("intimidation", Ability::Cha),
    ("lore",         Ability::Int),
    ("medicine",     Ability::Wis),
    ("nature",       Ability::Wis),
    ("occultism",    Ability::Int),
    ("performance",  Ability::Cha),
    ("religion",     Ability::Wis),
    ("society",      Ability::Int),
    ("stealth",      Ability::Dex),
    ("survival",     Ability::Wis),
    ("thievery",     Ability::Dex),
];

pub const UNLISTED_SKILL_ABILITY: Ability = Ability::Dex;
pub const LORE_SKILL_ABILITY: Ability = Ability::Int;

/// Proficiency rank letters: untrained, trained, expert, master, legendary.
pub const RANK_LETTERS: [&str; 5] = ["U", "T", "E", "M", "L"];

pub fn skill_ability(key: &str) -> Option<Ability> {
    SKILL_ABILITIES
        .iter()
        .find(|(skill, _)| *skill == key)
        .map(|(_, ability)| *ability)
}

/// Level-banded proficiency bonus. Ranks outside 0..=4 are unrecognized and
/// the caller picks the fallback.
pub fn rank_bonus(rank: i64, level: i64) -> Option<i64> {
    match rank {
        0 => Some(0),
        1..=4 => Some(level.saturating_add(4 * (rank - 1))),
        _ => None,
    }
}

pub fn rank_letter(rank: i64) -> Option<&'static str> {
    usize::try_from(rank)
        .ok()
        .and_then(|index| RANK_LETTERS.get(index).copied())
}

pub fn ability_modifier(score: i64) -> i64 {
    score.saturating_sub(BASE_ABILITY_SCORE).div_euclid(2)
}

#[cfg(test)]
mod tests {
    use super::{ability_modifier, rank_bonus, rank_letter, skill_ability};
    use crate::core_api::Ability;

    #[test]
    fn modifier_floors_toward_negative_infinity() {
        assert_eq!(ability_modifier(14), 2);
        assert_eq!(ability_modifier(7), -2);
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(9), -1);
    }

    #[test]
    fn rank_bonus_is_level_plus_four_per_rank_above_trained() {
        for level in 1..=20 {
            assert_eq!(rank_bonus(0, level), Some(0));
            for rank in 1..=4 {
                assert_eq!(rank_bonus(rank, level), Some(level + 4 * (rank - 1)));
            }
        }
        assert_eq!(rank_bonus(5, 3), None);
        assert_eq!(rank_bonus(-1, 3), None);
    }

    #[test]
    fn extreme_inputs_saturate() {
        assert_eq!(rank_bonus(4, i64::MAX), Some(i64::MAX));
        assert_eq!(ability_modifier(i64::MIN), i64::MIN / 2);
        assert_eq!(ability_modifier(i64::MAX), (i64::MAX - 10) / 2);
    }

    #[test]
    fn skill_table_and_letters() {
        assert_eq!(skill_ability("athletics"), Some(Ability::Str));
        assert_eq!(skill_ability("medicine"), Some(Ability::Wis));
        assert_eq!(skill_ability("sailing"), None);
        assert_eq!(rank_letter(3), Some("M"));
        assert_eq!(rank_letter(7), None);
    }
}

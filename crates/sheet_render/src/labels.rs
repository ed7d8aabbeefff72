//! Display names for abilities, saves, skills and proficiency ranks.

use sheet_core::core_api::{Ability, SaveId, SkillDetail};
use sheet_core::profile::CharacterProfile;
use sheet_core::sanitize::title_case_key;
use sheet_core::tables::rank_letter;

const SKILL_NAMES: [(&str, &str); 16] = [
    ("acrobatics", "Acrobatics"),
    ("arcana", "Arcana"),
    ("athletics", "Athletics"),
    ("crafting", "Crafting"),
    ("deception", "Deception"),
    ("diplomacy", "Diplomacy"),
    ("intimidation", "Intimidation"),
    ("medicine", "Medicine"),
    ("nature", "Nature"),
    ("occultism", "Occultism"),
    ("performance", "Performance"),
    ("religion", "Religion"),
    ("society", "Society"),
    ("stealth", "Stealth"),
    ("survival", "Survival"),
    ("thievery", "Thievery"),
];

pub fn ability_name(ability: Ability) -> &'static str {
    match ability {
        Ability::Str => "Strength",
        Ability::Dex => "Dexterity",
        Ability::Con => "Constitution",
        Ability::Int => "Intelligence",
        Ability::Wis => "Wisdom",
        Ability::Cha => "Charisma",
    }
}

pub fn save_name(save: SaveId) -> &'static str {
    match save {
        SaveId::Fortitude => "Fortitude",
        SaveId::Reflex => "Reflex",
        SaveId::Will => "Will",
    }
}

/// An explicit label wins; lore keys read `Lore: <Topic>`; anything else
/// unknown is shown as its upper-cased key.
pub fn skill_name(skill: &SkillDetail) -> String {
    if !skill.label.trim().is_empty() {
        return skill.label.trim().to_string();
    }
    if skill.is_lore() {
        let topic = skill.key.replace("lore", "");
        let topic = title_case_key(&topic.replace(['-', ' '], "_"));
        return if topic.is_empty() {
            "Lore".to_string()
        } else {
            format!("Lore: {topic}")
        };
    }
    SKILL_NAMES
        .iter()
        .find(|(key, _)| *key == skill.key)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| skill.key.to_uppercase())
}

pub fn rank_label(rank: i64) -> String {
    rank_letter(rank)
        .map(str::to_string)
        .unwrap_or_else(|| rank.to_string())
}

pub fn signed(value: i64) -> String {
    format!("{value:+}")
}

/// Ability key shown with its display name when it is one of the six;
/// other text passes through unchanged.
pub fn ability_label(key: &str) -> String {
    match Ability::from_key(key) {
        Some(ability) => ability_name(ability).to_string(),
        None => key.trim().to_string(),
    }
}

/// `Strength`, or `Strength (class: Dexterity)` when the class item names a
/// different key ability.
pub fn key_ability_display(profile: &CharacterProfile) -> String {
    let own = ability_label(&profile.key_ability);
    let class = ability_label(&profile.class_key_ability);
    if own.is_empty() {
        return class;
    }
    if !class.is_empty() && !class.eq_ignore_ascii_case(&own) {
        format!("{own} (class: {class})")
    } else {
        own
    }
}

#[cfg(test)]
mod tests {
    use sheet_core::core_api::{Ability, SkillDetail};

    use super::{rank_label, signed, skill_name};

    fn skill(key: &str, label: &str) -> SkillDetail {
        SkillDetail {
            key: key.to_string(),
            rank: 1,
            ability: Ability::Int,
            ability_mod: 0,
            prof_bonus: 0,
            total: 0,
            label: label.to_string(),
        }
    }

    #[test]
    fn skill_names_prefer_label_then_lore_then_table() {
        assert_eq!(skill_name(&skill("farming-lore", "Farming Lore")), "Farming Lore");
        assert_eq!(skill_name(&skill("sailing-lore", "")), "Lore: Sailing");
        assert_eq!(skill_name(&skill("lore", "")), "Lore");
        assert_eq!(skill_name(&skill("stealth", "")), "Stealth");
        assert_eq!(skill_name(&skill("piloting", "")), "PILOTING");
    }

    #[test]
    fn ranks_use_letters_when_known() {
        assert_eq!(rank_label(0), "U");
        assert_eq!(rank_label(2), "E");
        assert_eq!(rank_label(4), "L");
        assert_eq!(rank_label(7), "7");
    }

    #[test]
    fn signed_values_always_carry_a_sign() {
        assert_eq!(signed(3), "+3");
        assert_eq!(signed(0), "+0");
        assert_eq!(signed(-2), "-2");
    }
}

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Dex => "dex",
            Self::Con => "con",
            Self::Int => "int",
            Self::Wis => "wis",
            Self::Cha => "cha",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ability| ability.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveId {
    Fortitude,
    Reflex,
    Will,
}

impl SaveId {
    pub const ALL: [SaveId; 3] = [SaveId::Fortitude, SaveId::Reflex, SaveId::Will];

    pub fn key(self) -> &'static str {
        match self {
            Self::Fortitude => "fortitude",
            Self::Reflex => "reflex",
            Self::Will => "will",
        }
    }

    pub fn ability(self) -> Ability {
        match self {
            Self::Fortitude => Ability::Con,
            Self::Reflex => Ability::Dex,
            Self::Will => Ability::Wis,
        }
    }

    pub fn baseline_rank(self) -> i64 {
        match self {
            Self::Fortitude => 1,
            Self::Reflex | Self::Will => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmorClass {
    pub total: i64,
    pub base: i64,
    pub armor_bonus: i64,
    pub shield_bonus: i64,
    pub effective_dex_mod: i64,
    pub proficiency_bonus: i64,
    pub armor_check_penalty: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveDetail {
    pub save: SaveId,
    pub ability: Ability,
    pub base: i64,
    pub proficiency: i64,
    pub ability_mod: i64,
    pub prof_bonus: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillDetail {
    pub key: String,
    pub rank: i64,
    pub ability: Ability,
    pub ability_mod: i64,
    pub prof_bonus: i64,
    pub total: i64,
    pub label: String,
}

impl SkillDetail {
    pub fn is_lore(&self) -> bool {
        self.key.contains("lore")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerceptionDetail {
    pub rank: i64,
    pub wis_mod: i64,
    pub prof_bonus: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttackDetail {
    pub proficiency: i64,
    pub prof_bonus: i64,
    pub str_mod: i64,
    pub dex_mod: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Attacks {
    pub melee: AttackDetail,
}

/// Every statistic computed from a record. Built fresh for each record and
/// never shared between records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DerivedStats {
    pub level: i64,
    pub ability_scores: BTreeMap<Ability, i64>,
    pub ability_modifiers: BTreeMap<Ability, i64>,
    pub armor_class: ArmorClass,
    pub saves: Vec<SaveDetail>,
    pub attacks: Attacks,
    pub skills: Vec<SkillDetail>,
    pub perception: PerceptionDetail,
}

impl DerivedStats {
    pub fn score(&self, ability: Ability) -> i64 {
        self.ability_scores.get(&ability).copied().unwrap_or(10)
    }

    pub fn modifier(&self, ability: Ability) -> i64 {
        self.ability_modifiers.get(&ability).copied().unwrap_or(0)
    }

    pub fn save(&self, save: SaveId) -> Option<&SaveDetail> {
        self.saves.iter().find(|detail| detail.save == save)
    }

    pub fn skill(&self, key: &str) -> Option<&SkillDetail> {
        self.skills.iter().find(|detail| detail.key == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatCategory {
    Ancestry,
    Class,
    Skill,
    General,
}

impl FeatCategory {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ancestry" => Some(Self::Ancestry),
            "class" => Some(Self::Class),
            "skill" => Some(Self::Skill),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

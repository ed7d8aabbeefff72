//! Derivation of displayed statistics from a raw record.
//!
//! Abilities are resolved first; every later statistic reads only the
//! finished modifier table.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::core_api::{
    Ability, ArmorClass, AttackDetail, Attacks, DerivedStats, PerceptionDetail, SaveDetail,
    SaveId, SkillDetail,
};
use crate::record::{CharacterRecord, Item, ItemKind, as_int, as_text};
use crate::tables::{
    BASE_ABILITY_SCORE, BASE_ARMOR_CLASS, BOOST_AMOUNT, DEFAULT_PERCEPTION_RANK,
    EXPERT_MELEE_LEVEL, FORTITUDE_EXPERTISE_FEAT, LORE_SKILL_ABILITY, UNCAPPED_DEX,
    UNLISTED_SKILL_ABILITY, ability_modifier, rank_bonus, skill_ability,
};

const WEAPON_CATEGORIES: [&str; 4] = ["simple", "martial", "advanced", "unarmed"];

type AbilityTable = BTreeMap<Ability, i64>;

/// An explicit value from the record always wins over the computed one.
pub fn resolve_with_override<T>(computed: T, explicit: Option<T>) -> T {
    explicit.unwrap_or(computed)
}

pub fn derive(record: &CharacterRecord) -> DerivedStats {
    let level = record.level();
    let (ability_scores, ability_modifiers) = derive_abilities(record);
    let armor_class = derive_armor_class(record, level, &ability_modifiers);
    let saves = derive_saves(record, level, &ability_modifiers);
    let attacks = derive_attacks(record, level, &ability_modifiers);
    let skills = derive_skills(record, level, &ability_modifiers);
    let perception = derive_perception(record, level, &ability_modifiers);

    debug!(
        character = record.name(),
        level,
        armor_class = armor_class.total,
        skills = skills.len(),
        "derived character statistics"
    );

    DerivedStats {
        level,
        ability_scores,
        ability_modifiers,
        armor_class,
        saves,
        attacks,
        skills,
        perception,
    }
}

fn derive_abilities(record: &CharacterRecord) -> (AbilityTable, AbilityTable) {
    let mut scores: AbilityTable = Ability::ALL
        .into_iter()
        .map(|ability| (ability, BASE_ABILITY_SCORE))
        .collect();

    // Ancestry, then background, then level-up boosts. Repeats stack.
    let origin_boosts = record
        .items_of(ItemKind::Ancestry)
        .chain(record.items_of(ItemKind::Background))
        .flat_map(selected_boosts);
    for ability in origin_boosts.chain(level_boosts(record)) {
        trace!(%ability, "applying ability boost");
        let score = scores.entry(ability).or_insert(BASE_ABILITY_SCORE);
        *score = score.saturating_add(BOOST_AMOUNT);
    }

    let mut modifiers = AbilityTable::new();
    for ability in Ability::ALL {
        let computed = scores.get(&ability).copied().unwrap_or(BASE_ABILITY_SCORE);
        let score = resolve_with_override(
            computed,
            record.int_field(&["abilities", ability.key(), "value"]),
        );
        let modifier = resolve_with_override(
            ability_modifier(score),
            record.int_field(&["abilities", ability.key(), "mod"]),
        );
        scores.insert(ability, score);
        modifiers.insert(ability, modifier);
    }

    (scores, modifiers)
}

/// The `selected` ability of every boost slot on an origin item.
fn selected_boosts(item: &Item) -> Vec<Ability> {
    let Some(Value::Object(slots)) = item.field(&["boosts"]) else {
        return Vec::new();
    };
    slots
        .values()
        .filter_map(|slot| slot.get("selected").and_then(as_text))
        .filter_map(|key| parse_boost_key(&key, &item.name))
        .collect()
}

/// Abilities listed in the `build.attributes.boosts` ledger, in ledger order.
fn level_boosts(record: &CharacterRecord) -> Vec<Ability> {
    let Some(Value::Object(ledger)) = record.field(&["build", "attributes", "boosts"]) else {
        return Vec::new();
    };
    ledger
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(as_text)
        .filter_map(|key| parse_boost_key(&key, "level boosts"))
        .collect()
}

fn parse_boost_key(key: &str, source: &str) -> Option<Ability> {
    if key.trim().is_empty() {
        return None;
    }
    let ability = Ability::from_key(key);
    if ability.is_none() {
        warn!(key, source, "ignoring boost for unknown ability");
    }
    ability
}

fn derive_armor_class(record: &CharacterRecord, level: i64, modifiers: &AbilityTable) -> ArmorClass {
    let armor = record.first_item_of(&ItemKind::Armor);
    let armor_bonus = armor.and_then(|a| a.int_field(&["acBonus"])).unwrap_or(0);
    let dex_cap = armor
        .and_then(|a| a.int_field(&["dexCap"]))
        .unwrap_or(UNCAPPED_DEX);
    let armor_check_penalty = armor
        .and_then(|a| a.int_field(&["checkPenalty"]))
        .unwrap_or(0);
    let shield_bonus = record
        .first_item_of(&ItemKind::Shield)
        .and_then(|s| s.int_field(&["acBonus"]))
        .unwrap_or(0);

    let dex_mod = modifiers.get(&Ability::Dex).copied().unwrap_or(0);
    let effective_dex_mod = dex_mod.min(dex_cap);
    let proficiency_bonus = level.saturating_add(2);
    let total = [effective_dex_mod, armor_bonus, proficiency_bonus, shield_bonus]
        .into_iter()
        .fold(BASE_ARMOR_CLASS, i64::saturating_add);

    ArmorClass {
        total,
        base: BASE_ARMOR_CLASS,
        armor_bonus,
        shield_bonus,
        effective_dex_mod,
        proficiency_bonus,
        armor_check_penalty,
    }
}

fn derive_saves(record: &CharacterRecord, level: i64, modifiers: &AbilityTable) -> Vec<SaveDetail> {
    let has_fortitude_expertise = record
        .items_of(ItemKind::Feat)
        .any(|feat| feat.name == FORTITUDE_EXPERTISE_FEAT);

    SaveId::ALL
        .into_iter()
        .map(|save| {
            let computed = if save == SaveId::Fortitude && has_fortitude_expertise {
                2
            } else {
                save.baseline_rank()
            };
            let proficiency =
                resolve_with_override(computed, record.int_field(&["saves", save.key(), "rank"]));
            let ability = save.ability();
            let ability_mod = modifiers.get(&ability).copied().unwrap_or(0);
            let prof_bonus = rank_bonus(proficiency, level).unwrap_or(level);
            let base = 0;

            SaveDetail {
                save,
                ability,
                base,
                proficiency,
                ability_mod,
                prof_bonus,
                total: ability_mod.saturating_add(prof_bonus).saturating_add(base),
            }
        })
        .collect()
}

fn derive_attacks(record: &CharacterRecord, level: i64, modifiers: &AbilityTable) -> Attacks {
    let default_rank = if level >= EXPERT_MELEE_LEVEL { 2 } else { 1 };
    let class_rank = record
        .first_item_of(&ItemKind::Class)
        .and_then(|class| {
            WEAPON_CATEGORIES
                .iter()
                .filter_map(|category| class.int_field(&["attacks", *category]))
                .max()
        })
        .filter(|rank| *rank != 0);
    let proficiency = class_rank.unwrap_or(default_rank);

    let str_mod = modifiers.get(&Ability::Str).copied().unwrap_or(0);
    let dex_mod = modifiers.get(&Ability::Dex).copied().unwrap_or(0);
    let prof_bonus = rank_bonus(proficiency, level).unwrap_or(level);

    Attacks {
        melee: AttackDetail {
            proficiency,
            prof_bonus,
            str_mod,
            dex_mod,
            total: prof_bonus.saturating_add(str_mod.max(dex_mod)),
        },
    }
}

fn derive_skills(record: &CharacterRecord, level: i64, modifiers: &AbilityTable) -> Vec<SkillDetail> {
    let Some(Value::Object(skills)) = record.field(&["skills"]) else {
        return Vec::new();
    };

    skills
        .iter()
        .filter_map(|(key, data)| {
            let Value::Object(entry) = data else {
                return None;
            };
            let rank = entry.get("rank").map(|raw| as_int(raw).unwrap_or(0))?;
            let label = entry.get("label").and_then(as_text).unwrap_or_default();
            let explicit = entry.get("ability").and_then(as_text).and_then(|raw| {
                let ability = Ability::from_key(&raw);
                if ability.is_none() && !raw.trim().is_empty() {
                    warn!(
                        skill = key.as_str(),
                        ability = raw.as_str(),
                        "ignoring unknown skill ability"
                    );
                }
                ability
            });
            let computed = if key.contains("lore") || !label.is_empty() {
                LORE_SKILL_ABILITY
            } else {
                skill_ability(key).unwrap_or(UNLISTED_SKILL_ABILITY)
            };
            let ability = resolve_with_override(computed, explicit);
            let ability_mod = modifiers.get(&ability).copied().unwrap_or(0);
            let prof_bonus = rank_bonus(rank, level).unwrap_or(0);

            Some(SkillDetail {
                key: key.clone(),
                rank,
                ability,
                ability_mod,
                prof_bonus,
                total: prof_bonus.saturating_add(ability_mod),
                label,
            })
        })
        .collect()
}

fn derive_perception(
    record: &CharacterRecord,
    level: i64,
    modifiers: &AbilityTable,
) -> PerceptionDetail {
    let rank = resolve_with_override(
        DEFAULT_PERCEPTION_RANK,
        record.int_field(&["perception", "rank"]),
    );
    let wis_mod = modifiers.get(&Ability::Wis).copied().unwrap_or(0);
    let prof_bonus = rank_bonus(rank, level).unwrap_or(level);

    PerceptionDetail {
        rank,
        wis_mod,
        prof_bonus,
        total: wis_mod.saturating_add(prof_bonus),
    }
}

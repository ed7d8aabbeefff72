use sheet_core::core_api::{Ability, ArmorClass, AttackDetail, SaveDetail, Session, SkillDetail};
use sheet_core::profile::CharacterProfile;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::labels::skill_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

pub fn render_json_full(session: &Session, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(default_json(session)),
    }
}

fn default_json(session: &Session) -> JsonMap<String, JsonValue> {
    let profile = session.profile();
    let derived = session.derived();
    let mut out = JsonMap::new();

    out.insert("name".to_string(), JsonValue::String(profile.name.clone()));
    out.insert("level".to_string(), JsonValue::from(derived.level));
    out.insert("xp".to_string(), JsonValue::from(profile.xp));
    out.insert("hp".to_string(), JsonValue::from(profile.hp));
    out.insert("temp_hp".to_string(), JsonValue::from(profile.temp_hp));
    out.insert(
        "hero_points".to_string(),
        JsonValue::from(profile.hero_points),
    );
    out.insert(
        "max_hero_points".to_string(),
        JsonValue::from(profile.max_hero_points),
    );
    out.insert(
        "key_ability".to_string(),
        JsonValue::String(profile.key_ability.clone()),
    );
    out.insert(
        "class_key_ability".to_string(),
        JsonValue::String(profile.class_key_ability.clone()),
    );

    out.insert(
        "abilities".to_string(),
        JsonValue::Array(
            Ability::ALL
                .into_iter()
                .map(|ability| {
                    let mut m = JsonMap::new();
                    m.insert("ability".to_string(), JsonValue::String(ability.key().to_string()));
                    m.insert("score".to_string(), JsonValue::from(derived.score(ability)));
                    m.insert(
                        "modifier".to_string(),
                        JsonValue::from(derived.modifier(ability)),
                    );
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    out.insert(
        "armor_class".to_string(),
        armor_class_to_json(&derived.armor_class),
    );
    out.insert(
        "saves".to_string(),
        JsonValue::Array(derived.saves.iter().map(save_to_json).collect()),
    );
    out.insert(
        "melee_attack".to_string(),
        attack_to_json(&derived.attacks.melee),
    );

    let mut perception = JsonMap::new();
    perception.insert("rank".to_string(), JsonValue::from(derived.perception.rank));
    perception.insert(
        "wis_mod".to_string(),
        JsonValue::from(derived.perception.wis_mod),
    );
    perception.insert(
        "prof_bonus".to_string(),
        JsonValue::from(derived.perception.prof_bonus),
    );
    perception.insert(
        "total".to_string(),
        JsonValue::from(derived.perception.total),
    );
    out.insert("perception".to_string(), JsonValue::Object(perception));

    out.insert(
        "skills".to_string(),
        JsonValue::Array(derived.skills.iter().map(skill_to_json).collect()),
    );
    out.insert("defenses".to_string(), defenses_to_json(profile));
    out.insert(
        "resources".to_string(),
        JsonValue::Array(
            profile
                .resources
                .iter()
                .map(|r| {
                    let mut m = JsonMap::new();
                    m.insert("label".to_string(), JsonValue::String(r.label.clone()));
                    m.insert("value".to_string(), JsonValue::String(r.value.clone()));
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );

    out
}

fn armor_class_to_json(ac: &ArmorClass) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("total".to_string(), JsonValue::from(ac.total));
    m.insert("base".to_string(), JsonValue::from(ac.base));
    m.insert("armor_bonus".to_string(), JsonValue::from(ac.armor_bonus));
    m.insert("shield_bonus".to_string(), JsonValue::from(ac.shield_bonus));
    m.insert(
        "effective_dex_mod".to_string(),
        JsonValue::from(ac.effective_dex_mod),
    );
    m.insert(
        "proficiency_bonus".to_string(),
        JsonValue::from(ac.proficiency_bonus),
    );
    m.insert(
        "armor_check_penalty".to_string(),
        JsonValue::from(ac.armor_check_penalty),
    );
    JsonValue::Object(m)
}

fn save_to_json(save: &SaveDetail) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("save".to_string(), JsonValue::String(save.save.key().to_string()));
    m.insert("ability".to_string(), JsonValue::String(save.ability.key().to_string()));
    m.insert("rank".to_string(), JsonValue::from(save.proficiency));
    m.insert("ability_mod".to_string(), JsonValue::from(save.ability_mod));
    m.insert("prof_bonus".to_string(), JsonValue::from(save.prof_bonus));
    m.insert("total".to_string(), JsonValue::from(save.total));
    JsonValue::Object(m)
}

fn attack_to_json(attack: &AttackDetail) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("rank".to_string(), JsonValue::from(attack.proficiency));
    m.insert("prof_bonus".to_string(), JsonValue::from(attack.prof_bonus));
    m.insert("str_mod".to_string(), JsonValue::from(attack.str_mod));
    m.insert("dex_mod".to_string(), JsonValue::from(attack.dex_mod));
    m.insert("total".to_string(), JsonValue::from(attack.total));
    JsonValue::Object(m)
}

fn skill_to_json(skill: &SkillDetail) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("key".to_string(), JsonValue::String(skill.key.clone()));
    m.insert("name".to_string(), JsonValue::String(skill_name(skill)));
    m.insert("rank".to_string(), JsonValue::from(skill.rank));
    m.insert("ability".to_string(), JsonValue::String(skill.ability.key().to_string()));
    m.insert("ability_mod".to_string(), JsonValue::from(skill.ability_mod));
    m.insert("prof_bonus".to_string(), JsonValue::from(skill.prof_bonus));
    m.insert("total".to_string(), JsonValue::from(skill.total));
    JsonValue::Object(m)
}

fn defenses_to_json(profile: &CharacterProfile) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "resistances".to_string(),
        JsonValue::String(profile.resistances.clone()),
    );
    m.insert(
        "immunities".to_string(),
        JsonValue::String(profile.immunities.clone()),
    );
    m.insert(
        "weaknesses".to_string(),
        JsonValue::String(profile.weaknesses.clone()),
    );
    JsonValue::Object(m)
}

//! Descriptive character fields shown alongside the derived numbers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core_api::DerivedStats;
use crate::record::{CharacterRecord, ItemKind, as_text, lookup};
use crate::sanitize::{clean_value, format_list, format_typed_entries, normalize_list, title_case_key};

const HERO_POINTS_KEY: &str = "heroPoints";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalDetails {
    pub age: String,
    pub height: String,
    pub weight: String,
    pub gender: String,
    pub ethnicity: String,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    pub level: i64,
    pub xp: i64,
    pub hp: i64,
    pub temp_hp: i64,
    pub hero_points: i64,
    pub max_hero_points: i64,
    pub key_ability: String,
    pub class_key_ability: String,
    pub physical: PhysicalDetails,
    pub size: String,
    pub alignment: String,
    pub deity: String,
    pub languages: String,
    pub traits: String,
    pub speed: String,
    pub initiative: String,
    pub senses: String,
    pub exploration: String,
    pub resources: Vec<ResourceEntry>,
    pub resistances: String,
    pub immunities: String,
    pub weaknesses: String,
}

impl CharacterProfile {
    pub fn from_record(record: &CharacterRecord, derived: &DerivedStats) -> Self {
        let name = if record.name().is_empty() {
            "Unknown".to_string()
        } else {
            record.name().to_string()
        };

        let key_ability = record
            .text_field(&["details", "keyability", "value"])
            .filter(|key| !key.is_empty())
            .or_else(|| record.text_field(&["details", "keyAbility", "value"]))
            .unwrap_or_default();
        let class_key_ability = record
            .first_item_of(&ItemKind::Class)
            .and_then(|class| class.text_field(&["keyAbility"]))
            .unwrap_or_default();

        let detail = |field: &str| {
            record
                .text_field(&["details", field, "value"])
                .unwrap_or_default()
        };
        let physical = PhysicalDetails {
            age: detail("age"),
            height: detail("height"),
            weight: detail("weight"),
            gender: detail("gender"),
            ethnicity: detail("ethnicity"),
            nationality: detail("nationality"),
        };

        let system = record.system();
        let at = |path: &[&str]| lookup(system, path).cloned().unwrap_or(Value::Null);
        let exploration: Vec<Value> = normalize_list(&at(&["exploration"]))
            .into_iter()
            .map(|entry| match entry {
                Value::Object(ref map) => map.get("label").cloned().unwrap_or(Value::Null),
                other => other,
            })
            .collect();

        Self {
            name,
            level: derived.level,
            xp: record.int_field(&["details", "xp", "value"]).unwrap_or(0),
            hp: record.int_field(&["attributes", "hp", "value"]).unwrap_or(0),
            temp_hp: record.int_field(&["attributes", "hp", "temp"]).unwrap_or(0),
            hero_points: record
                .int_field(&["resources", HERO_POINTS_KEY, "value"])
                .unwrap_or(0),
            max_hero_points: record
                .int_field(&["resources", HERO_POINTS_KEY, "max"])
                .unwrap_or(0),
            key_ability,
            class_key_ability,
            physical,
            size: clean_value(&at(&["details", "size"])),
            alignment: clean_value(&at(&["details", "alignment"])),
            deity: clean_value(&at(&["details", "deity"])),
            languages: format_list(&at(&["details", "languages"]), "-"),
            traits: format_list(&at(&["traits", "traits", "value"]), "-"),
            speed: clean_value(&at(&["attributes", "speed"])),
            initiative: initiative_text(record, derived),
            senses: format_list(&at(&["attributes", "senses"]), "-"),
            exploration: format_list(&Value::Array(exploration), "-"),
            resources: resource_entries(record),
            resistances: format_typed_entries(&at(&["attributes", "resistances"])),
            immunities: format_typed_entries(&at(&["attributes", "immunities"])),
            weaknesses: format_typed_entries(&at(&["attributes", "weaknesses"])),
        }
    }
}

/// `initiative` may be a scalar, an object carrying a `total`, or an object
/// that defers to the perception statistic.
fn initiative_text(record: &CharacterRecord, derived: &DerivedStats) -> String {
    match record.field(&["initiative"]) {
        None => String::new(),
        Some(Value::Object(map)) => {
            if let Some(total) = map.get("total").filter(|total| !total.is_null()) {
                clean_value(total)
            } else if let Some(value) = map.get("value").filter(|value| !value.is_null()) {
                clean_value(value)
            } else if map.get("statistic").and_then(Value::as_str) == Some("perception") {
                derived.perception.total.to_string()
            } else {
                String::new()
            }
        }
        Some(other) => clean_value(other),
    }
}

fn resource_entries(record: &CharacterRecord) -> Vec<ResourceEntry> {
    let Some(Value::Object(resources)) = record.field(&["resources"]) else {
        return Vec::new();
    };
    resources
        .iter()
        .filter(|(key, _)| key.as_str() != HERO_POINTS_KEY)
        .filter_map(|(key, resource)| {
            let value = resource.get("value").filter(|v| !v.is_null()).and_then(as_text)?;
            let value = match resource.get("max").filter(|m| !m.is_null()).and_then(as_text) {
                Some(max) => format!("{value}/{max}"),
                None => value,
            };
            Some(ResourceEntry {
                label: title_case_key(key),
                value,
            })
        })
        .collect()
}

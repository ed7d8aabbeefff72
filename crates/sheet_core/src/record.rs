//! Raw character records and forgiving accessors over their JSON tree.
//!
//! The record format is not validated beyond the top-level `name`. Every
//! accessor here returns `None` (or a documented default) instead of failing
//! when a field is absent or has an unexpected shape.

use std::fmt;

use serde_json::Value;

use crate::core_api::{CoreError, CoreErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    Ancestry,
    Background,
    Class,
    Feat,
    Weapon,
    Armor,
    Shield,
    Equipment,
    Consumable,
    Treasure,
    Backpack,
    Action,
    SpellcastingEntry,
    Spell,
    Heritage,
    Other(String),
}

impl ItemKind {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "ancestry" => Self::Ancestry,
            "background" => Self::Background,
            "class" => Self::Class,
            "feat" => Self::Feat,
            "weapon" => Self::Weapon,
            "armor" => Self::Armor,
            "shield" => Self::Shield,
            "equipment" => Self::Equipment,
            "consumable" => Self::Consumable,
            "treasure" => Self::Treasure,
            "backpack" => Self::Backpack,
            "action" => Self::Action,
            "spellcastingEntry" => Self::SpellcastingEntry,
            "spell" => Self::Spell,
            "heritage" => Self::Heritage,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ancestry => "ancestry",
            Self::Background => "background",
            Self::Class => "class",
            Self::Feat => "feat",
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Shield => "shield",
            Self::Equipment => "equipment",
            Self::Consumable => "consumable",
            Self::Treasure => "treasure",
            Self::Backpack => "backpack",
            Self::Action => "action",
            Self::SpellcastingEntry => "spellcastingEntry",
            Self::Spell => "spell",
            Self::Heritage => "heritage",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Backpack)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub system: Value,
}

impl Item {
    pub fn from_value(value: &Value) -> Self {
        let id = text_at(value, &["_id"])
            .or_else(|| text_at(value, &["id"]))
            .unwrap_or_default();
        let name = text_at(value, &["name"]).unwrap_or_default();
        let kind = ItemKind::from_raw(text_at(value, &["type"]).as_deref().unwrap_or(""));
        let system = match value.get("system") {
            Some(system @ Value::Object(_)) => system.clone(),
            _ => Value::Null,
        };

        Self {
            id,
            name,
            kind,
            system,
        }
    }

    pub fn field(&self, path: &[&str]) -> Option<&Value> {
        lookup(&self.system, path)
    }

    pub fn int_field(&self, path: &[&str]) -> Option<i64> {
        int_at(&self.system, path)
    }

    pub fn text_field(&self, path: &[&str]) -> Option<String> {
        text_at(&self.system, path)
    }

    /// The id of the container holding this item, if any. Blank ids and
    /// self-references are treated as "not contained".
    pub fn container_id(&self) -> Option<&str> {
        let raw = self.field(&["containerId"])?.as_str()?.trim();
        if raw.is_empty() || raw == self.id {
            return None;
        }
        Some(raw)
    }

    pub fn quantity(&self) -> i64 {
        self.int_field(&["quantity"]).unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    name: String,
    system: Value,
    items: Vec<Item>,
}

impl CharacterRecord {
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let Value::Object(root) = value else {
            return Err(CoreError::new(
                CoreErrorCode::InvalidRecord,
                "character record must be a JSON object",
            ));
        };

        let name = match root.get("name") {
            None | Some(Value::Null) => {
                return Err(CoreError::new(
                    CoreErrorCode::InvalidRecord,
                    "character record has no `name` field",
                ));
            }
            Some(raw) => as_text(raw).unwrap_or_default(),
        };

        let system = match root.get("system") {
            Some(system @ Value::Object(_)) => system.clone(),
            _ => Value::Null,
        };
        let items = match root.get("items") {
            Some(Value::Array(raw_items)) => raw_items
                .iter()
                .filter(|raw| raw.is_object())
                .map(Item::from_value)
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            name,
            system,
            items,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system(&self) -> &Value {
        &self.system
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_of(&self, kind: ItemKind) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    pub fn first_item_of(&self, kind: &ItemKind) -> Option<&Item> {
        self.items.iter().find(|item| &item.kind == kind)
    }

    pub fn field(&self, path: &[&str]) -> Option<&Value> {
        lookup(&self.system, path)
    }

    pub fn int_field(&self, path: &[&str]) -> Option<i64> {
        int_at(&self.system, path)
    }

    pub fn text_field(&self, path: &[&str]) -> Option<String> {
        text_at(&self.system, path)
    }

    /// Character level, `details.level.value`, defaulting to 1.
    pub fn level(&self) -> i64 {
        self.int_field(&["details", "level", "value"]).unwrap_or(1)
    }
}

/// Walks `path` through nested objects. `null` leaves count as absent.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    if current.is_null() { None } else { Some(current) }
}

/// Best-effort integer coercion: numbers (fractions floored), numeric strings,
/// the first element of a list, or the `value` of an object.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(_) | Value::Null => None,
        Value::Array(values) => values.first().and_then(as_int),
        Value::Object(map) => map.get("value").and_then(as_int),
    }
}

/// Best-effort text coercion: strings as-is, numbers and booleans printed,
/// the first element of a list, or an object's `value`/`label`.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        Value::Array(values) => values.first().and_then(as_text),
        Value::Object(map) => map
            .get("value")
            .or_else(|| map.get("label"))
            .and_then(as_text),
    }
}

pub fn int_at(value: &Value, path: &[&str]) -> Option<i64> {
    lookup(value, path).and_then(as_int)
}

pub fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    lookup(value, path).and_then(as_text)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CharacterRecord, ItemKind, as_int, as_text, lookup};
    use crate::core_api::CoreErrorCode;

    #[test]
    fn record_without_name_is_rejected() {
        let err = CharacterRecord::from_value(json!({ "system": {} }))
            .expect_err("nameless record should be rejected");
        assert_eq!(err.code, CoreErrorCode::InvalidRecord);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = CharacterRecord::from_json_bytes(b"{ not json")
            .expect_err("garbage should not parse");
        assert_eq!(err.code, CoreErrorCode::Parse);
    }

    #[test]
    fn level_defaults_to_one() {
        let record = CharacterRecord::from_value(json!({ "name": "Ezren" }))
            .expect("record should load");
        assert_eq!(record.level(), 1);
        assert!(record.items().is_empty());
    }

    #[test]
    fn coercion_takes_first_list_element_and_object_value() {
        assert_eq!(as_int(&json!([3, 4])), Some(3));
        assert_eq!(as_int(&json!({ "value": "7" })), Some(7));
        assert_eq!(as_int(&json!(2.5)), Some(2));
        assert_eq!(as_int(&json!("many")), None);
        assert_eq!(as_text(&json!(["int", "wis"])).as_deref(), Some("int"));
        assert_eq!(as_text(&json!({ "label": "Scout" })).as_deref(), Some("Scout"));
    }

    #[test]
    fn lookup_treats_null_and_scalars_as_absent() {
        let value = json!({ "a": { "b": null, "c": 5 } });
        assert!(lookup(&value, &["a", "b"]).is_none());
        assert!(lookup(&value, &["a", "c", "d"]).is_none());
        assert_eq!(lookup(&value, &["a", "c"]), Some(&json!(5)));
    }

    #[test]
    fn unknown_item_types_are_kept_opaque() {
        assert_eq!(ItemKind::from_raw("lore"), ItemKind::Other("lore".to_string()));
        assert_eq!(ItemKind::from_raw("spellcastingEntry").as_str(), "spellcastingEntry");
    }
}

//! Normalization of free-form record text into displayable strings.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::record::as_text;

static INLINE_ROLL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[.*?\]\]").expect("inline roll pattern is valid"));
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("bracket pattern is valid"));

/// Strips inline roll markup (`[[/r 1d20]]`) and bracketed references, then
/// trims surrounding whitespace.
pub fn clean_text(text: &str) -> String {
    let without_rolls = INLINE_ROLL.replace_all(text, "");
    let without_refs = BRACKETED.replace_all(&without_rolls, "");
    without_refs.trim().to_string()
}

/// Cleaned display text for an arbitrary JSON value; absent shapes become "".
pub fn clean_value(value: &Value) -> String {
    match value {
        Value::Array(values) => values
            .iter()
            .map(clean_value)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => as_text(other).map(|text| clean_text(&text)).unwrap_or_default(),
    }
}

/// Flattens list-like shapes: a list stays a list, an object with a `value`
/// unwraps it, any other object contributes its values, a scalar becomes a
/// one-element list.
pub fn normalize_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(values) => values.clone(),
        Value::Object(map) => match map.get("value") {
            Some(inner) => normalize_list(inner),
            None => map.values().cloned().collect(),
        },
        scalar => vec![scalar.clone()],
    }
}

pub fn format_list(value: &Value, empty_label: &str) -> String {
    let values: Vec<String> = normalize_list(value)
        .iter()
        .map(clean_value)
        .filter(|text| !text.is_empty())
        .collect();
    if values.is_empty() {
        empty_label.to_string()
    } else {
        values.join(", ")
    }
}

/// Formats resistance-style entries (`{ "type": "fire", "value": 5 }`) as
/// `fire 5`, falling back to the cleaned entry text.
pub fn format_typed_entries(value: &Value) -> String {
    let entries: Vec<String> = normalize_list(value)
        .iter()
        .map(|entry| {
            let Value::Object(map) = entry else {
                return clean_value(entry);
            };
            let kind = map.get("type").map(clean_value).unwrap_or_default();
            let amount = map
                .get("value")
                .filter(|v| !v.is_null() && v.as_str() != Some(""))
                .and_then(as_text);
            match amount {
                Some(amount) if !kind.is_empty() => format!("{kind} {amount}"),
                _ if !kind.is_empty() => kind,
                _ => clean_value(entry),
            }
        })
        .filter(|text| !text.is_empty())
        .collect();

    if entries.is_empty() {
        "-".to_string()
    } else {
        entries.join(", ")
    }
}

/// `focus_points` -> `Focus Points`.
pub fn title_case_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        clean_text, clean_value, escape_html, format_list, format_typed_entries, title_case_key,
    };

    #[test]
    fn clean_text_strips_roll_markup_and_references() {
        assert_eq!(clean_text("  Strike [[/r 1d20+7]] now "), "Strike  now");
        assert_eq!(clean_text("@UUID[Compendium.pf2e.spells]{Shield}"), "@UUID{Shield}");
        assert_eq!(clean_text("plain"), "plain");
    }

    #[test]
    fn clean_value_handles_non_string_shapes() {
        assert_eq!(clean_value(&json!(null)), "");
        assert_eq!(clean_value(&json!(25)), "25");
        assert_eq!(clean_value(&json!({ "value": "medium" })), "medium");
        assert_eq!(clean_value(&json!(["common", "", "human"])), "common, human");
    }

    #[test]
    fn format_list_uses_empty_label() {
        assert_eq!(format_list(&json!([]), "-"), "-");
        assert_eq!(format_list(&json!({ "value": ["a", "b"] }), "-"), "a, b");
        assert_eq!(format_list(&json!("darkvision"), "-"), "darkvision");
    }

    #[test]
    fn typed_entries_join_type_and_value() {
        let entries = json!([{ "type": "fire", "value": 5 }, { "type": "poison" }]);
        assert_eq!(format_typed_entries(&entries), "fire 5, poison");
        assert_eq!(format_typed_entries(&json!([])), "-");
    }

    #[test]
    fn title_case_key_splits_on_underscores() {
        assert_eq!(title_case_key("focus_points"), "Focus Points");
        assert_eq!(title_case_key("crafting"), "Crafting");
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }
}

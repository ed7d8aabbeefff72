use serde_json::json;
use sheet_core::sections::{SECTION_TREE, Section, SectionConfig};

#[test]
fn default_enables_everything() {
    let config = SectionConfig::default();
    for section in Section::ALL {
        assert!(config.is_enabled(section), "{section} should default on");
    }
    assert!(config.is_normalized());
}

#[test]
fn disabled_parent_forces_children_off() {
    let config = SectionConfig::default()
        .with(Section::Info, false)
        .with(Section::InfoPhysical, true);
    assert!(!config.is_normalized());

    let normalized = config.normalize();
    for child in Section::Info.children() {
        assert!(!normalized.is_enabled(*child), "{child} should be off");
    }
    assert!(normalized.is_enabled(Section::Summary));
    assert!(normalized.is_enabled(Section::SpellsList));
}

#[test]
fn normalize_is_idempotent() {
    let config = SectionConfig::default()
        .with(Section::Summary, false)
        .with(Section::SpellsNotes, false)
        .with(Section::TalentsEquipment, false);
    let once = config.normalize();
    assert_eq!(once.normalize(), once);
    assert!(once.is_normalized());
}

#[test]
fn enabled_parent_leaves_children_alone() {
    let config = SectionConfig::default().with(Section::InventoryNotes, false);
    let normalized = config.normalize();
    assert_eq!(normalized, config);
    assert!(!normalized.is_enabled(Section::InventoryNotes));
}

#[test]
fn tree_covers_every_child_once() {
    let mut seen = Vec::new();
    for (parent, children) in SECTION_TREE {
        assert_eq!(parent.parent(), None);
        for child in children {
            assert_eq!(child.parent(), Some(parent));
            assert!(!seen.contains(child));
            seen.push(*child);
        }
    }
    assert_eq!(seen.len() + SECTION_TREE.len(), Section::ALL.len());
}

#[test]
fn keys_round_trip_and_accept_snake_case() {
    for section in Section::ALL {
        assert_eq!(Section::from_key(section.key()), Some(section));
    }
    assert_eq!(Section::from_key("summary_stats"), Some(Section::SummaryStats));
    assert_eq!(
        Section::from_key("talents_equipment"),
        Some(Section::TalentsEquipment)
    );
    assert_eq!(Section::from_key("Info.Physical"), Some(Section::InfoPhysical));
    assert_eq!(Section::from_key("portrait"), None);
}

#[test]
fn reads_flat_toggles() {
    let config = SectionConfig::from_json(&json!({
        "summary.stats": false,
        "inventory_notes": "false",
        "spells": true,
        "portrait": false
    }));
    assert!(!config.is_enabled(Section::SummaryStats));
    assert!(!config.is_enabled(Section::InventoryNotes));
    assert!(config.is_enabled(Section::Spells));
    assert!(config.is_enabled(Section::Summary));
}

#[test]
fn reads_nested_toggles() {
    let config = SectionConfig::from_json(&json!({
        "info": { "enabled": false, "physical": true },
        "summary": { "skills": false, "bogus": false },
        "spells": { "enabled": "true", "notes": 0 }
    }));
    assert!(!config.is_enabled(Section::Info));
    assert!(config.is_enabled(Section::InfoPhysical));
    assert!(!config.is_enabled(Section::SummarySkills));
    assert!(config.is_enabled(Section::Spells));
    assert!(config.is_enabled(Section::SpellsNotes));

    // Loading keeps raw values; gating happens on normalize.
    assert!(!config.normalize().is_enabled(Section::InfoPhysical));
}

#[test]
fn non_object_input_yields_defaults() {
    assert_eq!(SectionConfig::from_json(&json!([1, 2])), SectionConfig::default());
    assert_eq!(SectionConfig::from_json(&json!(null)), SectionConfig::default());
}

#[test]
fn serializes_every_section_in_canonical_order() {
    let config = SectionConfig::default().with(Section::SpellsResources, false);
    let value = serde_json::to_value(config).expect("config should serialize");
    let map = value.as_object().expect("config serializes to an object");

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    let expected: Vec<&str> = Section::ALL.iter().map(|s| s.key()).collect();
    assert_eq!(keys, expected);
    assert_eq!(map["spells.resources"], json!(false));
    assert_eq!(value, config.to_json());

    let back: SectionConfig = serde_json::from_value(value).expect("config should deserialize");
    assert_eq!(back, config);
}

//! Report section toggles.
//!
//! Sections form a fixed two-level tree. A disabled parent disables all of its
//! children; [`SectionConfig::normalize`] is the single place that rule is
//! applied.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Summary,
    SummaryStats,
    SummaryAttributes,
    SummaryDefenses,
    SummarySkills,
    TalentsEquipment,
    Talents,
    Equipment,
    InventoryNotes,
    Info,
    InfoDetails,
    InfoPhysical,
    InfoOrigin,
    InfoData,
    InfoResist,
    InfoActions,
    Spells,
    SpellsList,
    SpellsResources,
    SpellsNotes,
}

const SECTION_COUNT: usize = 20;

/// Parent sections and the children they gate.
pub const SECTION_TREE: [(Section, &[Section]); 4] = [
    (
        Section::Summary,
        &[
            Section::SummaryStats,
            Section::SummaryAttributes,
            Section::SummaryDefenses,
            Section::SummarySkills,
        ],
    ),
    (
        Section::TalentsEquipment,
        &[Section::Talents, Section::Equipment, Section::InventoryNotes],
    ),
    (
        Section::Info,
        &[
            Section::InfoDetails,
            Section::InfoPhysical,
            Section::InfoOrigin,
            Section::InfoData,
            Section::InfoResist,
            Section::InfoActions,
        ],
    ),
    (
        Section::Spells,
        &[
            Section::SpellsList,
            Section::SpellsResources,
            Section::SpellsNotes,
        ],
    ),
];

impl Section {
    pub const ALL: [Section; SECTION_COUNT] = [
        Section::Summary,
        Section::SummaryStats,
        Section::SummaryAttributes,
        Section::SummaryDefenses,
        Section::SummarySkills,
        Section::TalentsEquipment,
        Section::Talents,
        Section::Equipment,
        Section::InventoryNotes,
        Section::Info,
        Section::InfoDetails,
        Section::InfoPhysical,
        Section::InfoOrigin,
        Section::InfoData,
        Section::InfoResist,
        Section::InfoActions,
        Section::Spells,
        Section::SpellsList,
        Section::SpellsResources,
        Section::SpellsNotes,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::SummaryStats => "summary.stats",
            Self::SummaryAttributes => "summary.attributes",
            Self::SummaryDefenses => "summary.defenses",
            Self::SummarySkills => "summary.skills",
            Self::TalentsEquipment => "talentsEquipment",
            Self::Talents => "talents",
            Self::Equipment => "equipment",
            Self::InventoryNotes => "inventoryNotes",
            Self::Info => "info",
            Self::InfoDetails => "info.details",
            Self::InfoPhysical => "info.physical",
            Self::InfoOrigin => "info.origin",
            Self::InfoData => "info.data",
            Self::InfoResist => "info.resist",
            Self::InfoActions => "info.actions",
            Self::Spells => "spells",
            Self::SpellsList => "spells.list",
            Self::SpellsResources => "spells.resources",
            Self::SpellsNotes => "spells.notes",
        }
    }

    /// Accepts the canonical key as well as the snake_case spelling used by
    /// older config files (`summary_stats`, `talents_equipment`).
    pub fn from_key(key: &str) -> Option<Self> {
        let wanted = normalize_key(key);
        Self::ALL
            .into_iter()
            .find(|section| normalize_key(section.key()) == wanted)
    }

    pub fn parent(self) -> Option<Section> {
        SECTION_TREE
            .iter()
            .find(|(_, children)| children.contains(&self))
            .map(|(parent, _)| *parent)
    }

    pub fn children(self) -> &'static [Section] {
        SECTION_TREE
            .iter()
            .find(|(parent, _)| *parent == self)
            .map(|(_, children)| *children)
            .unwrap_or(&[])
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|ch| !matches!(ch, '.' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionConfig {
    flags: [bool; SECTION_COUNT],
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            flags: [true; SECTION_COUNT],
        }
    }
}

impl SectionConfig {
    pub fn is_enabled(&self, section: Section) -> bool {
        self.flags[section.index()]
    }

    pub fn set(&mut self, section: Section, enabled: bool) {
        self.flags[section.index()] = enabled;
    }

    pub fn with(mut self, section: Section, enabled: bool) -> Self {
        self.set(section, enabled);
        self
    }

    /// Forces every child of a disabled parent off. Idempotent.
    pub fn normalize(&self) -> Self {
        let mut out = *self;
        for (parent, children) in SECTION_TREE {
            if out.is_enabled(parent) {
                continue;
            }
            for child in children {
                out.set(*child, false);
            }
        }
        out
    }

    pub fn is_normalized(&self) -> bool {
        self.normalize() == *self
    }

    /// Reads toggles from a JSON object. Keys may be flat (`summary.stats`,
    /// `summary_stats`) or nested under their parent
    /// (`{"summary": {"enabled": true, "stats": false}}`). Unknown keys and
    /// non-boolean values are ignored; absent toggles stay enabled.
    pub fn from_json(value: &Value) -> Self {
        let mut config = Self::default();
        let Value::Object(map) = value else {
            return config;
        };

        for (key, raw) in map {
            match raw {
                Value::Object(nested) => {
                    let Some(parent) = Section::from_key(key) else {
                        debug!(key = key.as_str(), "ignoring unknown section group");
                        continue;
                    };
                    for (child_key, child_raw) in nested {
                        let Some(enabled) = flag_value(child_raw) else {
                            continue;
                        };
                        if child_key == "enabled" {
                            config.set(parent, enabled);
                        } else if let Some(child) = nested_child(parent, child_key) {
                            config.set(child, enabled);
                        }
                    }
                }
                other => match (Section::from_key(key), flag_value(other)) {
                    (Some(section), Some(enabled)) => config.set(section, enabled),
                    _ => debug!(key = key.as_str(), "ignoring unknown section toggle"),
                },
            }
        }
        config
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            Section::ALL
                .into_iter()
                .map(|section| {
                    (
                        section.key().to_string(),
                        Value::Bool(self.is_enabled(section)),
                    )
                })
                .collect(),
        )
    }
}

fn nested_child(parent: Section, child_key: &str) -> Option<Section> {
    Section::from_key(&format!("{}.{child_key}", parent.key()))
        .or_else(|| Section::from_key(child_key))
        .filter(|child| child.parent() == Some(parent))
}

fn flag_value(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

impl Serialize for SectionConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SECTION_COUNT))?;
        for section in Section::ALL {
            map.serialize_entry(section.key(), &self.is_enabled(section))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

//! Grouping of record items by kind, with containment and per-kind display
//! hints resolved once per record.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;

use crate::core_api::FeatCategory;
use crate::record::{Item, ItemKind, as_text};
use crate::sanitize::{clean_text, clean_value, normalize_list};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponDetail {
    pub damage: Option<String>,
    pub range: Option<String>,
    pub bonus: i64,
    pub runes: Vec<String>,
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmorDetail {
    pub ac_bonus: i64,
    pub dex_cap: Option<i64>,
    pub check_penalty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellDetail {
    pub level: Option<i64>,
    pub time: String,
    pub range: String,
    pub traits: Vec<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDetail {
    Weapon(WeaponDetail),
    Armor(ArmorDetail),
    Shield { ac_bonus: i64 },
    Treasure { price: Vec<(String, String)> },
    Action { action_type: String, actions: String },
    Spell(SpellDetail),
    SpellcastingEntry { tradition: String, prepared: String },
    Feat { category: Option<FeatCategory>, level: i64 },
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEntry {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub quantity: i64,
    pub container_id: Option<String>,
    pub detail: ItemDetail,
}

impl ItemEntry {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            name: clean_text(&item.name),
            kind: item.kind.clone(),
            quantity: item.quantity(),
            container_id: item.container_id().map(ToOwned::to_owned),
            detail: item_detail(item),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerGroup {
    pub container: ItemEntry,
    pub members: Vec<ItemEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellcastingGroup {
    pub entry: ItemEntry,
    pub spells: Vec<ItemEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedItems {
    all: BTreeMap<ItemKind, Vec<ItemEntry>>,
    loose: BTreeMap<ItemKind, Vec<ItemEntry>>,
    containers: Vec<ContainerGroup>,
    spellcasting: Vec<SpellcastingGroup>,
}

impl CategorizedItems {
    /// Every item of `kind`, deduplicated by display name.
    pub fn all(&self, kind: &ItemKind) -> &[ItemEntry] {
        self.all.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Items of `kind` that are not held by another item in the record.
    pub fn loose(&self, kind: &ItemKind) -> &[ItemEntry] {
        self.loose.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn containers(&self) -> &[ContainerGroup] {
        &self.containers
    }

    pub fn spellcasting(&self) -> &[SpellcastingGroup] {
        &self.spellcasting
    }

    pub fn feats(&self, category: FeatCategory) -> Vec<&ItemEntry> {
        self.all(&ItemKind::Feat)
            .iter()
            .filter(|entry| {
                matches!(entry.detail, ItemDetail::Feat { category: Some(c), .. } if c == category)
            })
            .collect()
    }
}

pub fn classify(items: &[Item]) -> CategorizedItems {
    let ids: HashSet<&str> = items
        .iter()
        .map(|item| item.id.as_str())
        .filter(|id| !id.is_empty())
        .collect();

    // One pass builds the container -> members index; containment is never
    // followed past this single hop.
    let mut members_by_container: HashMap<&str, Vec<&Item>> = HashMap::new();
    for item in items {
        if let Some(container_id) = item.container_id()
            && ids.contains(container_id)
        {
            members_by_container.entry(container_id).or_default().push(item);
        }
    }
    let is_contained = |item: &Item| {
        item.container_id()
            .is_some_and(|container_id| ids.contains(container_id))
    };

    let mut all: BTreeMap<ItemKind, Vec<ItemEntry>> = BTreeMap::new();
    let mut loose: BTreeMap<ItemKind, Vec<ItemEntry>> = BTreeMap::new();
    for item in items {
        let entry = ItemEntry::from_item(item);
        if !is_contained(item) {
            loose.entry(item.kind.clone()).or_default().push(entry.clone());
        }
        all.entry(item.kind.clone()).or_default().push(entry);
    }
    for list in all.values_mut().chain(loose.values_mut()) {
        dedup_by_name(list);
    }

    let containers = items
        .iter()
        .filter(|item| item.kind.is_container())
        .map(|container| {
            let mut members: Vec<ItemEntry> = members_by_container
                .get(container.id.as_str())
                .map(|held| held.iter().map(|item| ItemEntry::from_item(item)).collect())
                .unwrap_or_default();
            dedup_by_name(&mut members);
            ContainerGroup {
                container: ItemEntry::from_item(container),
                members,
            }
        })
        .collect();

    let spellcasting = group_spells(items);

    CategorizedItems {
        all,
        loose,
        containers,
        spellcasting,
    }
}

/// Keeps the first entry for each non-blank display name.
pub fn dedup_by_name(entries: &mut Vec<ItemEntry>) {
    let mut seen = HashSet::new();
    entries.retain(|entry| entry.name.is_empty() || seen.insert(entry.name.clone()));
}

fn group_spells(items: &[Item]) -> Vec<SpellcastingGroup> {
    let mut spells_by_location: HashMap<String, Vec<ItemEntry>> = HashMap::new();
    for spell in items.iter().filter(|item| item.kind == ItemKind::Spell) {
        let entry = ItemEntry::from_item(spell);
        let location = match &entry.detail {
            ItemDetail::Spell(detail) => detail.location.clone(),
            _ => None,
        };
        if let Some(location) = location {
            spells_by_location.entry(location).or_default().push(entry);
        }
    }

    items
        .iter()
        .filter(|item| item.kind == ItemKind::SpellcastingEntry)
        .map(|entry| {
            let mut spells = spells_by_location.get(&entry.id).cloned().unwrap_or_default();
            dedup_by_name(&mut spells);
            SpellcastingGroup {
                entry: ItemEntry::from_item(entry),
                spells,
            }
        })
        .collect()
}

fn item_detail(item: &Item) -> ItemDetail {
    match item.kind {
        ItemKind::Weapon => ItemDetail::Weapon(weapon_detail(item)),
        ItemKind::Armor => ItemDetail::Armor(ArmorDetail {
            ac_bonus: item.int_field(&["acBonus"]).unwrap_or(0),
            dex_cap: item.int_field(&["dexCap"]),
            check_penalty: item.int_field(&["checkPenalty"]).unwrap_or(0),
        }),
        ItemKind::Shield => ItemDetail::Shield {
            ac_bonus: item.int_field(&["acBonus"]).unwrap_or(0),
        },
        ItemKind::Treasure => ItemDetail::Treasure {
            price: match item.field(&["price", "value"]) {
                Some(Value::Object(coins)) => coins
                    .iter()
                    .filter_map(|(denomination, amount)| {
                        as_text(amount).map(|amount| (denomination.clone(), amount))
                    })
                    .collect(),
                _ => Vec::new(),
            },
        },
        ItemKind::Action => ItemDetail::Action {
            action_type: item
                .text_field(&["actionType", "value"])
                .unwrap_or_default(),
            actions: item.text_field(&["actions", "value"]).unwrap_or_default(),
        },
        ItemKind::Spell => ItemDetail::Spell(SpellDetail {
            level: item.int_field(&["level", "value"]),
            time: item.text_field(&["time", "value"]).unwrap_or_default(),
            range: item.text_field(&["range", "value"]).unwrap_or_default(),
            traits: cleaned_list(item.field(&["traits", "value"])),
            location: item
                .text_field(&["location", "value"])
                .filter(|location| !location.is_empty()),
        }),
        ItemKind::SpellcastingEntry => ItemDetail::SpellcastingEntry {
            tradition: item.text_field(&["tradition", "value"]).unwrap_or_default(),
            prepared: item.text_field(&["prepared", "value"]).unwrap_or_default(),
        },
        ItemKind::Feat => ItemDetail::Feat {
            category: FeatCategory::from_key(
                item.text_field(&["category"])
                    .as_deref()
                    .unwrap_or("general"),
            ),
            level: item.int_field(&["level", "value"]).unwrap_or(0),
        },
        _ => ItemDetail::Plain,
    }
}

fn weapon_detail(item: &Item) -> WeaponDetail {
    let dice = item.int_field(&["damage", "dice"]).unwrap_or(0);
    let die = item.text_field(&["damage", "die"]).unwrap_or_default();
    let damage_type = item
        .field(&["damage", "damageType"])
        .map(clean_value)
        .unwrap_or_default();
    let damage = (dice != 0 && !die.is_empty() && die != "0").then(|| {
        let roll = if die.starts_with('d') {
            format!("{dice}{die}")
        } else {
            format!("{dice}d{die}")
        };
        if damage_type.is_empty() {
            roll
        } else {
            format!("{roll} {damage_type}")
        }
    });

    let range = item
        .field(&["range"])
        .and_then(as_text)
        .filter(|range| !range.is_empty() && range != "0");

    let mut runes = Vec::new();
    let potency = item.int_field(&["runes", "potency"]).unwrap_or(0);
    if potency != 0 {
        runes.push(format!("+{potency}"));
    }
    match item.int_field(&["runes", "striking"]).unwrap_or(0) {
        0 => {}
        1 => runes.push("striking".to_string()),
        striking => runes.push(format!("striking {striking}")),
    }
    runes.extend(cleaned_list(item.field(&["runes", "property"])));

    WeaponDetail {
        damage,
        range,
        bonus: item.int_field(&["bonus", "value"]).unwrap_or(0),
        runes,
        traits: cleaned_list(item.field(&["traits", "value"])),
    }
}

fn cleaned_list(value: Option<&Value>) -> Vec<String> {
    value
        .map(normalize_list)
        .unwrap_or_default()
        .iter()
        .map(clean_value)
        .filter(|text| !text.is_empty())
        .collect()
}

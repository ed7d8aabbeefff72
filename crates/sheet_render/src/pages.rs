//! Composition of the sheet's pages from derived statistics, the profile and
//! the classified items, gated by the section toggles.

use std::collections::HashSet;

use sheet_core::classify::{CategorizedItems, ItemDetail, ItemEntry};
use sheet_core::core_api::{Ability, DerivedStats, FeatCategory, SaveId, Session};
use sheet_core::profile::CharacterProfile;
use sheet_core::record::ItemKind;
use sheet_core::sections::{Section, SectionConfig};

use crate::document::{Block, Card, Document, Page, PageKind, Part, Table};
use crate::labels::{ability_name, key_ability_display, rank_label, save_name, signed, skill_name};

const WEAPON_LIMIT: usize = 12;
const ARMOR_LIMIT: usize = 6;
const SHIELD_LIMIT: usize = 6;
const EQUIPMENT_LIMIT: usize = 30;
const CONSUMABLE_LIMIT: usize = 20;
const TREASURE_LIMIT: usize = 20;
const ACTION_LIMIT: usize = 30;
const ORIGIN_LIMIT: usize = 5;
const CONTAINER_LIMIT: usize = 50;
const XP_PER_LEVEL: i64 = 1000;
const SYSTEM_LABEL: &str = "Pathfinder 2E";
const NO_SPELLCASTING_NOTE: &str = "No spellcasting entries found.";
const RESOURCES_NOTE: &str = "Space reserved for focus and magical resources.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Document title; when empty it is built from the character name.
    pub title: String,
    /// Shown in the summary subtitle when present.
    pub generated_at: Option<String>,
}

struct SheetContext<'a> {
    derived: &'a DerivedStats,
    profile: &'a CharacterProfile,
    items: &'a CategorizedItems,
    config: SectionConfig,
    key_ability: String,
}

impl SheetContext<'_> {
    fn enabled(&self, section: Section) -> bool {
        self.config.is_enabled(section)
    }

    fn name_and_level(&self) -> String {
        format!("{} • Level {}", self.profile.name, self.profile.level)
    }

    fn key_ability_chip(&self) -> String {
        format!("Key Ability: {}", self.key_ability)
    }
}

pub fn render_session(
    session: &Session,
    config: &SectionConfig,
    options: &RenderOptions,
) -> Document {
    render(
        session.derived(),
        session.profile(),
        session.items(),
        config,
        options,
    )
}

/// Builds the document. The toggles are normalized here, so a disabled parent
/// always hides its children regardless of what the caller passed.
pub fn render(
    derived: &DerivedStats,
    profile: &CharacterProfile,
    items: &CategorizedItems,
    config: &SectionConfig,
    options: &RenderOptions,
) -> Document {
    let ctx = SheetContext {
        derived,
        profile,
        items,
        config: config.normalize(),
        key_ability: key_ability_display(profile),
    };

    let title = if options.title.trim().is_empty() {
        format!("{} - Character Sheet", profile.name)
    } else {
        options.title.clone()
    };

    let pages = [
        summary_page(&ctx, options),
        talents_page(&ctx),
        equipment_page(&ctx),
        information_page(&ctx),
        spells_page(&ctx),
    ]
    .into_iter()
    .flatten()
    .collect();

    Document { title, pages }
}

fn page(
    kind: PageKind,
    title: impl Into<String>,
    subtitle: impl Into<String>,
    chips: Vec<String>,
    blocks: Vec<Block>,
) -> Option<Page> {
    if blocks.is_empty() {
        return None;
    }
    Some(Page {
        kind,
        title: title.into(),
        subtitle: subtitle.into(),
        chips,
        blocks,
    })
}

fn grid(columns: usize, cards: Vec<Card>) -> Option<Block> {
    (!cards.is_empty()).then_some(Block::Grid { columns, cards })
}

// ----- summary

fn summary_page(ctx: &SheetContext<'_>, options: &RenderOptions) -> Option<Page> {
    if !ctx.enabled(Section::Summary) {
        return None;
    }

    let mut blocks = Vec::new();
    if ctx.enabled(Section::SummaryStats) {
        blocks.extend(grid(
            3,
            vec![hit_points_card(ctx), armor_class_card(ctx), perception_card(ctx)],
        ));
    }

    let mut pair = Vec::new();
    if ctx.enabled(Section::SummaryAttributes) {
        pair.push(attributes_card(ctx));
    }
    if ctx.enabled(Section::SummaryDefenses) {
        pair.push(defenses_card(ctx));
    }
    blocks.extend(grid(2, pair));

    if ctx.enabled(Section::SummarySkills) {
        blocks.push(Block::Card(skills_card(ctx)));
    }

    let mut subtitle = format!("{SYSTEM_LABEL} • Level {}", ctx.profile.level);
    if let Some(generated_at) = &options.generated_at {
        subtitle.push_str(&format!(" • Generated {generated_at}"));
    }
    let chips = vec![
        format!("XP {}/{XP_PER_LEVEL}", ctx.profile.xp),
        format!(
            "Hero Points {}/{}",
            ctx.profile.hero_points, ctx.profile.max_hero_points
        ),
    ];

    page(
        PageKind::Summary,
        ctx.profile.name.clone(),
        subtitle,
        chips,
        blocks,
    )
}

fn hit_points_card(ctx: &SheetContext<'_>) -> Card {
    Card::new("Hit Points")
        .with(Part::Stat(ctx.profile.hp.to_string()))
        .with(Part::Note(format!("Temporary: +{}", ctx.profile.temp_hp)))
}

fn armor_class_card(ctx: &SheetContext<'_>) -> Card {
    let ac = &ctx.derived.armor_class;
    Card::new("Armor Class")
        .with(Part::Stat(ac.total.to_string()))
        .with(Part::Note(format!(
            "Armor {} | Shield {}",
            signed(ac.armor_bonus),
            signed(ac.shield_bonus)
        )))
}

fn perception_card(ctx: &SheetContext<'_>) -> Card {
    let perception = &ctx.derived.perception;
    Card::new("Perception")
        .with(Part::Stat(signed(perception.total)))
        .with(Part::Note(format!(
            "Wis {} | Prof {}",
            signed(perception.wis_mod),
            signed(perception.prof_bonus)
        )))
}

fn attributes_card(ctx: &SheetContext<'_>) -> Card {
    let table = Ability::ALL.into_iter().fold(
        Table::new(["Ability", "Score", "Mod"]),
        |table, ability| {
            table.row([
                ability_name(ability).to_string(),
                ctx.derived.score(ability).to_string(),
                signed(ctx.derived.modifier(ability)),
            ])
        },
    );
    Card::new("Abilities").with(Part::Table(table))
}

fn defenses_card(ctx: &SheetContext<'_>) -> Card {
    let table = SaveId::ALL
        .into_iter()
        .filter_map(|save| ctx.derived.save(save))
        .fold(Table::new(["Save", "Total", "Details"]), |table, save| {
            table.row([
                save_name(save.save).to_string(),
                signed(save.total),
                format!(
                    "Mod: {} | Prof: {}",
                    signed(save.ability_mod),
                    signed(save.prof_bonus)
                ),
            ])
        });
    Card::new("Defenses")
        .with(Part::Table(table))
        .with(Part::Note(format!(
            "Melee attack: {}",
            signed(ctx.derived.attacks.melee.total)
        )))
}

fn skills_card(ctx: &SheetContext<'_>) -> Card {
    let table = ctx.derived.skills.iter().fold(
        Table::new(["Skill", "Rank", "Mod", "Prof", "Total"]),
        |table, skill| {
            table.row([
                skill_name(skill),
                rank_label(skill.rank),
                signed(skill.ability_mod),
                signed(skill.prof_bonus),
                signed(skill.total),
            ])
        },
    );
    Card::new("Skills").with(Part::Table(table))
}

// ----- talents and equipment

fn talents_page(ctx: &SheetContext<'_>) -> Option<Page> {
    if !ctx.enabled(Section::TalentsEquipment) || !ctx.enabled(Section::Talents) {
        return None;
    }

    let feats = |category| Part::List(enumerate(ctx.items.feats(category), usize::MAX));
    let cards = vec![
        Card::new("Ancestry Feats")
            .with(feats(FeatCategory::Ancestry))
            .with(Part::Subheading("Class Feats".to_string()))
            .with(feats(FeatCategory::Class)),
        Card::new("Skill Feats")
            .with(feats(FeatCategory::Skill))
            .with(Part::Subheading("General Feats".to_string()))
            .with(feats(FeatCategory::General)),
    ];

    page(
        PageKind::Talents,
        "Feats",
        ctx.name_and_level(),
        vec![ctx.key_ability_chip()],
        grid(2, cards).into_iter().collect(),
    )
}

fn equipment_page(ctx: &SheetContext<'_>) -> Option<Page> {
    if !ctx.enabled(Section::TalentsEquipment) {
        return None;
    }

    let mut blocks = Vec::new();
    if ctx.enabled(Section::Equipment) {
        blocks.extend(grid(2, vec![arms_card(ctx), gear_card(ctx)]));
        blocks.extend(grid(2, container_cards(ctx)));
    }
    if ctx.enabled(Section::InventoryNotes) {
        blocks.push(Block::Card(
            Card::new("Inventory Notes").with(Part::NotesBox),
        ));
    }

    page(
        PageKind::Equipment,
        "Equipment",
        ctx.name_and_level(),
        vec![ctx.key_ability_chip()],
        blocks,
    )
}

fn arms_card(ctx: &SheetContext<'_>) -> Card {
    let items = ctx.items;
    let mut protection = enumerate(items.all(&ItemKind::Armor), ARMOR_LIMIT);
    protection.extend(enumerate(items.all(&ItemKind::Shield), SHIELD_LIMIT));

    Card::new("Weapons")
        .with(Part::List(enumerate(
            items.all(&ItemKind::Weapon),
            WEAPON_LIMIT,
        )))
        .with(Part::Subheading("Protection".to_string()))
        .with(Part::List(protection))
}

fn gear_card(ctx: &SheetContext<'_>) -> Card {
    let items = ctx.items;
    Card::new("Items")
        .with(Part::List(enumerate(
            items.loose(&ItemKind::Equipment),
            EQUIPMENT_LIMIT,
        )))
        .with(Part::Subheading("Consumables".to_string()))
        .with(Part::List(enumerate(
            items.loose(&ItemKind::Consumable),
            CONSUMABLE_LIMIT,
        )))
        .with(Part::Subheading("Treasure".to_string()))
        .with(Part::List(enumerate(
            items.loose(&ItemKind::Treasure),
            TREASURE_LIMIT,
        )))
}

fn container_cards(ctx: &SheetContext<'_>) -> Vec<Card> {
    ctx.items
        .containers()
        .iter()
        .map(|group| {
            let heading = if group.container.name.is_empty() {
                "Backpack".to_string()
            } else {
                group.container.name.clone()
            };
            Card::new(heading).with(Part::List(enumerate(&group.members, CONTAINER_LIMIT)))
        })
        .collect()
}

// ----- information

fn information_page(ctx: &SheetContext<'_>) -> Option<Page> {
    if !ctx.enabled(Section::Info) {
        return None;
    }

    let mut blocks = Vec::new();
    if ctx.enabled(Section::InfoDetails) {
        blocks.push(Block::Card(details_card(ctx)));
    }

    let mut pair = Vec::new();
    if ctx.enabled(Section::InfoPhysical) {
        pair.push(physical_card(ctx.profile));
    }
    if ctx.enabled(Section::InfoOrigin) {
        pair.push(origin_card(ctx.items));
    }
    blocks.extend(grid(2, pair));

    let mut pair = Vec::new();
    if ctx.enabled(Section::InfoData) {
        pair.push(character_data_card(ctx.profile));
    }
    if ctx.enabled(Section::InfoResist) {
        pair.push(resistances_card(ctx.profile));
    }
    blocks.extend(grid(2, pair));

    let actions = ctx.items.all(&ItemKind::Action);
    if ctx.enabled(Section::InfoActions) && !actions.is_empty() {
        blocks.push(Block::Card(
            Card::new("Actions & Activities").with(Part::List(enumerate(actions, ACTION_LIMIT))),
        ));
    }

    page(
        PageKind::Information,
        "Character Information",
        ctx.profile.name.clone(),
        vec![format!("Level {}", ctx.profile.level)],
        blocks,
    )
}

fn field_table(rows: Vec<(&str, String)>) -> Table {
    rows.into_iter()
        .fold(Table::new(["Field", "Value"]), |table, (field, value)| {
            table.row([field.to_string(), value])
        })
}

fn details_card(ctx: &SheetContext<'_>) -> Card {
    let profile = ctx.profile;
    Card::new("Details").with(Part::Table(field_table(vec![
        ("Name", profile.name.clone()),
        ("Level", profile.level.to_string()),
        (
            "Hit Points",
            format!("{} (+{} temp)", profile.hp, profile.temp_hp),
        ),
        (
            "Hero Points",
            format!("{}/{}", profile.hero_points, profile.max_hero_points),
        ),
        ("Experience", format!("{}/{XP_PER_LEVEL}", profile.xp)),
        ("Key Ability", ctx.key_ability.clone()),
    ])))
}

fn physical_card(profile: &CharacterProfile) -> Card {
    let physical = &profile.physical;
    Card::new("Physical Description").with(Part::Table(field_table(vec![
        ("Age", physical.age.clone()),
        ("Height", physical.height.clone()),
        ("Weight", physical.weight.clone()),
        ("Gender", physical.gender.clone()),
        ("Ethnicity", physical.ethnicity.clone()),
        ("Nationality", physical.nationality.clone()),
    ])))
}

fn origin_card(items: &CategorizedItems) -> Card {
    [
        ("Ancestry", ItemKind::Ancestry),
        ("Heritage", ItemKind::Heritage),
        ("Class", ItemKind::Class),
        ("Background", ItemKind::Background),
    ]
    .into_iter()
    .fold(Card::new("Origin"), |card, (label, kind)| {
        card.with(Part::Note(label.to_string()))
            .with(Part::List(enumerate(items.all(&kind), ORIGIN_LIMIT)))
    })
}

fn character_data_card(profile: &CharacterProfile) -> Card {
    let resources = profile
        .resources
        .iter()
        .fold(Table::new(["Resource", "Value"]), |table, resource| {
            table.row([resource.label.clone(), resource.value.clone()])
        });

    Card::new("Character Data")
        .with(Part::Table(field_table(vec![
            ("Size", profile.size.clone()),
            ("Alignment", profile.alignment.clone()),
            ("Deity", profile.deity.clone()),
            ("Languages", profile.languages.clone()),
            ("Traits", profile.traits.clone()),
            ("Speed", profile.speed.clone()),
            ("Initiative", profile.initiative.clone()),
            ("Senses", profile.senses.clone()),
            ("Exploration", profile.exploration.clone()),
        ])))
        .with(Part::Table(resources))
}

fn resistances_card(profile: &CharacterProfile) -> Card {
    let table = Table::new(["Type", "Details"])
        .row(["Resistances".to_string(), profile.resistances.clone()])
        .row(["Immunities".to_string(), profile.immunities.clone()])
        .row(["Weaknesses".to_string(), profile.weaknesses.clone()]);
    Card::new("Resistances & Immunities").with(Part::Table(table))
}

// ----- spells

fn spells_page(ctx: &SheetContext<'_>) -> Option<Page> {
    if !ctx.enabled(Section::Spells) {
        return None;
    }

    let mut blocks = Vec::new();
    if ctx.enabled(Section::SpellsList) {
        let groups = ctx.items.spellcasting();
        if groups.is_empty() {
            blocks.push(Block::Note(NO_SPELLCASTING_NOTE.to_string()));
        } else {
            let cards = groups
                .iter()
                .map(|group| {
                    Card::new(spellcasting_header(&group.entry))
                        .with(Part::List(enumerate(&group.spells, usize::MAX)))
                })
                .collect();
            blocks.extend(grid(2, cards));
        }
    }
    if ctx.enabled(Section::SpellsResources) {
        let mut card = Card::new("Focus & Resources");
        if !ctx.profile.resources.is_empty() {
            let table = ctx
                .profile
                .resources
                .iter()
                .fold(Table::new(["Resource", "Value"]), |table, resource| {
                    table.row([resource.label.clone(), resource.value.clone()])
                });
            card = card.with(Part::Table(table));
        }
        blocks.push(Block::Card(card.with(Part::Note(RESOURCES_NOTE.to_string()))));
    }
    if ctx.enabled(Section::SpellsNotes) {
        blocks.push(Block::Card(Card::new("Spell Notes").with(Part::NotesBox)));
    }

    page(
        PageKind::Spells,
        "Spells",
        ctx.name_and_level(),
        vec![ctx.key_ability_chip()],
        blocks,
    )
}

/// `Name (tradition) — prepared`, omitting whichever parts are blank.
fn spellcasting_header(entry: &ItemEntry) -> String {
    let mut header = if entry.name.is_empty() {
        "Spellcasting".to_string()
    } else {
        entry.name.clone()
    };
    if let ItemDetail::SpellcastingEntry {
        tradition,
        prepared,
    } = &entry.detail
    {
        if !tradition.is_empty() {
            header.push_str(&format!(" ({tradition})"));
        }
        if !prepared.is_empty() {
            header.push_str(&format!(" — {prepared}"));
        }
    }
    header
}

// ----- item lines

/// One display line per entry, skipping blank and repeated names, capped at
/// `limit` lines. Quantities above one get an `(xN)` suffix.
fn enumerate<'a>(entries: impl IntoIterator<Item = &'a ItemEntry>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| !entry.name.is_empty() && seen.insert(entry.name.clone()))
        .take(limit)
        .map(|entry| {
            let line = describe(entry);
            if entry.quantity > 1 {
                format!("{line} (x{})", entry.quantity)
            } else {
                line
            }
        })
        .collect()
}

fn describe(entry: &ItemEntry) -> String {
    let name = entry.name.clone();
    let parts: Vec<String> = match &entry.detail {
        ItemDetail::Weapon(weapon) => {
            let mut parts = vec![name];
            parts.extend(weapon.damage.clone());
            parts.extend(weapon.range.as_ref().map(|range| format!("range {range}")));
            if weapon.bonus != 0 {
                parts.push(format!("bonus {}", signed(weapon.bonus)));
            }
            if !weapon.runes.is_empty() {
                parts.push(format!("runes: {}", weapon.runes.join(", ")));
            }
            if !weapon.traits.is_empty() {
                parts.push(format!("traits: {}", weapon.traits.join(", ")));
            }
            parts
        }
        ItemDetail::Armor(armor) => {
            let mut parts = vec![name, format!("{} AC", signed(armor.ac_bonus))];
            parts.extend(armor.dex_cap.map(|cap| format!("Dex cap {cap}")));
            if armor.check_penalty != 0 {
                parts.push(format!("check penalty {}", armor.check_penalty));
            }
            parts
        }
        ItemDetail::Shield { ac_bonus } => vec![name, format!("{} AC", signed(*ac_bonus))],
        ItemDetail::Treasure { price } if !price.is_empty() => {
            let price = price
                .iter()
                .map(|(denomination, amount)| format!("{amount}{denomination}"))
                .collect::<Vec<_>>()
                .join(" ");
            vec![name, price]
        }
        ItemDetail::Action {
            action_type,
            actions,
        } => {
            if action_type.is_empty() {
                vec![name]
            } else if action_type == "action" && actions == "1" {
                vec![name, "1 action".to_string()]
            } else if action_type == "action" && !actions.is_empty() {
                vec![name, format!("{actions} actions")]
            } else {
                vec![name, action_type.clone()]
            }
        }
        ItemDetail::Spell(spell) => {
            let mut parts = vec![name];
            parts.extend(spell.level.map(|level| format!("level {level}")));
            if !spell.time.is_empty() {
                parts.push(format!("actions {}", spell.time));
            }
            if !spell.range.is_empty() {
                parts.push(format!("range {}", spell.range));
            }
            if !spell.traits.is_empty() {
                parts.push(format!("traits: {}", spell.traits.join(", ")));
            }
            parts
        }
        ItemDetail::Feat { level, .. } => vec![format!("{name} (Level {level})")],
        _ => vec![name],
    };
    parts.join(" — ")
}

#[cfg(test)]
mod tests {
    use sheet_core::classify::{ArmorDetail, ItemDetail, ItemEntry, WeaponDetail};
    use sheet_core::record::ItemKind;

    use super::{describe, enumerate};

    fn entry(name: &str, quantity: i64, detail: ItemDetail) -> ItemEntry {
        ItemEntry {
            id: name.to_lowercase(),
            name: name.to_string(),
            kind: ItemKind::Equipment,
            quantity,
            container_id: None,
            detail,
        }
    }

    #[test]
    fn enumerate_skips_blank_and_repeated_names_then_caps() {
        let entries = vec![
            entry("", 1, ItemDetail::Plain),
            entry("Rope", 1, ItemDetail::Plain),
            entry("Rope", 3, ItemDetail::Plain),
            entry("Torch", 5, ItemDetail::Plain),
            entry("Chalk", 1, ItemDetail::Plain),
        ];
        assert_eq!(enumerate(&entries, 2), vec!["Rope", "Torch (x5)"]);
    }

    #[test]
    fn weapon_line_lists_present_parts_only() {
        let weapon = entry(
            "Longsword",
            1,
            ItemDetail::Weapon(WeaponDetail {
                damage: Some("1d8 slashing".to_string()),
                range: None,
                bonus: 0,
                runes: vec!["+1".to_string(), "striking".to_string()],
                traits: vec!["versatile-p".to_string()],
            }),
        );
        assert_eq!(
            describe(&weapon),
            "Longsword — 1d8 slashing — runes: +1, striking — traits: versatile-p"
        );
    }

    #[test]
    fn armor_line_shows_cap_and_penalty() {
        let armor = entry(
            "Full Plate",
            1,
            ItemDetail::Armor(ArmorDetail {
                ac_bonus: 6,
                dex_cap: Some(0),
                check_penalty: -3,
            }),
        );
        assert_eq!(
            describe(&armor),
            "Full Plate — +6 AC — Dex cap 0 — check penalty -3"
        );
    }

    #[test]
    fn action_line_names_cost_or_kind() {
        let action = |kind: &str, count: &str| {
            describe(&entry(
                "Strike",
                1,
                ItemDetail::Action {
                    action_type: kind.to_string(),
                    actions: count.to_string(),
                },
            ))
        };
        assert_eq!(action("action", "1"), "Strike — 1 action");
        assert_eq!(action("action", "2"), "Strike — 2 actions");
        assert_eq!(action("action", ""), "Strike — action");
        assert_eq!(action("reaction", ""), "Strike — reaction");
        assert_eq!(action("", ""), "Strike");
    }
}

//! The rendered sheet as a plain tree: pages hold blocks, blocks hold cards,
//! cards hold parts. Serializers walk this tree and never consult the record.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Summary,
    Talents,
    Equipment,
    Information,
    Spells,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page(&self, kind: PageKind) -> Option<&Page> {
        self.pages.iter().find(|page| page.kind == kind)
    }

    pub fn page_kinds(&self) -> Vec<PageKind> {
        self.pages.iter().map(|page| page.kind).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub kind: PageKind,
    pub title: String,
    pub subtitle: String,
    pub chips: Vec<String>,
    pub blocks: Vec<Block>,
}

impl Page {
    /// Every card on the page, grid members included, in display order.
    pub fn cards(&self) -> Vec<&Card> {
        self.blocks
            .iter()
            .flat_map(|block| match block {
                Block::Grid { cards, .. } => cards.iter().collect::<Vec<_>>(),
                Block::Card(card) => vec![card],
                Block::Note(_) => Vec::new(),
            })
            .collect()
    }

    pub fn card(&self, heading: &str) -> Option<&Card> {
        self.cards().into_iter().find(|card| card.heading == heading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Block {
    Grid { columns: usize, cards: Vec<Card> },
    Card(Card),
    Note(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub heading: String,
    pub parts: Vec<Part>,
}

impl Card {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            parts: Vec::new(),
        }
    }

    pub fn with(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// List entries of every `List` part, flattened.
    pub fn list_entries(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::List(entries) => Some(entries),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn tables(&self) -> Vec<&Table> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Part {
    Stat(String),
    Note(String),
    Subheading(String),
    Table(Table),
    List(Vec<String>),
    NotesBox,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<const N: usize>(headers: [&str; N]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<const N: usize>(mut self, cells: [String; N]) -> Self {
        self.rows.push(cells.into());
        self
    }

    /// The value column of a two-column field table.
    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.first().map(String::as_str) == Some(field))
            .and_then(|row| row.get(1))
            .map(String::as_str)
    }
}

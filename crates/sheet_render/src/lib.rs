pub mod document;
pub mod html;
pub mod json;
pub mod labels;
pub mod pages;

pub use document::{Block, Card, Document, Page, PageKind, Part, Table};
pub use html::render_html;
pub use json::{JsonStyle, render_json_full};
pub use pages::{RenderOptions, render, render_session};

//! Structured visual document produced by the template renderer.
//!
//! A `RenderedDocument` is layout-neutral: it fixes section order, column split,
//! palette and the text of every block, but not pixel positions. Positions are
//! computed later by `layout::capture_region`.

use serde::{Deserialize, Serialize};

use crate::templates::TemplateSelection;

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Rgb,
    pub heading: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub accent: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderRule {
    None,
    Thin,
    Thick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// The document owner's name.
    Title { text: String },
    Subtitle { text: String },
    /// Entry headline (school, role, project name).
    Strong { text: String },
    Text { text: String },
    /// Secondary details: dates, locations, issuers.
    Muted { text: String },
    Bullets { items: Vec<String> },
    Tags { label: Option<String>, items: Vec<String> },
    Link { label: String, href: String },
    /// Short values shown on one line, separated by the renderer's separator.
    Inline { items: Vec<String> },
}

/// One list item's container. May be empty: an all-empty entry still gets a container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSection {
    pub heading: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Width share out of 12.
    pub span: u8,
    pub sections: Vec<DocSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub align: Align,
    pub rule: HeaderRule,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub selection: TemplateSelection,
    pub palette: Palette,
    pub header: Header,
    pub columns: Vec<Column>,
}

/// Lookup helpers for template tests.
#[cfg(test)]
impl RenderedDocument {
    pub fn section_headings(&self) -> Vec<&str> {
        self.columns
            .iter()
            .flat_map(|c| c.sections.iter())
            .map(|s| s.heading.as_str())
            .collect()
    }

    pub fn find_section(&self, heading: &str) -> Option<&DocSection> {
        self.columns
            .iter()
            .flat_map(|c| c.sections.iter())
            .find(|s| s.heading == heading)
    }

    /// Every text fragment carried by the document, in document order.
    /// Link targets are included alongside their labels.
    pub fn text_fragments(&self) -> Vec<String> {
        fn push_block(block: &Block, out: &mut Vec<String>) {
            match block {
                Block::Title { text }
                | Block::Subtitle { text }
                | Block::Strong { text }
                | Block::Text { text }
                | Block::Muted { text } => out.push(text.clone()),
                Block::Bullets { items } | Block::Inline { items } => {
                    out.extend(items.iter().cloned())
                }
                Block::Tags { label, items } => {
                    out.extend(label.iter().cloned());
                    out.extend(items.iter().cloned());
                }
                Block::Link { label, href } => {
                    out.push(label.clone());
                    out.push(href.clone());
                }
            }
        }

        let mut out = Vec::new();
        for block in &self.header.blocks {
            push_block(block, &mut out);
        }
        for section in self.columns.iter().flat_map(|c| c.sections.iter()) {
            out.push(section.heading.clone());
            for block in section.entries.iter().flat_map(|e| e.blocks.iter()) {
                push_block(block, &mut out);
            }
        }
        out
    }
}

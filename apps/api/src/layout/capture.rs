//! Preview capture: lays a `RenderedDocument` out on a fixed-width canvas and
//! records every painted item at its final position.
//!
//! The region is what export consumes. Coordinates are CSS pixels, origin at
//! the top-left, `y` growing downwards. Text positions are baselines.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::layout::wrap::wrap_text;
use crate::templates::document::{
    Align, Block, Column, DocSection, HeaderRule, Palette, RenderedDocument, Rgb,
};

pub const CANVAS_WIDTH_PX: f32 = 800.0;
pub const PADDING_PX: f32 = 32.0;
pub const COLUMN_GAP_PX: f32 = 32.0;
const LINE_HEIGHT: f32 = 1.4;
const BULLET_INDENT_PX: f32 = 16.0;
const ENTRY_GAP_PX: f32 = 12.0;
const SECTION_GAP_PX: f32 = 24.0;
const HEADING_SIZE_PX: f32 = 18.0;

/// Joins inline values and tag lists on the canvas.
pub const SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaintItem {
    Text {
        x: f32,
        baseline: f32,
        size_px: f32,
        face: FontFace,
        color: Rgb,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
}

/// A captured visual region, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedRegion {
    pub width_px: f32,
    pub height_px: f32,
    pub background: Rgb,
    pub items: Vec<PaintItem>,
}

#[cfg(test)]
impl RenderedRegion {
    /// Text of every painted line, in paint order.
    pub fn text_lines(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                PaintItem::Text { text, .. } => Some(text.as_str()),
                PaintItem::Rule { .. } => None,
            })
            .collect()
    }
}

struct Style {
    size_px: f32,
    face: FontFace,
    color: Rgb,
}

struct Canvas<'a> {
    palette: &'a Palette,
    items: Vec<PaintItem>,
}

impl Canvas<'_> {
    /// Wraps and paints `text` within `[left, left + width]` starting at `top`.
    /// Returns the y just below the last line.
    fn paragraph(
        &mut self,
        text: &str,
        style: &Style,
        left: f32,
        width: f32,
        top: f32,
        align: Align,
    ) -> f32 {
        let metrics = get_metrics(style.face);
        let line_height = style.size_px * LINE_HEIGHT;
        let mut y = top;
        for line in wrap_text(text, metrics, style.size_px, width) {
            let x = match align {
                Align::Left => left,
                Align::Center => {
                    left + ((width - metrics.measure_px(&line, style.size_px)) / 2.0).max(0.0)
                }
            };
            let baseline = y + (line_height - style.size_px) / 2.0 + style.size_px * 0.8;
            self.items.push(PaintItem::Text {
                x,
                baseline,
                size_px: style.size_px,
                face: style.face,
                color: style.color,
                text: line,
            });
            y += line_height;
        }
        y
    }

    fn style(&self, block: &Block) -> Style {
        let p = self.palette;
        let (size_px, face, color) = match block {
            Block::Title { .. } => (30.0, FontFace::Bold, p.heading),
            Block::Subtitle { .. } => (18.0, FontFace::Regular, p.text),
            Block::Strong { .. } => (16.0, FontFace::Bold, p.heading),
            Block::Text { .. } | Block::Bullets { .. } => (14.0, FontFace::Regular, p.text),
            Block::Muted { .. } => (13.0, FontFace::Regular, p.muted),
            Block::Tags { .. } | Block::Inline { .. } => (14.0, FontFace::Regular, p.text),
            Block::Link { .. } => (14.0, FontFace::Regular, p.accent),
        };
        Style {
            size_px,
            face,
            color,
        }
    }

    fn block(&mut self, block: &Block, left: f32, width: f32, top: f32, align: Align) -> f32 {
        let style = self.style(block);
        match block {
            Block::Title { text }
            | Block::Subtitle { text }
            | Block::Strong { text }
            | Block::Text { text }
            | Block::Muted { text } => self.paragraph(text, &style, left, width, top, align),
            Block::Bullets { items } => {
                let mut y = top;
                let line_height = style.size_px * LINE_HEIGHT;
                for item in items {
                    if item.trim().is_empty() {
                        continue;
                    }
                    let baseline = y + (line_height - style.size_px) / 2.0 + style.size_px * 0.8;
                    self.items.push(PaintItem::Text {
                        x: left,
                        baseline,
                        size_px: style.size_px,
                        face: style.face,
                        color: style.color,
                        text: "-".to_string(),
                    });
                    y = self.paragraph(
                        item,
                        &style,
                        left + BULLET_INDENT_PX,
                        width - BULLET_INDENT_PX,
                        y,
                        Align::Left,
                    );
                }
                y
            }
            Block::Tags { label, items } => {
                let joined = items.join(SEPARATOR);
                let line = match label {
                    Some(label) => format!("{label}: {joined}"),
                    None => joined,
                };
                self.paragraph(&line, &style, left, width, top, align)
            }
            Block::Link { label, href } => {
                self.paragraph(&format!("{label}: {href}"), &style, left, width, top, align)
            }
            Block::Inline { items } => {
                self.paragraph(&items.join(SEPARATOR), &style, left, width, top, align)
            }
        }
    }

    fn section(&mut self, section: &DocSection, left: f32, width: f32, top: f32) -> f32 {
        let heading = Style {
            size_px: HEADING_SIZE_PX,
            face: FontFace::Bold,
            color: self.palette.heading,
        };
        let mut y = self.paragraph(&section.heading, &heading, left, width, top, Align::Left);
        y += 4.0;
        for (i, entry) in section.entries.iter().enumerate() {
            if i > 0 {
                y += ENTRY_GAP_PX;
            }
            for block in &entry.blocks {
                y = self.block(block, left, width, y, Align::Left);
            }
        }
        y
    }

    fn column(&mut self, column: &Column, left: f32, width: f32, top: f32) -> f32 {
        let mut y = top;
        for (i, section) in column.sections.iter().enumerate() {
            if i > 0 {
                y += SECTION_GAP_PX;
            }
            y = self.section(section, left, width, y);
        }
        y
    }
}

/// Left edge and width of each column, split by span after the gaps.
fn column_slots(doc: &RenderedDocument) -> Vec<(f32, f32)> {
    let content_width = CANVAS_WIDTH_PX - 2.0 * PADDING_PX;
    let total_span: f32 = doc.columns.iter().map(|c| c.span as f32).sum::<f32>().max(1.0);
    let gaps = COLUMN_GAP_PX * doc.columns.len().saturating_sub(1) as f32;
    let mut left = PADDING_PX;
    doc.columns
        .iter()
        .map(|column| {
            let width = (content_width - gaps) * column.span as f32 / total_span;
            let slot = (left, width);
            left += width + COLUMN_GAP_PX;
            slot
        })
        .collect()
}

/// Lays the document out on an 800px canvas. Pure: the same document always
/// yields the same region.
pub fn capture_region(doc: &RenderedDocument) -> RenderedRegion {
    let mut canvas = Canvas {
        palette: &doc.palette,
        items: Vec::new(),
    };
    let content_left = PADDING_PX;
    let content_width = CANVAS_WIDTH_PX - 2.0 * PADDING_PX;

    let mut y = PADDING_PX;
    for block in &doc.header.blocks {
        y = canvas.block(block, content_left, content_width, y, doc.header.align);
    }

    let rule = match doc.header.rule {
        HeaderRule::None => None,
        HeaderRule::Thin => Some((1.0, doc.palette.muted)),
        HeaderRule::Thick => Some((3.0, doc.palette.heading)),
    };
    y += 8.0;
    if let Some((thickness, color)) = rule {
        canvas.items.push(PaintItem::Rule {
            x1: content_left,
            x2: content_left + content_width,
            y,
            thickness,
            color,
        });
        y += thickness;
    }
    y += 16.0;

    let columns_top = y;
    let mut bottom = y;
    for (column, (left, width)) in doc.columns.iter().zip(column_slots(doc)) {
        bottom = bottom.max(canvas.column(column, left, width, columns_top));
    }

    RenderedRegion {
        width_px: CANVAS_WIDTH_PX,
        height_px: (bottom + PADDING_PX).ceil(),
        background: doc.palette.background,
        items: canvas.items,
    }
}

// Template Renderer
// Pure mapping (ResumeProfile, TemplateSelection) -> RenderedDocument.
// The three layouts share one data contract; each decides its own section
// arrangement and applies the empty-section omission rule itself.

pub mod creative;
pub mod document;
pub mod html;
pub mod minimalist;
pub mod professional;

use serde::{Deserialize, Serialize};

use crate::models::profile::{PersonalInfo, ResumeProfile};

pub use document::{Block, RenderedDocument};

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Minimalist,
    Creative,
    Professional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    Resume,
    Cv,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::Cv => "cv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateSelection {
    pub kind: TemplateKind,
    pub document_type: DocumentType,
}

impl TemplateSelection {
    pub fn new(kind: TemplateKind, document_type: DocumentType) -> Self {
        Self {
            kind,
            document_type,
        }
    }

    /// Parses a catalog id such as `professional` or `cv-creative`.
    pub fn from_id(id: &str) -> Option<Self> {
        let (document_type, name) = match id.strip_prefix("cv-") {
            Some(rest) => (DocumentType::Cv, rest),
            None => (DocumentType::Resume, id),
        };
        let kind = match name {
            "minimalist" => TemplateKind::Minimalist,
            "creative" => TemplateKind::Creative,
            "professional" => TemplateKind::Professional,
            _ => return None,
        };
        Some(Self::new(kind, document_type))
    }

    pub fn id(&self) -> String {
        let name = match self.kind {
            TemplateKind::Minimalist => "minimalist",
            TemplateKind::Creative => "creative",
            TemplateKind::Professional => "professional",
        };
        match self.document_type {
            DocumentType::Resume => name.to_string(),
            DocumentType::Cv => format!("cv-{name}"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: &'static str,
    pub selection: TemplateSelection,
}

const KINDS: [(TemplateKind, &str, &str); 3] = [
    (
        TemplateKind::Minimalist,
        "Minimalist",
        "Clean and minimal design with a focus on readability",
    ),
    (
        TemplateKind::Creative,
        "Creative",
        "Modern and eye-catching design for creative professionals",
    ),
    (
        TemplateKind::Professional,
        "Professional",
        "Traditional and formal design for corporate settings",
    ),
];

/// All selectable templates, optionally restricted to one document type.
pub fn catalog(document_type: Option<DocumentType>) -> Vec<TemplateInfo> {
    [DocumentType::Resume, DocumentType::Cv]
        .into_iter()
        .filter(|t| document_type.map_or(true, |wanted| wanted == *t))
        .flat_map(|doc_type| {
            KINDS.iter().map(move |(kind, name, description)| {
                let selection = TemplateSelection::new(*kind, doc_type);
                TemplateInfo {
                    id: selection.id(),
                    name: match doc_type {
                        DocumentType::Resume => name.to_string(),
                        DocumentType::Cv => format!("{name} CV"),
                    },
                    description,
                    selection,
                }
            })
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders the profile with the selected template. Deterministic: no clock, no randomness.
pub fn render(profile: &ResumeProfile, selection: TemplateSelection) -> RenderedDocument {
    match selection.kind {
        TemplateKind::Minimalist => minimalist::render(profile, selection),
        TemplateKind::Creative => creative::render(profile, selection),
        TemplateKind::Professional => professional::render(profile, selection),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared fragment helpers
// ────────────────────────────────────────────────────────────────────────────

/// `Some(value)` when the value has visible content.
pub(crate) fn present(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) fn present_opt(value: &Option<String>) -> Option<&str> {
    value.as_deref().and_then(present)
}

/// Joins the non-empty parts; `None` when every part is empty.
pub(crate) fn joined(parts: &[&str], separator: &str) -> Option<String> {
    let kept: Vec<&str> = parts.iter().copied().filter_map(present).collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(separator))
    }
}

pub(crate) fn date_range(start: &str, end: &str) -> Option<String> {
    joined(&[start, end], " - ")
}

/// Description lines that carry content, in input order.
pub(crate) fn bullet_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter(|l| present(l).is_some())
        .cloned()
        .collect()
}

pub(crate) fn non_empty_items(items: &[String]) -> Vec<String> {
    bullet_lines(items)
}

pub(crate) fn push_opt(blocks: &mut Vec<Block>, value: Option<String>, make: fn(String) -> Block) {
    if let Some(text) = value {
        blocks.push(make(text));
    }
}

pub(crate) fn strong(text: String) -> Block {
    Block::Strong { text }
}

pub(crate) fn text(text: String) -> Block {
    Block::Text { text }
}

pub(crate) fn muted(text: String) -> Block {
    Block::Muted { text }
}

/// Contact values with content, in display order.
pub(crate) fn contact_items(info: &PersonalInfo, with_link: bool) -> Vec<String> {
    let mut fields = vec![info.email.as_str(), info.phone.as_str(), info.location.as_str()];
    if with_link {
        fields.push(info.linkedin.as_str());
    }
    fields
        .into_iter()
        .filter_map(present)
        .map(str::to_string)
        .collect()
}

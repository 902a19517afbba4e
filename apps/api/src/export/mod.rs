// Export Pipeline
// Turns a captured preview region into a downloadable single-page PDF.
// A missing region is not an error: the outcome is `Skipped` and no file is produced.

pub mod pdf;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::layout::RenderedRegion;
use crate::templates::DocumentType;

/// 1 CSS pixel = 0.75 PDF points.
pub const PX_TO_PT: f32 = 0.75;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("font unavailable: {0}")]
    Font(String),

    #[error("PDF encoding failed: {0}")]
    Encode(String),
}

/// What the exported file is named after.
#[derive(Debug, Clone)]
pub struct FileNameHint {
    pub full_name: String,
    pub document_type: DocumentType,
}

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Bytes,
    pub width_pt: f32,
    pub height_pt: f32,
}

#[derive(Debug, Clone)]
pub enum ExportOutcome {
    Exported(ExportedDocument),
    /// No region had been captured yet. Nothing was produced.
    Skipped,
}

/// `<full name, whitespace runs replaced by "_">_<resume|cv>.pdf`
pub fn file_name(hint: &FileNameHint) -> String {
    let mut stem = String::with_capacity(hint.full_name.len());
    let mut in_space = false;
    for c in hint.full_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    format!("{stem}_{}.pdf", hint.document_type.as_str())
}

/// Embeds the region into a page of exactly its size.
///
/// Never touches the profile; the region is the only input besides the name hint.
pub fn export_to_document(
    region: Option<&RenderedRegion>,
    hint: &FileNameHint,
) -> Result<ExportOutcome, ExportError> {
    let Some(region) = region else {
        warn!("Export skipped: no captured preview region");
        return Ok(ExportOutcome::Skipped);
    };

    let file_name = file_name(hint);
    let bytes = pdf::write_pdf(region, &file_name)?;
    let file = ExportedDocument {
        file_name,
        bytes: Bytes::from(bytes),
        width_pt: region.width_px * PX_TO_PT,
        height_pt: region.height_px * PX_TO_PT,
    };
    info!(
        file_name = %file.file_name,
        size = file.bytes.len(),
        width_pt = file.width_pt,
        height_pt = file.height_pt,
        "Document exported"
    );

    Ok(ExportOutcome::Exported(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::capture_region;
    use crate::templates::test_support::sample_profile;
    use crate::templates::{render, TemplateKind, TemplateSelection};

    fn hint(name: &str, document_type: DocumentType) -> FileNameHint {
        FileNameHint {
            full_name: name.to_string(),
            document_type,
        }
    }

    #[test]
    fn test_file_name_replaces_whitespace_runs() {
        assert_eq!(
            file_name(&hint("Alex Johnson", DocumentType::Resume)),
            "Alex_Johnson_resume.pdf"
        );
        assert_eq!(
            file_name(&hint("Mary  Ann\tLee", DocumentType::Cv)),
            "Mary_Ann_Lee_cv.pdf"
        );
        assert_eq!(
            file_name(&hint(" Jo ", DocumentType::Resume)),
            "_Jo__resume.pdf"
        );
    }

    #[test]
    fn test_export_without_region_is_skipped() {
        let outcome = export_to_document(None, &hint("Alex Johnson", DocumentType::Resume));
        assert!(matches!(outcome, Ok(ExportOutcome::Skipped)));
    }

    #[test]
    fn test_export_produces_pdf_sized_to_region() {
        let doc = render(
            &sample_profile(),
            TemplateSelection::new(TemplateKind::Professional, DocumentType::Cv),
        );
        let region = capture_region(&doc);
        let outcome =
            export_to_document(Some(&region), &hint("Alex Johnson", DocumentType::Cv)).unwrap();
        let ExportOutcome::Exported(file) = outcome else {
            panic!("expected an exported document");
        };
        assert_eq!(file.file_name, "Alex_Johnson_cv.pdf");
        assert!(file.bytes.starts_with(b"%PDF-"));
        assert!((file.width_pt - 600.0).abs() < 1e-3);
        assert!((file.height_pt - region.height_px * 0.75).abs() < 1e-3);
    }
}

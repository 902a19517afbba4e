//! Builder session: one screen's state machine around a `FormStore`.
//!
//! ```text
//! TemplatePicking --select_template--> FormEditing --request_preview--> PreviewReview
//!        ^                                 |   ^                            |
//!        +-------back_to_templates---------+   +-----------edit-------------+
//! ```
//!
//! Export is only valid in PreviewReview and leaves the step unchanged.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::builder::store::FormStore;
use crate::builder::validation::missing_required_fields;
use crate::export::FileNameHint;
use crate::layout::{capture_region, RenderedRegion};
use crate::models::profile::{PersonalField, ResumeProfile};
use crate::templates::{self, RenderedDocument, TemplateSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderStep {
    TemplatePicking,
    FormEditing,
    PreviewReview,
}

impl BuilderStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuilderStep::TemplatePicking => "template_picking",
            BuilderStep::FormEditing => "form_editing",
            BuilderStep::PreviewReview => "preview_review",
        }
    }
}

impl std::fmt::Display for BuilderStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} during {from}")]
    Illegal {
        action: &'static str,
        from: BuilderStep,
    },

    #[error("an export is already in progress")]
    ExportInProgress,
}

/// Everything an export needs, detached from the session so the PDF can be
/// encoded off the lock.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub region: Option<RenderedRegion>,
    pub hint: FileNameHint,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub step: BuilderStep,
    pub template_id: Option<String>,
    pub selection: Option<TemplateSelection>,
    pub profile: ResumeProfile,
    pub missing_fields: Vec<PersonalField>,
    pub preview_ready: bool,
    pub exporting: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BuilderSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    step: BuilderStep,
    selection: Option<TemplateSelection>,
    store: FormStore,
    /// Captured preview region; present once the preview has been displayed.
    region: Option<RenderedRegion>,
    exporting: bool,
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            step: BuilderStep::TemplatePicking,
            selection: None,
            store: FormStore::new(),
            region: None,
            exporting: false,
        }
    }

    pub fn step(&self) -> BuilderStep {
        self.step
    }

    pub fn selection(&self) -> Option<TemplateSelection> {
        self.selection
    }

    pub fn profile(&self) -> &ResumeProfile {
        self.store.profile()
    }

    pub fn preview_ready(&self) -> bool {
        self.region.is_some()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    fn require(&self, step: BuilderStep, action: &'static str) -> Result<(), TransitionError> {
        if self.step == step {
            Ok(())
        } else {
            Err(TransitionError::Illegal {
                action,
                from: self.step,
            })
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn select_template(&mut self, selection: TemplateSelection) -> Result<(), TransitionError> {
        self.require(BuilderStep::TemplatePicking, "select a template")?;
        self.selection = Some(selection);
        self.step = BuilderStep::FormEditing;
        self.touch();
        Ok(())
    }

    /// Returns to the template picker. The profile is kept.
    pub fn back_to_templates(&mut self) -> Result<(), TransitionError> {
        self.require(BuilderStep::FormEditing, "go back to templates")?;
        self.selection = None;
        self.step = BuilderStep::TemplatePicking;
        self.touch();
        Ok(())
    }

    /// Mutable access to the form; only while editing.
    pub fn form(&mut self) -> Result<&mut FormStore, TransitionError> {
        self.require(BuilderStep::FormEditing, "edit the form")?;
        self.touch();
        Ok(&mut self.store)
    }

    pub fn request_preview(&mut self) -> Result<(), TransitionError> {
        self.require(BuilderStep::FormEditing, "request a preview")?;
        self.step = BuilderStep::PreviewReview;
        self.region = None;
        self.touch();
        Ok(())
    }

    pub fn edit(&mut self) -> Result<(), TransitionError> {
        self.require(BuilderStep::PreviewReview, "return to editing")?;
        if self.exporting {
            return Err(TransitionError::ExportInProgress);
        }
        self.step = BuilderStep::FormEditing;
        self.region = None;
        self.touch();
        Ok(())
    }

    /// Renders the current profile with the selected template.
    pub fn render(&self) -> Result<RenderedDocument, TransitionError> {
        match self.selection {
            Some(selection) => Ok(templates::render(self.store.profile(), selection)),
            None => Err(TransitionError::Illegal {
                action: "render",
                from: self.step,
            }),
        }
    }

    /// Renders and, when the preview is on screen, captures its region.
    pub fn display(&mut self) -> Result<RenderedDocument, TransitionError> {
        let doc = self.render()?;
        if self.step == BuilderStep::PreviewReview && self.region.is_none() {
            self.region = Some(capture_region(&doc));
        }
        Ok(doc)
    }

    pub fn begin_export(&mut self) -> Result<ExportJob, TransitionError> {
        self.require(BuilderStep::PreviewReview, "export")?;
        if self.exporting {
            return Err(TransitionError::ExportInProgress);
        }
        self.exporting = true;
        Ok(ExportJob {
            region: self.region.clone(),
            hint: FileNameHint {
                full_name: self.store.profile().personal_info.full_name.clone(),
                document_type: self
                    .selection
                    .map(|s| s.document_type)
                    .unwrap_or_default(),
            },
        })
    }

    pub fn finish_export(&mut self) {
        self.exporting = false;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            step: self.step(),
            template_id: self.selection().map(|s| s.id()),
            selection: self.selection(),
            profile: self.profile().clone(),
            missing_fields: missing_required_fields(&self.profile().personal_info),
            preview_ready: self.preview_ready(),
            exporting: self.is_exporting(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{export_to_document, ExportOutcome};
    use crate::templates::{DocumentType, TemplateKind};

    fn editing_session() -> BuilderSession {
        let mut session = BuilderSession::new();
        session
            .select_template(TemplateSelection::new(
                TemplateKind::Minimalist,
                DocumentType::Resume,
            ))
            .unwrap();
        session
    }

    #[test]
    fn test_new_session_starts_at_template_picking() {
        let session = BuilderSession::new();
        assert_eq!(session.step(), BuilderStep::TemplatePicking);
        assert!(session.selection().is_none());
        assert_eq!(session.snapshot().missing_fields.len(), 5);
    }

    #[test]
    fn test_steps_cannot_be_skipped() {
        let mut session = BuilderSession::new();
        assert!(session.request_preview().is_err());
        assert!(session.form().is_err());
        assert!(session.begin_export().is_err());
        assert!(session.edit().is_err());
        assert!(session.render().is_err());
    }

    #[test]
    fn test_full_flow_and_back() {
        let mut session = editing_session();
        assert_eq!(session.step(), BuilderStep::FormEditing);
        session.request_preview().unwrap();
        assert_eq!(session.step(), BuilderStep::PreviewReview);
        assert!(session.form().is_err());
        session.edit().unwrap();
        assert_eq!(session.step(), BuilderStep::FormEditing);
        session.back_to_templates().unwrap();
        assert_eq!(session.step(), BuilderStep::TemplatePicking);
    }

    #[test]
    fn test_back_to_templates_keeps_profile() {
        let mut session = editing_session();
        session
            .form()
            .unwrap()
            .update_personal_info(PersonalField::FullName, "Alex Johnson");
        session.back_to_templates().unwrap();
        assert!(session.selection().is_none());
        assert_eq!(session.profile().personal_info.full_name, "Alex Johnson");
    }

    #[test]
    fn test_export_before_preview_displayed_is_skipped() {
        let mut session = editing_session();
        session.request_preview().unwrap();
        let job = session.begin_export().unwrap();
        assert!(job.region.is_none());
        let outcome = export_to_document(job.region.as_ref(), &job.hint).unwrap();
        assert!(matches!(outcome, ExportOutcome::Skipped));
        session.finish_export();
        assert_eq!(session.step(), BuilderStep::PreviewReview);
    }

    #[test]
    fn test_display_captures_region_only_in_preview() {
        let mut session = editing_session();
        session.display().unwrap();
        assert!(!session.preview_ready());
        session.request_preview().unwrap();
        session.display().unwrap();
        assert!(session.preview_ready());
        let job = session.begin_export().unwrap();
        assert!(job.region.is_some());
    }

    #[test]
    fn test_concurrent_export_and_edit_refused() {
        let mut session = editing_session();
        session.request_preview().unwrap();
        session.begin_export().unwrap();
        assert_eq!(
            session.begin_export().unwrap_err(),
            TransitionError::ExportInProgress
        );
        assert_eq!(session.edit().unwrap_err(), TransitionError::ExportInProgress);
        session.finish_export();
        session.edit().unwrap();
    }

    #[test]
    fn test_edit_drops_captured_region() {
        let mut session = editing_session();
        session.request_preview().unwrap();
        session.display().unwrap();
        session.edit().unwrap();
        session.request_preview().unwrap();
        assert!(!session.preview_ready());
    }

    #[test]
    fn test_export_hint_uses_document_type() {
        let mut session = BuilderSession::new();
        session
            .select_template(TemplateSelection::new(
                TemplateKind::Creative,
                DocumentType::Cv,
            ))
            .unwrap();
        session.request_preview().unwrap();
        let job = session.begin_export().unwrap();
        assert_eq!(job.hint.document_type, DocumentType::Cv);
    }
}

// Application submission
// Applicant details plus up to three attachments, validated locally and then
// forwarded to the marketplace API as one multipart request.

pub mod client;
pub mod handlers;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::errors::{AppError, FieldError};

pub use client::ApplicationClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentKind {
    Resume,
    Transcript,
    InternshipLetter,
}

const DOCUMENT_EXTENSIONS: &[&str] = &["doc", "docx", "pdf"];
const TRANSCRIPT_EXTENSIONS: &[&str] = &["doc", "docx", "pdf", "jpg", "jpeg", "png"];

impl AttachmentKind {
    /// Multipart field name used both inbound and towards the remote API.
    pub fn field_name(&self) -> &'static str {
        match self {
            AttachmentKind::Resume => "resume",
            AttachmentKind::Transcript => "transcript",
            AttachmentKind::InternshipLetter => "internshipLetter",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "resume" => Some(AttachmentKind::Resume),
            "transcript" => Some(AttachmentKind::Transcript),
            "internshipLetter" => Some(AttachmentKind::InternshipLetter),
            _ => None,
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            AttachmentKind::Resume | AttachmentKind::InternshipLetter => DOCUMENT_EXTENSIONS,
            AttachmentKind::Transcript => TRANSCRIPT_EXTENSIONS,
        }
    }

    pub fn accepts(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .map_or(false, |ext| self.allowed_extensions().contains(&ext.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("{} exceeds the {max_mb}MB limit", .kind.field_name())]
    TooLarge { kind: AttachmentKind, max_mb: usize },

    #[error(
        "{} must be one of: {}",
        .kind.field_name(),
        .kind.allowed_extensions().join(", ")
    )]
    UnsupportedType {
        kind: AttachmentKind,
        file_name: String,
    },
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooLarge { max_mb, .. } => {
                AppError::PayloadTooLarge(format!("Maximum file size is {max_mb}MB"))
            }
            UploadError::UnsupportedType { kind, .. } => AppError::InvalidFields(vec![
                FieldError::new(kind.field_name(), err.to_string()),
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicantField {
    FirstName,
    Surname,
    OtherName,
    Email,
    Phone,
    Degree,
    Country,
    Region,
    City,
}

impl ApplicantField {
    pub const ALL: [ApplicantField; 9] = [
        ApplicantField::FirstName,
        ApplicantField::Surname,
        ApplicantField::OtherName,
        ApplicantField::Email,
        ApplicantField::Phone,
        ApplicantField::Degree,
        ApplicantField::Country,
        ApplicantField::Region,
        ApplicantField::City,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            ApplicantField::FirstName => "firstName",
            ApplicantField::Surname => "surname",
            ApplicantField::OtherName => "otherName",
            ApplicantField::Email => "email",
            ApplicantField::Phone => "phone",
            ApplicantField::Degree => "degree",
            ApplicantField::Country => "country",
            ApplicantField::Region => "region",
            ApplicantField::City => "city",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.field_name() == name)
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, ApplicantField::OtherName | ApplicantField::Degree)
    }
}

/// An application being assembled from an inbound form.
#[derive(Debug, Clone, Default)]
pub struct ApplicationDraft {
    pub first_name: String,
    pub surname: String,
    pub other_name: String,
    pub email: String,
    pub phone: String,
    pub degree: String,
    pub country: String,
    pub region: String,
    pub city: String,
    resume: Option<Attachment>,
    transcript: Option<Attachment>,
    internship_letter: Option<Attachment>,
}

impl ApplicationDraft {
    pub fn field(&self, field: ApplicantField) -> &str {
        match field {
            ApplicantField::FirstName => &self.first_name,
            ApplicantField::Surname => &self.surname,
            ApplicantField::OtherName => &self.other_name,
            ApplicantField::Email => &self.email,
            ApplicantField::Phone => &self.phone,
            ApplicantField::Degree => &self.degree,
            ApplicantField::Country => &self.country,
            ApplicantField::Region => &self.region,
            ApplicantField::City => &self.city,
        }
    }

    pub fn set_field(&mut self, field: ApplicantField, value: &str) {
        let slot = match field {
            ApplicantField::FirstName => &mut self.first_name,
            ApplicantField::Surname => &mut self.surname,
            ApplicantField::OtherName => &mut self.other_name,
            ApplicantField::Email => &mut self.email,
            ApplicantField::Phone => &mut self.phone,
            ApplicantField::Degree => &mut self.degree,
            ApplicantField::Country => &mut self.country,
            ApplicantField::Region => &mut self.region,
            ApplicantField::City => &mut self.city,
        };
        *slot = value.trim().to_string();
    }

    pub fn attach_resume(&mut self, file: Attachment, max_bytes: usize) -> Result<(), UploadError> {
        check(AttachmentKind::Resume, &file, max_bytes)?;
        self.resume = Some(file);
        Ok(())
    }

    pub fn attach_transcript(
        &mut self,
        file: Attachment,
        max_bytes: usize,
    ) -> Result<(), UploadError> {
        check(AttachmentKind::Transcript, &file, max_bytes)?;
        self.transcript = Some(file);
        Ok(())
    }

    pub fn attach_internship_letter(
        &mut self,
        file: Attachment,
        max_bytes: usize,
    ) -> Result<(), UploadError> {
        check(AttachmentKind::InternshipLetter, &file, max_bytes)?;
        self.internship_letter = Some(file);
        Ok(())
    }

    /// Attached files in slot order.
    pub fn attachments(&self) -> Vec<(AttachmentKind, &Attachment)> {
        [
            (AttachmentKind::Resume, &self.resume),
            (AttachmentKind::Transcript, &self.transcript),
            (AttachmentKind::InternshipLetter, &self.internship_letter),
        ]
        .into_iter()
        .filter_map(|(kind, slot)| slot.as_ref().map(|a| (kind, a)))
        .collect()
    }

    /// Every missing required value, the résumé attachment included.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors: Vec<FieldError> = ApplicantField::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.field(*f).is_empty())
            .map(|f| FieldError::new(f.field_name(), "This field is required"))
            .collect();
        if self.resume.is_none() {
            errors.push(FieldError::new(
                AttachmentKind::Resume.field_name(),
                "A resume is required",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check(kind: AttachmentKind, file: &Attachment, max_bytes: usize) -> Result<(), UploadError> {
    if file.bytes.len() > max_bytes {
        return Err(UploadError::TooLarge {
            kind,
            max_mb: max_bytes / (1024 * 1024),
        });
    }
    if !kind.accepts(&file.file_name) {
        return Err(UploadError::UnsupportedType {
            kind,
            file_name: file.file_name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 30 * 1024 * 1024;

    fn file(name: &str, size: usize) -> Attachment {
        Attachment {
            file_name: name.to_string(),
            content_type: None,
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    fn complete_draft() -> ApplicationDraft {
        let mut draft = ApplicationDraft::default();
        for field in ApplicantField::ALL {
            if field.is_required() {
                draft.set_field(field, "value");
            }
        }
        draft.attach_resume(file("cv.pdf", 10), MAX).unwrap();
        draft
    }

    #[test]
    fn test_extension_rules_per_slot() {
        assert!(AttachmentKind::Resume.accepts("CV.PDF"));
        assert!(AttachmentKind::Resume.accepts("cv.docx"));
        assert!(!AttachmentKind::Resume.accepts("cv.png"));
        assert!(AttachmentKind::Transcript.accepts("grades.jpeg"));
        assert!(!AttachmentKind::InternshipLetter.accepts("letter.jpg"));
        assert!(!AttachmentKind::Resume.accepts("pdf"));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let mut draft = ApplicationDraft::default();
        let err = draft
            .attach_transcript(file("t.pdf", 2048), 1024)
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::TooLarge {
                kind: AttachmentKind::Transcript,
                ..
            }
        ));
        assert!(draft.attachments().is_empty());
    }

    #[test]
    fn test_file_at_cap_accepted() {
        let mut draft = ApplicationDraft::default();
        draft
            .attach_internship_letter(file("letter.doc", 4096), 4096)
            .unwrap();
        assert_eq!(draft.attachments().len(), 1);
        assert_eq!(draft.attachments()[0].0, AttachmentKind::InternshipLetter);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut draft = ApplicationDraft::default();
        let err = draft.attach_resume(file("photo.png", 10), MAX).unwrap_err();
        assert_eq!(
            err,
            UploadError::UnsupportedType {
                kind: AttachmentKind::Resume,
                file_name: "photo.png".to_string()
            }
        );
    }

    #[test]
    fn test_complete_draft_is_valid() {
        assert!(complete_draft().validate().is_ok());
    }

    #[test]
    fn test_optional_fields_not_required() {
        let draft = complete_draft();
        assert!(draft.other_name.is_empty());
        assert!(draft.degree.is_empty());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_missing_resume_and_fields_reported() {
        let mut draft = ApplicationDraft::default();
        draft.set_field(ApplicantField::Email, "  ama@example.com ");
        assert_eq!(draft.email, "ama@example.com");
        let errors = draft.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["firstName", "surname", "phone", "country", "region", "city", "resume"]
        );
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in ApplicantField::ALL {
            assert_eq!(ApplicantField::from_field_name(field.field_name()), Some(field));
        }
        assert_eq!(
            AttachmentKind::from_field_name("internshipLetter"),
            Some(AttachmentKind::InternshipLetter)
        );
        assert!(AttachmentKind::from_field_name("coverLetter").is_none());
    }
}

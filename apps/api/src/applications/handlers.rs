use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::BytesMut;
use tracing::{debug, warn};

use crate::applications::{
    client::SubmissionReceipt, ApplicantField, ApplicationDraft, Attachment, AttachmentKind,
    UploadError,
};
use crate::errors::AppError;
use crate::state::AppState;

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

/// POST /api/v1/applications
pub async fn handle_submit_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SubmissionReceipt>, AppError> {
    let max_bytes = state.config.max_upload_bytes();
    let mut draft = ApplicationDraft::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(kind) = AttachmentKind::from_field_name(&name) {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);

            let mut buf = BytesMut::new();
            while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                if buf.len() + chunk.len() > max_bytes {
                    warn!(slot = kind.field_name(), "Upload rejected: over size cap");
                    return Err(UploadError::TooLarge {
                        kind,
                        max_mb: state.config.max_upload_mb,
                    }
                    .into());
                }
                buf.extend_from_slice(&chunk);
            }

            // browsers send an empty part for an untouched file input
            if buf.is_empty() && file_name.is_empty() {
                continue;
            }

            let attachment = Attachment {
                file_name,
                content_type,
                bytes: buf.freeze(),
            };
            let attached = match kind {
                AttachmentKind::Resume => draft.attach_resume(attachment, max_bytes),
                AttachmentKind::Transcript => draft.attach_transcript(attachment, max_bytes),
                AttachmentKind::InternshipLetter => {
                    draft.attach_internship_letter(attachment, max_bytes)
                }
            };
            if let Err(e) = attached {
                warn!(slot = kind.field_name(), error = %e, "Upload rejected");
                return Err(e.into());
            }
        } else if let Some(applicant_field) = ApplicantField::from_field_name(&name) {
            let value = field.text().await.map_err(multipart_error)?;
            draft.set_field(applicant_field, &value);
        } else {
            debug!(field = %name, "Ignoring unknown multipart field");
        }
    }

    draft.validate().map_err(AppError::InvalidFields)?;
    let receipt = state.applications.submit(&draft).await?;
    Ok(Json(receipt))
}

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::builder::session::SessionSnapshot;
use crate::errors::AppError;
use crate::export::{export_to_document, ExportOutcome};
use crate::models::profile::{EntryField, EntryId, PersonalField, Section, SkillKind};
use crate::state::AppState;
use crate::templates::{
    catalog, html::render_html, DocumentType, RenderedDocument, TemplateInfo, TemplateSelection,
};

#[derive(Deserialize)]
pub struct TemplatesQuery {
    #[serde(rename = "type")]
    pub document_type: Option<DocumentType>,
}

#[derive(Deserialize)]
pub struct SelectTemplateRequest {
    pub template_id: String,
}

#[derive(Deserialize)]
pub struct PersonalInfoUpdate {
    pub field: PersonalField,
    pub value: String,
}

#[derive(Deserialize)]
pub struct EntryFieldUpdate {
    #[serde(flatten)]
    pub field: EntryField,
    pub value: String,
}

#[derive(Deserialize)]
pub struct SkillRequest {
    pub kind: SkillKind,
    pub value: String,
}

#[derive(Serialize)]
pub struct EntryCreated {
    pub entry_id: EntryId,
    pub snapshot: SessionSnapshot,
}

#[derive(Serialize)]
pub struct MutationResponse {
    /// `false` when the operation matched nothing and changed nothing.
    pub changed: bool,
    pub snapshot: SessionSnapshot,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(
    Query(params): Query<TemplatesQuery>,
) -> Json<Vec<TemplateInfo>> {
    Json(catalog(params.document_type))
}

/// POST /api/v1/builder/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let session = state.sessions.create().await?;
    Ok((StatusCode::CREATED, Json(session.snapshot())))
}

/// GET /api/v1/builder/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state.sessions.with_session(id, |s| Ok(s.snapshot())).await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/builder/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/builder/sessions/:id/template
pub async fn handle_select_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectTemplateRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let selection = TemplateSelection::from_id(&req.template_id)
        .ok_or_else(|| AppError::Validation(format!("Unknown template '{}'", req.template_id)))?;
    let snapshot = state
        .sessions
        .with_session(id, |s| {
            s.select_template(selection)?;
            Ok(s.snapshot())
        })
        .await?;
    info!(session_id = %id, template = %selection.id(), "Template selected");
    Ok(Json(snapshot))
}

/// POST /api/v1/builder/sessions/:id/back
pub async fn handle_back_to_templates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with_session(id, |s| {
            s.back_to_templates()?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// PUT /api/v1/builder/sessions/:id/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PersonalInfoUpdate>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with_session(id, |s| {
            s.form()?.update_personal_info(req.field, &req.value);
            Ok(s.snapshot())
        })
        .await?;
    debug!(session_id = %id, field = ?req.field, "Personal info updated");
    Ok(Json(snapshot))
}

/// POST /api/v1/builder/sessions/:id/entries/:section
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((id, section)): Path<(Uuid, Section)>,
) -> Result<(StatusCode, Json<EntryCreated>), AppError> {
    let created = state
        .sessions
        .with_session(id, |s| {
            let entry_id = s.form()?.add_entry(section);
            Ok(EntryCreated {
                entry_id,
                snapshot: s.snapshot(),
            })
        })
        .await?;
    debug!(
        session_id = %id,
        section = section.as_str(),
        entry_id = %created.entry_id,
        "Entry added"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/v1/builder/sessions/:id/entries/:section/:entry_id
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((id, section, entry_id)): Path<(Uuid, Section, EntryId)>,
    Json(req): Json<EntryFieldUpdate>,
) -> Result<Json<MutationResponse>, AppError> {
    if req.field.section() != section {
        return Err(AppError::Validation(format!(
            "Field belongs to '{}', not '{}'",
            req.field.section().as_str(),
            section.as_str()
        )));
    }
    let response = state
        .sessions
        .with_session(id, |s| {
            let changed = s.form()?.update_entry_field(entry_id, req.field, &req.value);
            Ok(MutationResponse {
                changed,
                snapshot: s.snapshot(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// DELETE /api/v1/builder/sessions/:id/entries/:section/:entry_id
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((id, section, entry_id)): Path<(Uuid, Section, EntryId)>,
) -> Result<Json<MutationResponse>, AppError> {
    let response = state
        .sessions
        .with_session(id, |s| {
            let changed = s.form()?.remove_entry(section, entry_id);
            Ok(MutationResponse {
                changed,
                snapshot: s.snapshot(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/builder/sessions/:id/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SkillRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let response = state
        .sessions
        .with_session(id, |s| {
            let changed = s.form()?.add_skill(req.kind, &req.value);
            Ok(MutationResponse {
                changed,
                snapshot: s.snapshot(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// DELETE /api/v1/builder/sessions/:id/skills
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SkillRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let response = state
        .sessions
        .with_session(id, |s| {
            let changed = s.form()?.remove_skill(req.kind, &req.value);
            Ok(MutationResponse {
                changed,
                snapshot: s.snapshot(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// GET /api/v1/builder/sessions/:id/render
pub async fn handle_render(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderedDocument>, AppError> {
    let doc = state.sessions.with_session(id, |s| Ok(s.display()?)).await?;
    Ok(Json(doc))
}

/// GET /api/v1/builder/sessions/:id/preview.html
pub async fn handle_preview_html(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let doc = state.sessions.with_session(id, |s| Ok(s.display()?)).await?;
    Ok(Html(render_html(&doc)))
}

/// POST /api/v1/builder/sessions/:id/preview
pub async fn handle_request_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with_session(id, |s| {
            s.request_preview()?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/builder/sessions/:id/edit
pub async fn handle_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .with_session(id, |s| {
            s.edit()?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/builder/sessions/:id/export
///
/// PDF encoding runs on the blocking pool; the session stays flagged as
/// exporting until it finishes.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let job = state
        .sessions
        .with_session(id, |s| Ok(s.begin_export()?))
        .await?;

    let result =
        tokio::task::spawn_blocking(move || export_to_document(job.region.as_ref(), &job.hint))
            .await;

    // The session may have been deleted meanwhile; nothing left to reset then.
    let _ = state
        .sessions
        .with_session(id, |s| {
            s.finish_export();
            Ok(())
        })
        .await;

    let outcome = result.map_err(|e| anyhow::anyhow!("export task failed: {e}"))??;
    match outcome {
        ExportOutcome::Exported(file) => Ok((
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition(&file.file_name),
                ),
            ],
            file.bytes,
        )
            .into_response()),
        ExportOutcome::Skipped => Err(AppError::Conflict {
            code: "PREVIEW_NOT_READY",
            message: "The preview has not been displayed yet; nothing was exported".to_string(),
        }),
    }
}

/// `attachment` disposition with an ASCII fallback name and the exact UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let mut encoded = String::with_capacity(file_name.len() * 3);
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

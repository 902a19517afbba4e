pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::builder::handlers as builder;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // three attachments plus the text fields
    let upload_limit = state.config.max_upload_bytes() * 3 + 1024 * 1024;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(builder::handle_list_templates))
        // Builder API
        .route(
            "/api/v1/builder/sessions",
            post(builder::handle_create_session),
        )
        .route(
            "/api/v1/builder/sessions/:id",
            get(builder::handle_get_session).delete(builder::handle_delete_session),
        )
        .route(
            "/api/v1/builder/sessions/:id/template",
            post(builder::handle_select_template),
        )
        .route(
            "/api/v1/builder/sessions/:id/back",
            post(builder::handle_back_to_templates),
        )
        .route(
            "/api/v1/builder/sessions/:id/personal-info",
            put(builder::handle_update_personal_info),
        )
        .route(
            "/api/v1/builder/sessions/:id/entries/:section",
            post(builder::handle_add_entry),
        )
        .route(
            "/api/v1/builder/sessions/:id/entries/:section/:entry_id",
            patch(builder::handle_update_entry).delete(builder::handle_remove_entry),
        )
        .route(
            "/api/v1/builder/sessions/:id/skills",
            post(builder::handle_add_skill).delete(builder::handle_remove_skill),
        )
        .route(
            "/api/v1/builder/sessions/:id/render",
            get(builder::handle_render),
        )
        .route(
            "/api/v1/builder/sessions/:id/preview.html",
            get(builder::handle_preview_html),
        )
        .route(
            "/api/v1/builder/sessions/:id/preview",
            post(builder::handle_request_preview),
        )
        .route(
            "/api/v1/builder/sessions/:id/edit",
            post(builder::handle_edit),
        )
        .route(
            "/api/v1/builder/sessions/:id/export",
            post(builder::handle_export),
        )
        // Auth API
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        // Applications API
        .route(
            "/api/v1/applications",
            post(applications::handle_submit_application)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}

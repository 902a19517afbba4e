use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::info;

use crate::auth::{
    validate_credentials, validate_sign_up, AuthError, AuthSession, Credentials, SignUpRequest,
};
use crate::errors::AppError;
use crate::state::AppState;

fn session_response(session: AuthSession) -> Response {
    let cookies: Vec<_> = session
        .cookies
        .iter()
        .map(|c| (header::SET_COOKIE, c.clone()))
        .collect();
    (
        AppendHeaders(cookies),
        Json(json!({
            "success": true,
            "session": session,
        })),
    )
        .into_response()
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, AppError> {
    validate_credentials(&credentials)?;
    let session = state.auth.authenticate(&credentials).await?;
    info!(email = %session.email, "User signed in");
    Ok(session_response(session))
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Response, AppError> {
    validate_sign_up(&request)?;
    let session = state
        .auth
        .register(&request)
        .await
        .map_err(|e| match e {
            // e.g. email already registered
            AuthError::Rejected(message) => AppError::Validation(message),
            other => other.into(),
        })?;
    info!(email = %session.email, "User signed up");
    Ok(session_response(session))
}

// Authentication collaborator
// Sign-in and sign-up are delegated to the remote marketplace API. The rest of
// the service only sees the `Authenticator` trait; `RemoteAuthenticator` is the
// one implementation that ships.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{AppError, FieldError};

pub mod handlers;
pub mod remote;

pub use remote::RemoteAuthenticator;

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// A successful sign-in or sign-up as reported by the remote API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Raw `Set-Cookie` values to hand back to the caller.
    #[serde(skip)]
    pub cookies: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid input")]
    Invalid(Vec<FieldError>),

    #[error("{0}")]
    Rejected(String),

    #[error("authentication service unavailable: {0}")]
    Upstream(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Invalid(fields) => AppError::InvalidFields(fields),
            AuthError::Rejected(message) => AppError::Unauthorized(message),
            AuthError::Upstream(detail) => AppError::Upstream(detail),
        }
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthSession, AuthError>;

    async fn register(&self, request: &SignUpRequest) -> Result<AuthSession, AuthError>;
}

/// Loose email shape: some token of the form `x@y.z`, all non-whitespace.
pub fn looks_like_email(value: &str) -> bool {
    value.split_whitespace().any(|token| {
        token.match_indices('@').any(|(at, _)| {
            let domain = &token[at + 1..];
            at > 0
                && domain
                    .match_indices('.')
                    .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
        })
    })
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !looks_like_email(email) {
        errors.push(FieldError::new("email", "Email is invalid"));
    }
}

pub fn validate_credentials(credentials: &Credentials) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    check_email(&credentials.email, &mut errors);
    if credentials.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Invalid(errors))
    }
}

pub fn validate_sign_up(request: &SignUpRequest) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    if request.full_name.trim().is_empty() {
        errors.push(FieldError::new("fullName", "Full name is required"));
    }
    check_email(&request.email, &mut errors);
    if request.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if request.password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if request.password != request.confirm_password {
        errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Invalid(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_messages(err: AuthError) -> Vec<(String, String)> {
        match err {
            AuthError::Invalid(fields) => fields.into_iter().map(|f| (f.field, f.message)).collect(),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(looks_like_email("first.last@uni.edu.gh"));
        assert!(looks_like_email("  a@b.c  "));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.com"));
        assert!(!looks_like_email("a@.com"));
        assert!(!looks_like_email("a@b."));
        assert!(!looks_like_email("a @b.com"));
    }

    #[test]
    fn test_login_requires_email_and_password() {
        let errors = field_messages(
            validate_credentials(&Credentials {
                email: " ".to_string(),
                password: String::new(),
            })
            .unwrap_err(),
        );
        assert_eq!(
            errors,
            vec![
                ("email".to_string(), "Email is required".to_string()),
                ("password".to_string(), "Password is required".to_string()),
            ]
        );
    }

    #[test]
    fn test_login_rejects_malformed_email() {
        let errors = field_messages(
            validate_credentials(&Credentials {
                email: "not-an-email".to_string(),
                password: "secret".to_string(),
            })
            .unwrap_err(),
        );
        assert_eq!(errors[0].1, "Email is invalid");
    }

    #[test]
    fn test_sign_up_rules() {
        let errors = field_messages(
            validate_sign_up(&SignUpRequest {
                full_name: String::new(),
                email: "kofi@example.com".to_string(),
                password: "short".to_string(),
                confirm_password: "shorter".to_string(),
            })
            .unwrap_err(),
        );
        let fields: Vec<&str> = errors.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(fields, vec!["fullName", "password", "confirmPassword"]);
        assert_eq!(errors[1].1, "Password must be at least 8 characters");
    }

    #[test]
    fn test_valid_sign_up_passes() {
        assert!(validate_sign_up(&SignUpRequest {
            full_name: "Kofi Mensah".to_string(),
            email: "kofi@example.com".to_string(),
            password: "correct horse".to_string(),
            confirm_password: "correct horse".to_string(),
        })
        .is_ok());
    }
}

use async_trait::async_trait;
use reqwest::{header::SET_COOKIE, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{AuthError, AuthSession, Authenticator, Credentials, SignUpRequest};

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpBody<'a> {
    full_name: &'a str,
    email: &'a str,
    password: &'a str,
    confirm_password: &'a str,
}

/// `{success, message?, token?}` as returned by both auth endpoints.
#[derive(Debug, Deserialize)]
struct RemoteAuthResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    token: Option<String>,
}

struct Accepted {
    message: Option<String>,
    token: Option<String>,
    cookies: Vec<String>,
}

/// Authenticator backed by the marketplace HTTP API.
#[derive(Clone)]
pub struct RemoteAuthenticator {
    client: Client,
    base_url: String,
}

impl RemoteAuthenticator {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback_message: &str,
    ) -> Result<Accepted, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("POST {url}: {e}")))?;

        let status = response.status();
        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Upstream(format!("POST {url} returned {status}: {body}")));
        }

        let data: RemoteAuthResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("POST {url}: unreadable body: {e}")))?;

        if status.is_success() && data.success {
            debug!(url = %url, cookies = cookies.len(), "Remote auth accepted");
            Ok(Accepted {
                message: data.message,
                token: data.token,
                cookies,
            })
        } else {
            warn!(url = %url, status = %status, "Remote auth rejected");
            Err(AuthError::Rejected(
                data.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback_message.to_string()),
            ))
        }
    }
}

#[async_trait]
impl Authenticator for RemoteAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        let accepted = self
            .post(
                "/api/auth/login",
                &LoginBody {
                    email: &credentials.email,
                    password: &credentials.password,
                },
                "Login failed. Please try again.",
            )
            .await?;
        Ok(AuthSession {
            email: credentials.email.clone(),
            full_name: None,
            message: accepted
                .message
                .unwrap_or_else(|| "Successfully signed in!".to_string()),
            token: accepted.token,
            cookies: accepted.cookies,
        })
    }

    async fn register(&self, request: &SignUpRequest) -> Result<AuthSession, AuthError> {
        let accepted = self
            .post(
                "/api/auth/signup",
                &SignUpBody {
                    full_name: &request.full_name,
                    email: &request.email,
                    password: &request.password,
                    confirm_password: &request.confirm_password,
                },
                "Signup failed. Please try again.",
            )
            .await?;
        Ok(AuthSession {
            email: request.email.clone(),
            full_name: Some(request.full_name.clone()),
            message: accepted
                .message
                .unwrap_or_else(|| "Account created successfully!".to_string()),
            token: accepted.token,
            cookies: accepted.cookies,
        })
    }
}

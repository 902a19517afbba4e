use std::sync::Arc;

use crate::applications::ApplicationClient;
use crate::auth::Authenticator;
use crate::builder::SessionRegistry;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    /// Sign-in/sign-up collaborator. `RemoteAuthenticator` in production.
    pub auth: Arc<dyn Authenticator>,
    pub applications: ApplicationClient,
    pub config: Config,
}

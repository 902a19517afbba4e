use std::time::Duration;

use anyhow::{ensure, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote marketplace API (auth and applications).
    pub api_base_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Per-attachment upload cap in MiB.
    pub max_upload_mb: usize,
    /// Maximum number of live builder sessions.
    pub session_limit: usize,
    /// Idle minutes before a builder session is dropped.
    pub session_ttl_minutes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let session_ttl_minutes = std::env::var("SESSION_TTL_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .context("SESSION_TTL_MINUTES must be a positive integer")?;
        ensure!(session_ttl_minutes > 0, "SESSION_TTL_MINUTES must be at least 1");

        Ok(Config {
            api_base_url: require_env("API_BASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_mb: std::env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a positive integer")?,
            session_limit: std::env::var("SESSION_LIMIT")
                .unwrap_or_else(|_| "1000".to_string())
                .parse::<usize>()
                .context("SESSION_LIMIT must be a positive integer")?,
            session_ttl_minutes,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

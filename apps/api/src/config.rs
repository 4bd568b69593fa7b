use anyhow::{Context, Result};

pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub jwt_secret: String,
    pub frontend_url: String,
    /// Externally visible origin of this API; the OAuth callback hangs off it.
    pub public_url: String,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_model: env_or("OPENAI_MODEL", "gpt-4o"),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            google_client_id: env_or("GOOGLE_CLIENT_ID", ""),
            google_client_secret: env_or("GOOGLE_CLIENT_SECRET", ""),
            jwt_secret: env_or("JWT_SECRET", DEFAULT_JWT_SECRET),
            frontend_url: env_or("FRONTEND_URL", "http://localhost:3000"),
            public_url: env_or("PUBLIC_URL", "http://localhost:8080"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            log_level: env_or("LOG_LEVEL", "info"),
        })
    }

    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

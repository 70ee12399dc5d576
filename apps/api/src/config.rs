use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    /// Sent as the HTTP-Referer header OpenRouter uses for attribution.
    pub frontend_url: String,
    /// JSON file describing the configured WordPress publish targets.
    pub sites_file: String,
    /// Path to the humanizer script invoked over stdin/stdout.
    pub humanizer_script: String,
    /// Candidate images fetched per post.
    pub images_per_post: u32,
    /// Optional webhook notified when a bulk job finishes. Best-effort only.
    pub notify_webhook_url: Option<String>,
    pub generation_timeout_secs: u64,
    pub humanize_timeout_secs: u64,
    pub publish_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            sites_file: std::env::var("SITES_FILE").unwrap_or_else(|_| "sites.json".to_string()),
            humanizer_script: std::env::var("HUMANIZER_SCRIPT")
                .unwrap_or_else(|_| "humanizer.py".to_string()),
            images_per_post: parse_env("IMAGES_PER_POST", 4)?,
            notify_webhook_url: std::env::var("NOTIFY_WEBHOOK_URL").ok(),
            generation_timeout_secs: parse_env("GENERATION_TIMEOUT_SECS", 120)?,
            humanize_timeout_secs: parse_env("HUMANIZE_TIMEOUT_SECS", 60)?,
            publish_timeout_secs: parse_env("PUBLISH_TIMEOUT_SECS", 30)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value")),
        Err(_) => Ok(default),
    }
}

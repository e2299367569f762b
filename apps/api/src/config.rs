use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Absent key is not a startup error: generation calls fail per request instead.
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub static_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub index_file: PathBuf,
    pub pdf_output_dir: PathBuf,
    pub chrome_executable: Option<PathBuf>,
    pub render_idle_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            google_api_key: optional_env("GOOGLE_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", crate::llm_client::DEFAULT_MODEL),
            gemini_api_base: env_or("GEMINI_API_BASE", crate::llm_client::DEFAULT_API_BASE),
            static_dir: env_or("STATIC_DIR", "public").into(),
            frontend_dir: env_or("FRONTEND_DIR", "../FRONTEND").into(),
            index_file: env_or("INDEX_FILE", "index.html").into(),
            pdf_output_dir: optional_env("PDF_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            chrome_executable: optional_env("CHROME_EXECUTABLE").map(PathBuf::from),
            render_idle_timeout: Duration::from_millis(
                env_or("RENDER_IDLE_TIMEOUT_MS", "5000")
                    .parse::<u64>()
                    .context("RENDER_IDLE_TIMEOUT_MS must be a number of milliseconds")?,
            ),
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an env var, treating an empty value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Configuration for handler tests: no key, no database, artifacts in `pdf_output_dir`.
    pub fn for_tests(pdf_output_dir: PathBuf) -> Self {
        Config {
            database_url: "postgres://localhost/unused".to_string(),
            google_api_key: None,
            gemini_model: crate::llm_client::DEFAULT_MODEL.to_string(),
            gemini_api_base: crate::llm_client::DEFAULT_API_BASE.to_string(),
            static_dir: pdf_output_dir.join("public"),
            frontend_dir: pdf_output_dir.join("frontend"),
            index_file: pdf_output_dir.join("index.html"),
            pdf_output_dir,
            chrome_executable: None,
            render_idle_timeout: Duration::from_millis(100),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_MERGE_BASE_URL: &str = "https://api.merge.dev/api/ats/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Process-wide settings, read once at startup and shared through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub ensure_schema: bool,
    pub merge_api_key: Option<String>,
    pub merge_base_url: String,
    pub merge_account_token: Option<String>,
    pub backend_url: Option<String>,
    pub backend_api_key: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub scratch_dir: PathBuf,
    pub http_timeout_secs: u64,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            database_url: None,
            database_max_connections: 10,
            ensure_schema: true,
            merge_api_key: None,
            merge_base_url: DEFAULT_MERGE_BASE_URL.to_string(),
            merge_account_token: None,
            backend_url: None,
            backend_api_key: None,
            cors_allowed_origins: vec!["*".to_string()],
            scratch_dir: env::temp_dir(),
            http_timeout_secs: 60,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", defaults.server_address),
            database_url: get_env_opt("DATABASE_URL"),
            database_max_connections: get_env_parse_or(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            ensure_schema: get_env_parse_or("ENSURE_SCHEMA", defaults.ensure_schema)?,
            merge_api_key: get_env_opt("MERGE_API_KEY"),
            merge_base_url: get_env_or("MERGE_BASE_URL", defaults.merge_base_url),
            merge_account_token: get_env_opt("MERGE_ACCOUNT_TOKEN"),
            backend_url: get_env_opt("BACKEND_URL"),
            backend_api_key: get_env_opt("BACKEND_API_KEY"),
            cors_allowed_origins: get_env_opt("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or(defaults.cors_allowed_origins),
            scratch_dir: get_env_opt("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            http_timeout_secs: get_env_parse_or("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            log_format: match get_env_opt("LOG_FORMAT").as_deref() {
                None | Some("text") => LogFormat::Text,
                Some("json") => LogFormat::Json,
                Some(other) => {
                    return Err(Error::Config(format!(
                        "Invalid value for LOG_FORMAT: {} (expected text or json)",
                        other
                    )))
                }
            },
        })
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| Error::Config("Missing environment variable: DATABASE_URL".to_string()))
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn get_env_or(name: &str, default: String) -> String {
    get_env_opt(name).unwrap_or(default)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

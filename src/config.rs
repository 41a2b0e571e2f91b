use std::path::PathBuf;

use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DB_PATH: &str = "todo.db";
const DEFAULT_WEB_ROOT: &str = "web";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub web_root: PathBuf,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values behave like unset ones.
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("TODO_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "TODO_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            host: get("TODO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            db_path: PathBuf::from(get("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string())),
            web_root: PathBuf::from(get("TODO_WEB_ROOT").unwrap_or_else(|| DEFAULT_WEB_ROOT.to_string())),
            gemini: GeminiConfig {
                api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_base: get("GEMINI_API_BASE")
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            },
        })
    }
}

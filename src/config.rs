use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    /// Base URL of the statement-analysis service; `None` disables
    /// scanning (a mock analyzer is wired instead).
    pub analyzer_api_url: Option<String>,
    pub session_ttl_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let analyzer_api_url = env_map.get("ANALYZER_API_URL").cloned();

        let session_ttl_ms = env_map
            .get("SESSION_TTL_MS")
            .map(|s| s.as_str())
            .unwrap_or("300000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SESSION_TTL_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        Ok(Config {
            database_path,
            analyzer_api_url,
            session_ttl_ms,
        })
    }
}

//! Environment configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ApiError, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3008;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON array of content items loaded at startup.
    pub seed_path: Option<PathBuf>,
    /// Per-request search deadline.
    pub search_timeout: Option<Duration>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("PORT must be a port number, got {raw:?}")))?,
            None => DEFAULT_PORT,
        };

        let search_timeout = match get("SEARCH_TIMEOUT_MS") {
            Some(raw) => {
                let millis: u64 = raw.trim().parse().map_err(|_| {
                    ApiError::Config(format!(
                        "SEARCH_TIMEOUT_MS must be milliseconds, got {raw:?}"
                    ))
                })?;
                Some(Duration::from_millis(millis))
            }
            None => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            seed_path: get("CONTENT_SEED_PATH").map(PathBuf::from),
            search_timeout,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

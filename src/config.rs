use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://test.api.amadeus.com";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_REQUEST_TIMEOUT_MS: &str = "30000";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid {key} value: {message}")]
    InvalidValue { key: &'static str, message: String },
}

// Relay settings; the provider credentials stay on the server
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_key: String,
    pub api_secret: String,
    pub provider_base_url: String,
    pub static_dir: PathBuf,
    pub request_timeout_ms: u64,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "PORT", DEFAULT_PORT)?,
            api_key: required(&lookup, "API_KEY")?,
            api_secret: required(&lookup, "API_SECRET")?,
            provider_base_url: try_load(&lookup, "PROVIDER_BASE_URL", DEFAULT_PROVIDER_BASE_URL)?,
            static_dir: try_load(&lookup, "STATIC_DIR", DEFAULT_STATIC_DIR)?,
            request_timeout_ms: try_load(
                &lookup,
                "REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )?,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::InvalidValue {
                key,
                message: e.to_string(),
            }
        })
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => {
            warn!("Environment variable {key} not found");
            Err(ConfigError::MissingVar(key))
        }
    }
}

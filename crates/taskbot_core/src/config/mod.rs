use crate::error::AppError;
use crate::storage::json_store;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKBOT_CONFIG_PATH";
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token: Option<String>,
    pub api_base: String,
    pub store_path: Option<PathBuf>,
    /// Pause between two polls.
    pub poll_interval_secs: u64,
    /// Pause after a failed poll.
    pub error_backoff_secs: u64,
    /// Long-poll wait the server may hold a `getUpdates` call open for.
    pub poll_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.telegram.org".to_string(),
            store_path: None,
            poll_interval_secs: 2,
            error_backoff_secs: 2,
            poll_timeout_secs: 25,
            request_timeout_secs: 60,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn store_path(&self) -> Result<PathBuf, AppError> {
        match self.store_path.as_ref() {
            Some(path) => Ok(path.clone()),
            None => json_store::store_path(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    /// The long poll has to finish before the HTTP client gives up on it.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.poll_timeout_secs >= self.request_timeout_secs {
            return Err(AppError::validation(
                "poll_timeout_secs must be lower than request_timeout_secs",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub api_base: Option<String>,
    pub store_path: Option<PathBuf>,
    pub poll_interval_secs: Option<u64>,
    pub error_backoff_secs: Option<u64>,
    pub poll_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Overrides taken from `TELEGRAM_TOKEN` and `TASKBOT_STORE_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            token: non_blank(TOKEN_ENV_VAR),
            store_path: non_blank(json_store::STORE_ENV_VAR).map(PathBuf::from),
            ..Self::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::storage("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("taskbot")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::storage("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskbot")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::storage(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::storage(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();

    if let Some(token) = overrides.token.as_ref() {
        merged.token = Some(token.clone());
    }
    if let Some(api_base) = overrides.api_base.as_ref() {
        merged.api_base = api_base.clone();
    }
    if let Some(store_path) = overrides.store_path.as_ref() {
        merged.store_path = Some(store_path.clone());
    }
    if let Some(log_level) = overrides.log_level.as_ref() {
        merged.log_level = log_level.clone();
    }

    merged.poll_interval_secs = overrides
        .poll_interval_secs
        .unwrap_or(merged.poll_interval_secs);
    merged.error_backoff_secs = overrides
        .error_backoff_secs
        .unwrap_or(merged.error_backoff_secs);
    merged.poll_timeout_secs = overrides
        .poll_timeout_secs
        .unwrap_or(merged.poll_timeout_secs);
    merged.request_timeout_secs = overrides
        .request_timeout_secs
        .unwrap_or(merged.request_timeout_secs);

    merged
}

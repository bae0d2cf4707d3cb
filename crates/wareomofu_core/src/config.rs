//! Environment configuration.
//!
//! Every key is read through a lookup function so tests can inject values
//! without touching the process environment.

use crate::logging::{default_log_level, LogLevel, LoggingError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_KEY: &str = "WAREOMOFU_DB_PATH";
pub const REPLICA_DB_PATH_KEY: &str = "WAREOMOFU_REPLICA_DB_PATH";
pub const LOG_LEVEL_KEY: &str = "WAREOMOFU_LOG_LEVEL";
pub const LOG_DIR_KEY: &str = "WAREOMOFU_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub replica_db_path: Option<PathBuf>,
    pub log_level: LogLevel,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "{key} must be set"),
            Self::Invalid { key, reason } => write!(f, "{key} is invalid: {reason}"),
        }
    }
}

impl Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_path = read(DB_PATH_KEY)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(DB_PATH_KEY))?;

        let replica_db_path = read(REPLICA_DB_PATH_KEY).map(PathBuf::from);
        if replica_db_path.is_none() {
            info!(
                "event=config_default module=config key={} value=primary",
                REPLICA_DB_PATH_KEY
            );
        }

        let log_level = match read(LOG_LEVEL_KEY) {
            Some(raw) => raw.parse::<LogLevel>().map_err(|err| invalid(LOG_LEVEL_KEY, err))?,
            None => {
                let level = default_log_level();
                info!(
                    "event=config_default module=config key={} value={}",
                    LOG_LEVEL_KEY, level
                );
                level
            }
        };

        let log_dir = match read(LOG_DIR_KEY).map(PathBuf::from) {
            Some(dir) if !dir.is_absolute() => {
                return Err(ConfigError::Invalid {
                    key: LOG_DIR_KEY,
                    reason: format!("`{}` is not an absolute path", dir.display()),
                })
            }
            Some(dir) => Some(dir),
            None => {
                info!(
                    "event=config_default module=config key={} value=disabled",
                    LOG_DIR_KEY
                );
                None
            }
        };

        Ok(Self {
            db_path,
            replica_db_path,
            log_level,
            log_dir,
        })
    }
}

fn invalid(key: &'static str, err: LoggingError) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: err.to_string(),
    }
}

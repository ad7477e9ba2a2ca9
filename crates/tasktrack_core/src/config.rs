//! Service configuration.
//!
//! # Responsibility
//! - Collect runtime settings from environment variables with defaults.
//! - Reject settings the service cannot run with.
//!
//! # Invariants
//! - The token secret is carried here and handed to `SessionService`
//!   explicitly; nothing reads it from a global.

use crate::auth::session::DEFAULT_TOKEN_TTL_HOURS;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TASKTRACK_DB_PATH";
pub const ENV_LISTEN: &str = "TASKTRACK_LISTEN";
pub const ENV_TOKEN_SECRET: &str = "TASKTRACK_TOKEN_SECRET";
pub const ENV_TOKEN_TTL_HOURS: &str = "TASKTRACK_TOKEN_TTL_HOURS";
pub const ENV_LOG_LEVEL: &str = "TASKTRACK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKTRACK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tasktrack.sqlite3";
const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub listen_addr: SocketAddr,
    pub token_secret: String,
    pub token_ttl_hours: u32,
    pub log_level: String,
    /// `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingTokenSecret,
    InvalidListenAddr(String),
    InvalidTokenTtl(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTokenSecret => {
                write!(f, "{ENV_TOKEN_SECRET} must be set to a non-empty value")
            }
            Self::InvalidListenAddr(value) => write!(f, "invalid listen address `{value}`"),
            Self::InvalidTokenTtl(value) => {
                write!(f, "token ttl must be a positive number of hours, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

impl ServiceConfig {
    /// Builds configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let listen_raw = read(ENV_LISTEN).unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen_addr = parse_listen_addr(&listen_raw)?;

        let token_secret = read(ENV_TOKEN_SECRET).ok_or(ConfigError::MissingTokenSecret)?;

        let token_ttl_hours = match read(ENV_TOKEN_TTL_HOURS) {
            Some(raw) => parse_token_ttl(&raw)?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };

        Ok(Self {
            db_path,
            listen_addr,
            token_secret,
            token_ttl_hours,
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    /// Re-checks invariants after fields were overridden by the caller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_secret.trim().is_empty() {
            return Err(ConfigError::MissingTokenSecret);
        }
        if self.token_ttl_hours == 0 {
            return Err(ConfigError::InvalidTokenTtl("0".to_string()));
        }
        Ok(())
    }
}

pub fn parse_listen_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidListenAddr(value.to_string()))
}

fn parse_token_ttl(value: &str) -> Result<u32, ConfigError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|hours| *hours > 0)
        .ok_or_else(|| ConfigError::InvalidTokenTtl(value.to_string()))
}

//! Client configuration
//!
//! A single immutable record loaded before the main loop starts,
//! optionally from a JSON file.

use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

/// Default server host
const DEFAULT_HOST: &str = "irc.autumnnippert.com";

/// Default plain-text IRC port
const DEFAULT_PORT: u16 = 6667;

/// Default identity used for nickname, user and realname
const DEFAULT_IDENTITY: &str = "card";

/// Connection and identity settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server host name or address
    pub host: String,
    /// Server TCP port
    pub port: u16,
    /// Nickname sent with NICK
    pub nickname: String,
    /// Username (ident) sent with USER
    pub user: String,
    /// Real name sent as the USER trailing parameter
    pub realname: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            nickname: DEFAULT_IDENTITY.to_string(),
            user: DEFAULT_IDENTITY.to_string(),
            realname: DEFAULT_IDENTITY.to_string(),
        }
    }
}

impl Config {
    /// Load and validate a JSON config file
    ///
    /// Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field can be put on the wire
    pub fn validate(&self) -> Result<(), AppError> {
        if self.host.trim().is_empty() {
            return Err(AppError::InvalidConfig("host is empty".to_string()));
        }
        if self.port == 0 {
            return Err(AppError::InvalidConfig("port must be non-zero".to_string()));
        }
        for (field, value) in [("nickname", &self.nickname), ("user", &self.user)] {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(AppError::InvalidConfig(format!(
                    "{field} must be a single non-empty word"
                )));
            }
        }
        if self.realname.trim().is_empty() {
            return Err(AppError::InvalidConfig("realname is empty".to_string()));
        }
        Ok(())
    }

    /// `host:port` string used for dialing and display
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

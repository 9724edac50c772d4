//! Application configuration.
//!
//! Configuration is stored in `.helpdesk/config.yaml` and includes:
//! - Ticket API base URL and request timeout
//! - Session credentials (token and role)
//! - Board behavior after transitions
//!
//! `HELPDESK_API_URL`, `HELPDESK_TOKEN` and `HELPDESK_ROLE` override the
//! corresponding file values when set and non-empty.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HelpdeskError, Result};
use crate::paths;

pub const API_URL_ENV: &str = "HELPDESK_API_URL";
pub const TOKEN_ENV: &str = "HELPDESK_TOKEN";
pub const ROLE_ENV: &str = "HELPDESK_ROLE";

/// Keys accepted by `config get` / `config set`
pub const VALID_KEYS: &[&str] = &[
    "api.url",
    "api.timeout",
    "auth.token",
    "auth.role",
    "board.refresh_after_transition",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ticket API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Session credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Board behavior
    #[serde(default, skip_serializing_if = "BoardConfig::is_default")]
    pub board: BoardConfig,
}

/// Ticket API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://desk.example.com/api/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// HTTP request timeout in seconds (default: 30)
    #[serde(default = "default_api_timeout")]
    pub timeout: u64,
}

fn default_api_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: default_api_timeout(),
        }
    }
}

/// Session credentials
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .finish()
    }
}

/// Board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Refetch the whole ticket list after every transition (default: true)
    #[serde(default = "default_refresh_after_transition")]
    pub refresh_after_transition: bool,
}

fn default_refresh_after_transition() -> bool {
    true
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            refresh_after_transition: default_refresh_after_transition(),
        }
    }
}

impl BoardConfig {
    /// Check if this config has default values
    pub fn is_default(&self) -> bool {
        self.refresh_after_transition == default_refresh_after_transition()
    }
}

/// Read a non-empty environment variable
fn env_override(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        paths::config_path()
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            HelpdeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                HelpdeskError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            HelpdeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // The file may hold a token: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions)?;
        }

        Ok(())
    }

    /// Ticket API base URL from environment or config
    pub fn api_url(&self) -> Option<String> {
        env_override(API_URL_ENV).or_else(|| self.api.url.clone())
    }

    /// API token from environment or config
    pub fn api_token(&self) -> Option<String> {
        env_override(TOKEN_ENV).or_else(|| self.auth.token.clone())
    }

    /// Raw session role from environment or config
    pub fn role(&self) -> Option<String> {
        env_override(ROLE_ENV).or_else(|| self.auth.role.clone())
    }

    /// HTTP request timeout
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }

    pub fn refresh_after_transition(&self) -> bool {
        self.board.refresh_after_transition
    }

    /// Set a value by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.url" => {
                url::Url::parse(value)?;
                self.api.url = Some(value.to_string());
            }
            "api.timeout" => {
                self.api.timeout = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        HelpdeskError::Config(format!(
                            "invalid value '{value}' for api.timeout. Expected a positive number of seconds"
                        ))
                    })?;
            }
            "auth.token" => self.auth.token = Some(value.to_string()),
            "auth.role" => {
                let role: crate::types::Role = value.parse()?;
                self.auth.role = Some(role.to_string());
            }
            "board.refresh_after_transition" => {
                self.board.refresh_after_transition = value.parse::<bool>().map_err(|_| {
                    HelpdeskError::Config(format!(
                        "invalid value '{value}' for board.refresh_after_transition. Expected: true or false"
                    ))
                })?;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Get a value by dotted key, as stored in the config file.
    ///
    /// The token is masked.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api.url" => self.api.url.clone(),
            "api.timeout" => Some(self.api.timeout.to_string()),
            "auth.token" => self.auth.token.as_deref().map(mask_sensitive_value),
            "auth.role" => self.auth.role.clone(),
            "board.refresh_after_transition" => {
                Some(self.board.refresh_after_transition.to_string())
            }
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }
}

fn unknown_key(key: &str) -> HelpdeskError {
    HelpdeskError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    ))
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

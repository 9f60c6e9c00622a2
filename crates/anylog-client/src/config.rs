//! Connection state and configuration loading

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Request timeout used when none is given
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection target for a single node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionState {
    /// `http://ip:port`, or `https://ip:port` when credentials are set
    pub base_url: String,
    /// Basic-auth user
    pub username: Option<String>,
    /// Basic-auth password
    pub password: Option<String>,
    /// Whole-request deadline in seconds; 0 disables the deadline
    pub timeout_seconds: u64,
}

impl ConnectionState {
    /// Build the state for `host_port`
    ///
    /// Any non-empty credential switches the scheme to https.
    #[must_use]
    pub fn new(host_port: &str, username: &str, password: &str, timeout_seconds: u64) -> Self {
        let username = non_empty(username);
        let password = non_empty(password);
        let scheme = if username.is_some() || password.is_some() {
            "https"
        } else {
            "http"
        };

        Self {
            base_url: format!("{scheme}://{host_port}"),
            username,
            password,
            timeout_seconds,
        }
    }

    /// Whether basic-auth should be attached
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }

    /// Request deadline, `None` when disabled
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Holds the active connection target
///
/// Starts out empty; `configure` replaces the state wholesale.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    state: Option<ConnectionState>,
}

impl ConnectionRegistry {
    /// Create an unconfigured registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that is already configured
    #[must_use]
    pub fn configured(
        host_port: &str,
        username: &str,
        password: &str,
        timeout_seconds: u64,
    ) -> Self {
        let mut registry = Self::new();
        registry.configure(host_port, username, password, timeout_seconds);
        registry
    }

    /// Set the connection target
    pub fn configure(
        &mut self,
        host_port: &str,
        username: &str,
        password: &str,
        timeout_seconds: u64,
    ) {
        self.state = Some(ConnectionState::new(
            host_port,
            username,
            password,
            timeout_seconds,
        ));
    }

    /// Copy of the current state
    ///
    /// # Errors
    /// Returns [`ClientError::NotConfigured`] if `configure` was never called.
    pub fn current(&self) -> Result<ConnectionState> {
        self.state.clone().ok_or(ClientError::NotConfigured)
    }

    /// Whether `configure` has been called
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.state.is_some()
    }
}

/// Client configuration loaded from `anylog.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Node connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// `[connection]` table of the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Node REST address as `ip:port`
    pub host: Option<String>,
    /// Basic-auth user
    #[serde(default)]
    pub user: String,
    /// Basic-auth password
    #[serde(default)]
    pub password: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: String::new(),
            password: String::new(),
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "error".to_string()
}

impl ClientConfig {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ClientError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ClientError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config file to use when none is given explicitly
    ///
    /// `ANYLOG_CONFIG` if set, otherwise the first existing of
    /// `./anylog.toml` and `<config dir>/anylog/anylog.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("ANYLOG_CONFIG") {
            return Some(PathBuf::from(path));
        }

        let mut paths = vec![PathBuf::from("anylog.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("anylog/anylog.toml"));
        }
        paths.into_iter().find(|path| path.exists())
    }

    /// Load from the default locations, if any exists
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_default() -> Result<Option<Self>> {
        Self::default_path()
            .map(|path| Self::load(&path))
            .transpose()
    }
}

//! Connection settings merged from flags and config file

use anylog_client::ClientConfig;
use anylog_client::config::DEFAULT_TIMEOUT_SECS;
use eyre::{Result, eyre};

/// Flag values that override the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub conn: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<u64>,
}

/// Final connection settings passed to `configure`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub conn: String,
    pub user: String,
    pub password: String,
    pub timeout: u64,
}

impl Settings {
    /// Merge flags over the config file
    ///
    /// # Errors
    /// Returns an error if neither source names the node.
    pub fn resolve(overrides: Overrides, file: Option<&ClientConfig>) -> Result<Self> {
        let connection = file.map(|config| &config.connection);

        let conn = overrides
            .conn
            .or_else(|| connection.and_then(|c| c.host.clone()))
            .ok_or_else(|| {
                eyre!("no node address: pass --conn or set connection.host in anylog.toml")
            })?;

        Ok(Self {
            conn,
            user: overrides
                .user
                .or_else(|| connection.map(|c| c.user.clone()))
                .unwrap_or_default(),
            password: overrides
                .password
                .or_else(|| connection.map(|c| c.password.clone()))
                .unwrap_or_default(),
            timeout: overrides
                .timeout
                .or_else(|| connection.map(|c| c.timeout))
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

#[cfg(test)]
mod tests {
    use anylog_client::ConnectionConfig;

    use super::*;

    fn file_config() -> ClientConfig {
        ClientConfig {
            connection: ConnectionConfig {
                host: Some("10.0.0.1:32049".to_string()),
                user: "admin".to_string(),
                password: "secret".to_string(),
                timeout: 10,
            },
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_flags_only() {
        let settings = Settings::resolve(
            Overrides {
                conn: Some("127.0.0.1:32049".to_string()),
                ..Overrides::default()
            },
            None,
        )
        .unwrap();

        assert_eq!(settings.conn, "127.0.0.1:32049");
        assert!(settings.user.is_empty());
        assert!(settings.password.is_empty());
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_file_only() {
        let settings = Settings::resolve(Overrides::default(), Some(&file_config())).unwrap();
        assert_eq!(settings.conn, "10.0.0.1:32049");
        assert_eq!(settings.user, "admin");
        assert_eq!(settings.timeout, 10);
    }

    #[test]
    fn test_flags_win_over_file() {
        let settings = Settings::resolve(
            Overrides {
                conn: Some("127.0.0.1:2049".to_string()),
                timeout: Some(3),
                ..Overrides::default()
            },
            Some(&file_config()),
        )
        .unwrap();

        assert_eq!(settings.conn, "127.0.0.1:2049");
        assert_eq!(settings.user, "admin");
        assert_eq!(settings.timeout, 3);
    }

    #[test]
    fn test_missing_address_is_an_error() {
        assert!(Settings::resolve(Overrides::default(), None).is_err());
        assert!(Settings::resolve(Overrides::default(), Some(&ClientConfig::default())).is_err());
    }
}

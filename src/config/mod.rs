//! Configuration management
//!
//! This module handles loading and parsing configuration for the Ladle recipe catalog.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/ladle.db".to_string()
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session lifetime in minutes. Zero means sessions never expire.
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: default_session_ttl_minutes(),
        }
    }
}

fn default_session_ttl_minutes() -> u64 {
    10080 // 7 days
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        // Handle empty file - return defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - LADLE_SERVER_HOST
    /// - LADLE_SERVER_PORT
    /// - LADLE_SERVER_CORS_ORIGIN
    /// - LADLE_DATABASE_URL
    /// - LADLE_AUTH_SESSION_TTL_MINUTES
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("LADLE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("LADLE_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("LADLE_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(url) = std::env::var("LADLE_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(ttl) = std::env::var("LADLE_AUTH_SESSION_TTL_MINUTES") {
            if let Ok(ttl) = ttl.parse::<u64>() {
                self.auth.session_ttl_minutes = ttl;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
// Both `tests` and `property_tests` modules use this to prevent race conditions.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
fn clear_ladle_env() {
    std::env::remove_var("LADLE_SERVER_HOST");
    std::env::remove_var("LADLE_SERVER_PORT");
    std::env::remove_var("LADLE_SERVER_CORS_ORIGIN");
    std::env::remove_var("LADLE_DATABASE_URL");
    std::env::remove_var("LADLE_AUTH_SESSION_TTL_MINUTES");
}


/// Property-based tests for configuration parsing
#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Strategy for generating valid host strings
    fn valid_host_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u8..=255, 0u8..=255, 0u8..=255, 0u8..=255)
                .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d)),
            Just("localhost".to_string()),
            Just("0.0.0.0".to_string()),
            Just("127.0.0.1".to_string()),
            "[a-z][a-z0-9]{0,10}".prop_map(|s| s),
        ]
    }

    /// Strategy for generating valid port numbers
    fn valid_port_strategy() -> impl Strategy<Value = u16> {
        1u16..=65535
    }

    /// Strategy for generating valid CORS origins
    fn valid_cors_origin_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("http://localhost:5173".to_string()),
            Just("http://localhost:3000".to_string()),
            Just("https://recipes.example.com".to_string()),
            "[a-z]{3,10}".prop_map(|s| format!("https://{}.example.com", s)),
        ]
    }

    /// Strategy for generating valid database URLs
    fn valid_database_url_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z][a-z0-9_/]{0,20}\\.db".prop_map(|s| s),
            Just("data/ladle.db".to_string()),
            Just(":memory:".to_string()),
        ]
    }

    /// Strategy for generating valid session TTLs, including the
    /// zero value that disables expiry
    fn valid_ttl_strategy() -> impl Strategy<Value = u64> {
        prop_oneof![Just(0u64), 1u64..=525600]
    }

    /// Strategy for generating valid Config structures
    fn valid_config_strategy() -> impl Strategy<Value = Config> {
        (
            valid_host_strategy(),
            valid_port_strategy(),
            valid_cors_origin_strategy(),
            valid_database_url_strategy(),
            valid_ttl_strategy(),
        )
            .prop_map(|(host, port, cors_origin, url, session_ttl_minutes)| Config {
                server: ServerConfig {
                    host,
                    port,
                    cors_origin,
                },
                database: DatabaseConfig { url },
                auth: AuthConfig {
                    session_ttl_minutes,
                },
            })
    }

    /// Strategy for generating malformed YAML strings that will fail to parse as Config
    ///
    /// These are YAML strings that are either:
    /// 1. Syntactically invalid YAML
    /// 2. Valid YAML but with wrong types for Config fields
    fn malformed_yaml_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("server:\n  port: not_a_number".to_string()),
            Just("server:\n  port: true".to_string()),
            Just("server:\n  port: [1, 2, 3]".to_string()),
            Just("server:\n  port: {key: value}".to_string()),
            Just("server:\n  port: 99999999999999999999".to_string()),
            Just("auth:\n  session_ttl_minutes: invalid".to_string()),
            Just("auth:\n  session_ttl_minutes: false".to_string()),
            Just("auth:\n  session_ttl_minutes: -100".to_string()),
            Just("server: [invalid, list, for, server]".to_string()),
            Just("server: 12345".to_string()),
            Just("database: \"just_a_string\"".to_string()),
            Just("auth: true".to_string()),
        ]
    }

    /// Strategy for generating partial config YAML (missing some fields)
    fn partial_config_yaml_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (valid_host_strategy(), valid_port_strategy()).prop_map(|(host, port)| format!(
                "server:\n  host: \"{}\"\n  port: {}\n",
                host, port
            )),
            Just("database:\n  url: \"test.db\"\n".to_string()),
            Just("auth:\n  session_ttl_minutes: 1800\n".to_string()),
            Just("server:\n  port: 9000\n".to_string()),
            Just("".to_string()),
            Just("   \n\n   ".to_string()),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// For any valid config structure, serializing to YAML and parsing back
        /// should yield equivalent config.
        #[test]
        fn property_config_roundtrip(config in valid_config_strategy()) {
            let yaml = serde_yaml::to_string(&config).expect("Failed to serialize config");

            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let parsed = Config::load(file.path()).expect("Failed to parse config");

            prop_assert_eq!(config.server.host, parsed.server.host);
            prop_assert_eq!(config.server.port, parsed.server.port);
            prop_assert_eq!(config.server.cors_origin, parsed.server.cors_origin);
            prop_assert_eq!(config.database.url, parsed.database.url);
            prop_assert_eq!(config.auth.session_ttl_minutes, parsed.auth.session_ttl_minutes);
        }

        /// For any config file missing optional items, parsing should fill
        /// with predefined defaults.
        #[test]
        fn property_config_default_filling(yaml in partial_config_yaml_strategy()) {
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let config = Config::load(file.path()).expect("Failed to parse config");

            prop_assert!(!config.server.host.is_empty(), "Host should not be empty");
            prop_assert!(config.server.port > 0, "Port should be positive");
            prop_assert!(!config.database.url.is_empty(), "Database URL should not be empty");
            prop_assert!(!config.server.cors_origin.is_empty(), "CORS origin should not be empty");

            // If the YAML was empty or whitespace-only, verify all defaults
            if yaml.trim().is_empty() {
                prop_assert_eq!(config.server.host, "0.0.0.0");
                prop_assert_eq!(config.server.port, 8080);
                prop_assert_eq!(config.server.cors_origin, "http://localhost:5173");
                prop_assert_eq!(config.database.url, "data/ladle.db");
                prop_assert_eq!(config.auth.session_ttl_minutes, 10080);
            }
        }

        /// For any malformed config file, parsing should return a detailed error.
        #[test]
        fn property_invalid_config_error_handling(yaml in malformed_yaml_strategy()) {
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let result = Config::load(file.path());

            prop_assert!(result.is_err(), "Malformed YAML should produce an error");

            let err = result.unwrap_err();
            let err_msg = err.to_string();
            prop_assert!(
                err_msg.len() > 10,
                "Error message should be descriptive: {}",
                err_msg
            );
        }

        /// For any config item, setting the corresponding env var should
        /// override the file value.
        #[test]
        fn property_env_precedence_over_file(
            file_port in 1000u16..2000,
            env_port in 3000u16..4000,
        ) {
            let _guard = lock_env();
            super::clear_ladle_env();

            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "server:\n  port: {}\n", file_port).expect("Failed to write config");

            std::env::set_var("LADLE_SERVER_PORT", env_port.to_string());

            let config = Config::load_with_env(file.path()).expect("Failed to load config");

            prop_assert_eq!(config.server.port, env_port);
            prop_assert_ne!(config.server.port, file_port);

            super::clear_ladle_env();
        }
    }
}

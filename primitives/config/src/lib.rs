#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! bitcoind-rpc Configuration
//!
//! This crate provides configuration management for `bitcoind-rpc`.
//! It handles loading, saving, and managing configuration files that specify:
//! - The daemon endpoint and its credentials
//! - The per-call timeout and an optional default wallet
//! - Logging configuration
//!
//! Configuration is stored in TOML format and can be loaded from files or created
//! with defaults that point at a local regtest node. Connection settings can
//! be overridden from `RPC_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use transport::{Auth, TransportConfig};

/// Default regtest RPC endpoint.
pub const DEFAULT_URL: &str = "http://127.0.0.1:18443";

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// An environment override could not be parsed
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// The rejected value
        value: String,
    },
}

/// Type alias for configuration results.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Daemon connection settings
    pub rpc: RpcConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Daemon connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Base endpoint URL, e.g. `http://127.0.0.1:18443`
    pub url: String,
    /// RPC username
    pub user: Option<String>,
    /// RPC password
    pub password: Option<String>,
    /// Path to the daemon's `.cookie` file; takes precedence over user/password
    pub cookie_file: Option<PathBuf>,
    /// Per-call timeout in seconds; `0` disables the timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Wallet that wallet-scoped calls are routed to by default
    pub wallet: Option<String>,
}

fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path (optional)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/bitcoind-rpc/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("bitcoind-rpc");
        Ok(config_dir.join("config.toml"))
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user: None,
            password: None,
            cookie_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            wallet: None,
        }
    }
}

impl RpcConfig {
    /// Overrides settings from the process environment.
    ///
    /// Reads `RPC_URL`, `RPC_USER`, `RPC_PASS`, `RPC_COOKIE`, `RPC_TIMEOUT`
    /// (seconds) and `RPC_WALLET`. Unset variables leave the current value.
    pub fn apply_env(&mut self) -> Result<()> { self.apply_env_from(|key| std::env::var(key).ok()) }

    /// Internal function for testing - allows injection of environment values
    fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = var("RPC_URL") {
            self.url = url;
        }
        if let Some(user) = var("RPC_USER") {
            self.user = Some(user);
        }
        if let Some(password) = var("RPC_PASS") {
            self.password = Some(password);
        }
        if let Some(cookie) = var("RPC_COOKIE") {
            self.cookie_file = Some(PathBuf::from(cookie));
        }
        if let Some(timeout) = var("RPC_TIMEOUT") {
            self.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "RPC_TIMEOUT", value: timeout })?;
        }
        if let Some(wallet) = var("RPC_WALLET") {
            self.wallet = Some(wallet);
        }
        Ok(())
    }

    /// Per-call timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Authentication to use: the cookie file if set, else user/password, else none.
    pub fn auth(&self) -> Auth {
        match (&self.cookie_file, &self.user) {
            (Some(cookie), _) => Auth::CookieFile(cookie.clone()),
            (None, Some(user)) => Auth::basic(user, self.password.clone().unwrap_or_default()),
            (None, None) => Auth::None,
        }
    }

    /// Builds the transport configuration for these settings.
    pub fn transport_config(&self) -> TransportConfig {
        let config = TransportConfig::new(&self.url).with_auth(self.auth());
        match self.timeout() {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_file() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let toml_content = r#"
            [rpc]
            url = "http://127.0.0.1:18443"
            user = "rpcuser"
            password = "rpcpassword"
            timeout_secs = 15
            wallet = "alice"

            [logging]
            level = "debug"
            file = "debug.log"
        "#;
        fs::write(&temp_file, toml_content)
            .expect("Failed to write TOML content to temporary file");

        let loaded = Config::from_file(&temp_file).expect("Failed to load config");
        assert_eq!(loaded.rpc.url, "http://127.0.0.1:18443");
        assert_eq!(loaded.rpc.user.as_deref(), Some("rpcuser"));
        assert_eq!(loaded.rpc.password.as_deref(), Some("rpcpassword"));
        assert_eq!(loaded.rpc.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(loaded.rpc.wallet.as_deref(), Some("alice"));
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.logging.file, Some(PathBuf::from("debug.log")));

        // Minimal file: only the endpoint
        let temp_file2 = NamedTempFile::new().expect("Failed to create second temporary file");
        fs::write(&temp_file2, "[rpc]\nurl = \"http://node:8332\"\n")
            .expect("Failed to write minimal config");

        let minimal = Config::from_file(&temp_file2).expect("Failed to load minimal config");
        assert_eq!(minimal.rpc.url, "http://node:8332");
        assert_eq!(minimal.rpc.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(minimal.rpc.cookie_file, None);
        assert_eq!(minimal.logging, LoggingConfig::default());

        let result = Config::from_file("nonexistent_file.toml");
        match result.expect_err("Expected error for nonexistent file") {
            ConfigError::FileRead(_) => {}
            other => panic!("Expected FileRead error, got {:?}", other),
        }

        let temp_file3 = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&temp_file3, "invalid toml content").expect("Failed to write invalid TOML");
        match Config::from_file(&temp_file3).expect_err("Expected parse error for invalid TOML") {
            ConfigError::Parse(_) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_save() {
        let mut config = Config::default();
        config.rpc.cookie_file = Some(PathBuf::from("/var/lib/bitcoind/regtest/.cookie"));
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        config.save(&temp_file).expect("Failed to save config");
        let contents = fs::read_to_string(&temp_file).expect("Failed to read saved config file");
        assert!(contents.contains("http://127.0.0.1:18443"));
        assert!(contents.contains(".cookie"));

        let reloaded = Config::from_file(&temp_file).expect("Failed to reload saved config");
        assert_eq!(reloaded, config);

        let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let missing_dir = temp_dir.path().join("nonexistent").join("config.toml");
        match config.save(&missing_dir).expect_err("Expected write error") {
            ConfigError::FileRead(_) => (),
            other => panic!("Expected FileRead error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_path() {
        let path = Config::default_path().expect("Failed to get default config path");
        let path_str = path.to_str().expect("Path should be valid UTF-8");
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("bitcoind-rpc"));
    }

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.rpc.url, DEFAULT_URL);
        assert_eq!(config.rpc.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.rpc.wallet, None);
        assert_eq!(config.rpc.auth(), Auth::None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_apply_env() {
        let mut rpc = RpcConfig::default();
        rpc.apply_env_from(env(&[
            ("RPC_URL", "http://10.0.0.2:18443"),
            ("RPC_USER", "alice"),
            ("RPC_PASS", "secret"),
            ("RPC_TIMEOUT", "0"),
            ("RPC_WALLET", "hot"),
        ]))
        .expect("apply env");

        assert_eq!(rpc.url, "http://10.0.0.2:18443");
        assert_eq!(rpc.auth(), Auth::basic("alice", "secret"));
        assert_eq!(rpc.timeout(), None);
        assert_eq!(rpc.wallet.as_deref(), Some("hot"));

        // Untouched when nothing is set
        let mut untouched = RpcConfig::default();
        untouched.apply_env_from(env(&[])).expect("apply empty env");
        assert_eq!(untouched, RpcConfig::default());

        let mut bad = RpcConfig::default();
        match bad.apply_env_from(env(&[("RPC_TIMEOUT", "soon")])).expect_err("bad timeout") {
            ConfigError::InvalidValue { key, value } => {
                assert_eq!(key, "RPC_TIMEOUT");
                assert_eq!(value, "soon");
            }
            other => panic!("Expected InvalidValue error, got {:?}", other),
        }
    }

    #[test]
    fn test_cookie_takes_precedence() {
        let rpc = RpcConfig {
            user: Some("alice".to_string()),
            password: Some("secret".to_string()),
            cookie_file: Some(PathBuf::from("/tmp/.cookie")),
            ..RpcConfig::default()
        };
        assert_eq!(rpc.auth(), Auth::CookieFile(PathBuf::from("/tmp/.cookie")));

        let transport = rpc.transport_config();
        assert_eq!(transport.endpoint, DEFAULT_URL);
        assert_eq!(transport.timeout, Some(Duration::from_secs(30)));
        assert_eq!(transport.auth, Auth::CookieFile(PathBuf::from("/tmp/.cookie")));
    }
}

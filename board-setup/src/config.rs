//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::darwin::{DEFAULT_BASE_URL, DarwinConfig};

/// Default directory for the token and entry files.
const DEFAULT_DATA_DIR: &str = ".board-setup";

/// Default request timeout for Darwin, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {var}: {value:?} ({reason})")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

/// Configuration for the setup server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,
    /// Directory holding the token store and entry store files.
    pub data_dir: PathBuf,
    /// Darwin API base URL.
    pub darwin_base_url: String,
    /// Darwin request timeout in seconds.
    pub timeout_secs: u64,
    /// Serve from the built-in mock rail client instead of Darwin.
    pub mock: bool,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("BOARD_SETUP_ADDR") {
            config.addr = value.parse().map_err(|e: std::net::AddrParseError| ConfigError {
                var: "BOARD_SETUP_ADDR",
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Some(value) = lookup("BOARD_SETUP_DATA_DIR") {
            config.data_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("DARWIN_BASE_URL") {
            config.darwin_base_url = value;
        }

        if let Some(value) = lookup("DARWIN_TIMEOUT_SECS") {
            config.timeout_secs = value.parse().map_err(|e: std::num::ParseIntError| ConfigError {
                var: "DARWIN_TIMEOUT_SECS",
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Some(value) = lookup("BOARD_SETUP_MOCK") {
            config.mock = parse_flag("BOARD_SETUP_MOCK", &value)?;
        }

        Ok(config)
    }

    /// Set the listen address.
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Use the mock rail client.
    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    /// Path of the entries file.
    pub fn entries_path(&self) -> PathBuf {
        self.data_dir.join("entries.json")
    }

    /// Darwin client configuration.
    pub fn darwin(&self) -> DarwinConfig {
        DarwinConfig::default()
            .with_base_url(&self.darwin_base_url)
            .with_timeout(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            darwin_base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mock: false,
        }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError {
            var,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.darwin_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.mock);
        assert_eq!(
            config.entries_path(),
            PathBuf::from(DEFAULT_DATA_DIR).join("entries.json")
        );
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BOARD_SETUP_ADDR", "0.0.0.0:8080"),
            ("BOARD_SETUP_DATA_DIR", "/var/lib/board"),
            ("DARWIN_BASE_URL", "http://localhost:9000"),
            ("DARWIN_TIMEOUT_SECS", "5"),
            ("BOARD_SETUP_MOCK", "true"),
        ]))
        .unwrap();

        assert_eq!(config.addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/board"));
        assert!(config.mock);

        let darwin = config.darwin();
        assert_eq!(darwin.base_url, "http://localhost:9000");
        assert_eq!(darwin.timeout_secs, 5);
    }

    #[test]
    fn invalid_values_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("BOARD_SETUP_ADDR", "nowhere")])).unwrap_err();
        assert!(err.to_string().contains("BOARD_SETUP_ADDR"));

        assert!(ServerConfig::from_lookup(lookup(&[("DARWIN_TIMEOUT_SECS", "soon")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("BOARD_SETUP_MOCK", "maybe")])).is_err());
    }

    #[test]
    fn builder() {
        let config = ServerConfig::default()
            .with_data_dir("/tmp/x")
            .with_mock(true)
            .with_addr(SocketAddr::from(([0, 0, 0, 0], 1234)));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
        assert!(config.mock);
        assert_eq!(config.addr.port(), 1234);
    }
}

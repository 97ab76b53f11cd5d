// Configuration module
// Loads server settings from config.toml and SERVER_-prefixed environment variables

use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;

use crate::error::StartupError;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// TLS material, required only when an https prefix is configured
    pub tls: Option<TlsConfig>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Listen prefixes, e.g. `http://127.0.0.1:8083/` or `https://127.0.0.1:8090/`
    pub prefixes: Vec<String>,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

/// Paths to PEM files backing the trust-verified prefixes
#[derive(Debug, Deserialize, Clone)]
pub struct TlsConfig {
    pub certificate: String,
    pub private_key: String,
    /// Trust anchors that presented client certificates must chain to
    pub client_ca: String,
}

/// Scheme of a listen prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

/// A parsed listen prefix: scheme plus socket address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenPrefix {
    pub scheme: Scheme,
    pub addr: SocketAddr,
}

impl ListenPrefix {
    /// Parse a prefix string such as `http://127.0.0.1:8083/`
    pub fn parse(prefix: &str) -> Result<Self, StartupError> {
        let (scheme, rest) = if let Some(rest) = prefix.strip_prefix("http://") {
            (Scheme::Http, rest)
        } else if let Some(rest) = prefix.strip_prefix("https://") {
            (Scheme::Https, rest)
        } else {
            return Err(StartupError::InvalidPrefix {
                prefix: prefix.to_string(),
                reason: "scheme must be http:// or https://".to_string(),
            });
        };

        let authority = rest.trim_end_matches('/');
        let addr = authority
            .parse()
            .map_err(|e| StartupError::InvalidPrefix {
                prefix: prefix.to_string(),
                reason: format!("invalid address: {e}"),
            })?;

        Ok(Self { scheme, addr })
    }
}

impl Config {
    /// Load configuration from the default "config.toml" location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.prefixes", vec!["http://127.0.0.1:8083/".to_string()])?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    /// Parse every configured prefix, failing on the first invalid one
    pub fn listen_prefixes(&self) -> Result<Vec<ListenPrefix>, StartupError> {
        self.server
            .prefixes
            .iter()
            .map(|p| ListenPrefix::parse(p))
            .collect()
    }
}

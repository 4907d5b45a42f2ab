//! Spotlight client configuration
//!
//! Handles configuration from environment variables and TOML files,
//! with defaults matching a local Spotlight server.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpotlightConfig {
    /// Where the Spotlight REST API lives
    pub endpoint: EndpointConfig,

    /// Default annotation parameters
    pub defaults: RequestDefaults,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl SpotlightConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overwrite every field whose environment variable is set
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = lookup("SPOTLIGHT_URL") {
            self.endpoint.base_url = url;
        }

        if let Some(confidence) = lookup("SPOTLIGHT_CONFIDENCE") {
            self.defaults.confidence = parse_env("SPOTLIGHT_CONFIDENCE", confidence)?;
        }
        if let Some(support) = lookup("SPOTLIGHT_SUPPORT") {
            self.defaults.support = parse_env("SPOTLIGHT_SUPPORT", support)?;
        }
        if let Some(spotter) = lookup("SPOTLIGHT_SPOTTER") {
            self.defaults.spotter = spotter;
        }
        if let Some(disambiguator) = lookup("SPOTLIGHT_DISAMBIGUATOR") {
            self.defaults.disambiguator = disambiguator;
        }
        if let Some(policy) = lookup("SPOTLIGHT_POLICY") {
            self.defaults.policy = policy;
        }

        if let Some(timeout) = lookup("SPOTLIGHT_TIMEOUT_SECS") {
            self.http.timeout_secs = parse_env("SPOTLIGHT_TIMEOUT_SECS", timeout)?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    /// Reject values that can never produce a working request
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired("endpoint.base_url".to_string()));
        }
        if !self.defaults.confidence.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "defaults.confidence".to_string(),
                value: self.defaults.confidence.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Spotlight REST endpoint location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the REST API, including the scheme
    pub base_url: String,
}

impl EndpointConfig {
    pub fn annotate_url(&self) -> String {
        format!("{}/annotate", self.base_url.trim_end_matches('/'))
    }

    pub fn candidates_url(&self) -> String {
        format!("{}/candidates", self.base_url.trim_end_matches('/'))
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:2222/rest".to_string(),
        }
    }
}

/// Default annotation parameters sent with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    /// Minimum disambiguation confidence
    pub confidence: f64,

    /// Minimum prominence (support) of a resource
    pub support: u32,

    /// Spotter available on the server
    pub spotter: String,

    /// Disambiguator available on the server
    pub disambiguator: String,

    /// Filter policy (`whitelist` or `blacklist`)
    pub policy: String,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            confidence: 0.0,
            support: 0,
            spotter: "LingPipeSpotter".to_string(),
            disambiguator: "Default".to_string(),
            policy: "whitelist".to_string(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds (0 disables the timeout)
    pub timeout_secs: u64,

    /// User-Agent header value
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("spotlight-rs/{}", crate::VERSION),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

//! Spotlight Core - Error types, configuration and transport seam
//!
//! This crate defines the shared pieces used by the Spotlight client:
//! - Error taxonomy (configuration, transport, domain)
//! - The blocking HTTP transport trait and its response type
//! - Configuration management (TOML file + environment)
//! - Tracing subscriber setup

pub mod config;
pub mod telemetry;

pub use config::{
    ConfigError, EndpointConfig, HttpConfig, LoggingConfig, RequestDefaults, SpotlightConfig,
};
pub use telemetry::init_tracing;

use std::collections::BTreeMap;
use thiserror::Error;

/// Crate version, kept in step with the Spotlight release it was tested against
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while talking to a Spotlight server
#[derive(Error, Debug)]
pub enum SpotlightError {
    /// Caller-side misconfiguration, detected before any network call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The server answered with a client or server error status
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// The request could not be sent or the response could not be read
    #[error("Request failed: {0}")]
    Request(String),

    /// The response body was not valid JSON
    #[error("Spotlight's response did not contain valid JSON: {body}")]
    InvalidJson { body: String },

    /// A required top-level key was absent from the response
    #[error("No {key} found in spotlight response: {payload}")]
    MissingKey { key: String, payload: String },

    /// The response had the expected keys but not the expected shape
    #[error("Unexpected spotlight response shape: {0}")]
    UnexpectedShape(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of [`SpotlightError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Domain,
    Other,
}

impl SpotlightError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Http { .. } | Self::Request(_) => ErrorKind::Transport,
            Self::InvalidJson { .. } | Self::MissingKey { .. } | Self::UnexpectedShape(_) => {
                ErrorKind::Domain
            }
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// True for errors raised by the service or the network
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// True for errors about the content of a response
    pub fn is_domain(&self) -> bool {
        self.kind() == ErrorKind::Domain
    }

    /// HTTP status for [`SpotlightError::Http`]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ConfigError> for SpotlightError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpotlightError>;

// ============================================================================
// Transport
// ============================================================================

/// Raw HTTP outcome handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 4xx and 5xx statuses
    pub fn is_error_status(&self) -> bool {
        (400..600).contains(&self.status)
    }
}

/// Blocking transport used to POST a form to the annotation service
///
/// Implementations report connection failures as
/// [`SpotlightError::Request`] and return every received response,
/// whatever its status; status checks happen in the caller.
pub trait HttpTransport: Send + Sync {
    fn post_form(
        &self,
        address: &str,
        form: &[(String, String)],
        headers: &BTreeMap<String, String>,
    ) -> Result<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn post_form(
        &self,
        address: &str,
        form: &[(String, String)],
        headers: &BTreeMap<String, String>,
    ) -> Result<HttpResponse> {
        (**self).post_form(address, form, headers)
    }
}

// ============================================================================
// Tests
// ============================================================================

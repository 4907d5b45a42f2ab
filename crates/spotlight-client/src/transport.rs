//! Blocking HTTP transport backed by reqwest

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use spotlight_core::{HttpConfig, HttpResponse, HttpTransport, Result, SpotlightError};

/// Default transport: one blocking POST per call, no retries
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with default HTTP settings
    pub fn new() -> Result<Self> {
        Self::from_config(&HttpConfig::default())
    }

    /// Create from config
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        builder = if config.timeout_secs > 0 {
            builder.timeout(Duration::from_secs(config.timeout_secs))
        } else {
            builder.timeout(None)
        };

        let client = builder
            .build()
            .map_err(|e| SpotlightError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SpotlightError::Configuration(format!("Invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            SpotlightError::Configuration(format!("Invalid value for header {name}: {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

impl HttpTransport for ReqwestTransport {
    fn post_form(
        &self,
        address: &str,
        form: &[(String, String)],
        headers: &BTreeMap<String, String>,
    ) -> Result<HttpResponse> {
        let headers = header_map(headers)?;

        let response = self
            .client
            .post(address)
            .headers(headers)
            .form(form)
            .send()
            .map_err(|e| SpotlightError::Request(format!("POST {address} failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| SpotlightError::Request(format!("Failed to read response body: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new().is_ok());

        let config = HttpConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(ReqwestTransport::from_config(&config).is_ok());
    }

    #[test]
    fn test_header_map() {
        let headers = BTreeMap::from([
            ("accept".to_string(), "application/json".to_string()),
            ("x-trace".to_string(), "abc".to_string()),
        ]);
        let map = header_map(&headers).unwrap();
        assert_eq!(map.get("Accept").unwrap(), "application/json");
        assert_eq!(map.get("X-Trace").unwrap(), "abc");
    }

    #[test]
    fn test_invalid_header_is_configuration_error() {
        let headers = BTreeMap::from([("bad header".to_string(), "x".to_string())]);
        let err = header_map(&headers).unwrap_err();
        assert!(matches!(err, SpotlightError::Configuration(_)));

        let headers = BTreeMap::from([("x-ok".to_string(), "line\nbreak".to_string())]);
        assert!(header_map(&headers).is_err());
    }
}

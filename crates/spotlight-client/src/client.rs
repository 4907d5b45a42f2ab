//! Spotlight REST client
//!
//! Submits annotation requests and shapes the two known response
//! families into sequences of cleaned maps:
//! - `annotate`: `{"Resources": [...]}`
//! - `candidates`: `{"annotation": {"surfaceForm": {...} | [...]}}`

use serde_json::{Map, Value};
use spotlight_core::{HttpTransport, Result, SpotlightConfig, SpotlightError};

use crate::normalize::clean_map;
use crate::request::{validate_address, SpotlightRequest};
use crate::transport::ReqwestTransport;

/// A cleaned resource or surface form
pub type CleanMap = Map<String, Value>;

/// Client over a blocking [`HttpTransport`]
///
/// Holds no per-call state; one instance can serve any number of
/// independent calls, from any thread.
pub struct SpotlightClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    config: SpotlightConfig,
}

impl SpotlightClient<ReqwestTransport> {
    /// Client with default configuration
    pub fn new() -> Result<Self> {
        Self::from_config(SpotlightConfig::default())
    }

    /// Create from config
    pub fn from_config(config: SpotlightConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(&config.http)?;
        Ok(Self { transport, config })
    }
}

impl<T: HttpTransport> SpotlightClient<T> {
    /// Client over a custom transport
    pub fn with_transport(transport: T, config: SpotlightConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &SpotlightConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST the request and parse the body as JSON.
    ///
    /// Fails with a configuration error before any network call when the
    /// address has no protocol, with a transport error on 4xx/5xx, and
    /// with a domain error when the body is not JSON.
    pub fn submit(&self, address: &str, request: &SpotlightRequest) -> Result<Value> {
        validate_address(address)?;

        tracing::debug!(
            address,
            spotter = %request.spotter,
            disambiguator = %request.disambiguator,
            text_len = request.text.len(),
            "Submitting spotlight request"
        );

        let response =
            self.transport
                .post_form(address, &request.form(), &request.merged_headers())?;

        if response.is_error_status() {
            tracing::warn!(address, status = response.status, "Spotlight returned an error status");
            return Err(SpotlightError::Http {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            tracing::warn!(address, error = %e, "Spotlight response is not valid JSON");
            SpotlightError::InvalidJson {
                body: response.body,
            }
        })
    }

    /// Annotate a text, returning one cleaned map per resource
    pub fn annotate(&self, address: &str, request: &SpotlightRequest) -> Result<Vec<CleanMap>> {
        let payload = self.submit(address, request)?;
        let resources = annotate_response(&payload)?;
        tracing::debug!(count = resources.len(), "Annotation resources received");
        Ok(resources)
    }

    /// Spot candidate surface forms, always returned as a sequence
    pub fn candidates(&self, address: &str, request: &SpotlightRequest) -> Result<Vec<CleanMap>> {
        let payload = self.submit(address, request)?;
        let forms = candidates_response(&payload)?;
        tracing::debug!(count = forms.len(), "Candidate surface forms received");
        Ok(forms)
    }

    /// Annotate against the configured endpoint with the configured defaults
    pub fn annotate_text(&self, text: &str) -> Result<Vec<CleanMap>> {
        let request = SpotlightRequest::from_defaults(text, &self.config.defaults);
        self.annotate(&self.config.endpoint.annotate_url(), &request)
    }

    /// Candidates against the configured endpoint with the configured defaults
    pub fn candidates_text(&self, text: &str) -> Result<Vec<CleanMap>> {
        let request = SpotlightRequest::from_defaults(text, &self.config.defaults);
        self.candidates(&self.config.endpoint.candidates_url(), &request)
    }
}

/// Annotate with a default transport
pub fn annotate(address: &str, request: &SpotlightRequest) -> Result<Vec<CleanMap>> {
    // Reject the address before building an HTTP client
    validate_address(address)?;
    SpotlightClient::new()?.annotate(address, request)
}

/// Candidates with a default transport
pub fn candidates(address: &str, request: &SpotlightRequest) -> Result<Vec<CleanMap>> {
    validate_address(address)?;
    SpotlightClient::new()?.candidates(address, request)
}

// ============================================================================
// Response shaping
// ============================================================================

fn missing_key(key: &str, payload: &Value) -> SpotlightError {
    SpotlightError::MissingKey {
        key: key.to_string(),
        payload: payload.to_string(),
    }
}

fn clean_item(item: &Value, context: &str) -> Result<CleanMap> {
    item.as_object().map(clean_map).ok_or_else(|| {
        SpotlightError::UnexpectedShape(format!("{context} entry is not an object: {item}"))
    })
}

/// Clean a single map or every map of a sequence
fn clean_one_or_many(value: &Value, context: &str) -> Result<Vec<CleanMap>> {
    match value {
        Value::Array(items) => items.iter().map(|item| clean_item(item, context)).collect(),
        single => Ok(vec![clean_item(single, context)?]),
    }
}

/// Shape a parsed annotate response
pub fn annotate_response(payload: &Value) -> Result<Vec<CleanMap>> {
    let resources = payload
        .get("Resources")
        .ok_or_else(|| missing_key("Resources", payload))?;
    clean_one_or_many(resources, "Resources")
}

/// Shape a parsed candidates response
pub fn candidates_response(payload: &Value) -> Result<Vec<CleanMap>> {
    let annotation = payload
        .get("annotation")
        .ok_or_else(|| missing_key("annotation", payload))?;
    let surface_forms = annotation
        .get("surfaceForm")
        .ok_or_else(|| missing_key("surfaceForm", payload))?;
    clean_one_or_many(surface_forms, "surfaceForm")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_annotate_response() {
        let payload = json!({
            "@text": "Berlin",
            "Resources": [
                {"@URI": "http://dbpedia.org/resource/Berlin", "@support": "34001", "@offset": "0"}
            ]
        });
        let resources = annotate_response(&payload).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0]["URI"], json!("http://dbpedia.org/resource/Berlin"));
        assert_eq!(resources[0]["support"], json!(34001));
        assert_eq!(resources[0]["offset"], json!(0));
    }

    #[test]
    fn test_annotate_missing_resources() {
        let err = annotate_response(&json!({"Test": "Win"})).unwrap_err();
        assert!(err.is_domain());
        assert!(matches!(&err, SpotlightError::MissingKey { key, .. } if key == "Resources"));
        assert!(err.to_string().contains("Win"));
    }

    #[test]
    fn test_candidates_missing_keys() {
        let err = candidates_response(&json!({"Test": "Win"})).unwrap_err();
        assert!(matches!(&err, SpotlightError::MissingKey { key, .. } if key == "annotation"));

        let err = candidates_response(&json!({"annotation": {"Test": "Win"}})).unwrap_err();
        assert!(matches!(&err, SpotlightError::MissingKey { key, .. } if key == "surfaceForm"));
        assert!(err.to_string().contains("surfaceForm"));
    }

    #[test]
    fn test_candidates_single_and_many() {
        let single = json!({"annotation": {"surfaceForm": {"@name": "Berlin", "@offset": "0"}}});
        let forms = candidates_response(&single).unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0]["name"], json!("Berlin"));

        let many = json!({"annotation": {"surfaceForm": [
            {"@name": "Berlin", "@offset": "0"},
            {"@name": "Paris", "@offset": "11"}
        ]}});
        let forms = candidates_response(&many).unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[1]["offset"], json!(11));
    }

    #[test]
    fn test_unexpected_shape() {
        let err = annotate_response(&json!({"Resources": ["Berlin"]})).unwrap_err();
        assert!(matches!(err, SpotlightError::UnexpectedShape(_)));

        let err = candidates_response(&json!({"annotation": {"surfaceForm": "Berlin"}})).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_annotate_address_checked_first() {
        let err = annotate("localhost", &SpotlightRequest::new("x")).unwrap_err();
        assert!(matches!(err, SpotlightError::Configuration(_)));

        let err = candidates("localhost", &SpotlightRequest::new("x")).unwrap_err();
        assert!(matches!(err, SpotlightError::Configuration(_)));
    }
}

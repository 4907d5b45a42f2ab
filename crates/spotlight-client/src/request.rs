//! Annotation request parameters and their wire form

use std::collections::BTreeMap;

use spotlight_core::{RequestDefaults, Result, SpotlightError};

/// Filter applied when the caller supplies none
pub const DEFAULT_POLICY: &str = "whitelist";

/// Parameters of a single annotate/candidates call
///
/// `filters` and `headers` are `None` unless the caller set them; both
/// are merged over fresh defaults when the request is encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotlightRequest {
    pub text: String,
    pub confidence: f64,
    pub support: u32,
    pub spotter: String,
    pub disambiguator: String,
    pub filters: Option<BTreeMap<String, String>>,
    pub headers: Option<BTreeMap<String, String>>,
}

impl SpotlightRequest {
    /// Request with the stock Spotlight defaults
    pub fn new(text: impl Into<String>) -> Self {
        Self::from_defaults(text, &RequestDefaults::default())
    }

    /// Request seeded from configured defaults.
    ///
    /// A non-default configured policy becomes an explicit `policy` filter.
    pub fn from_defaults(text: impl Into<String>, defaults: &RequestDefaults) -> Self {
        let filters = (defaults.policy != DEFAULT_POLICY).then(|| {
            BTreeMap::from([("policy".to_string(), defaults.policy.clone())])
        });

        Self {
            text: text.into(),
            confidence: defaults.confidence,
            support: defaults.support,
            spotter: defaults.spotter.clone(),
            disambiguator: defaults.disambiguator.clone(),
            filters,
            headers: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_support(mut self, support: u32) -> Self {
        self.support = support;
        self
    }

    pub fn with_spotter(mut self, spotter: impl Into<String>) -> Self {
        self.spotter = spotter.into();
        self
    }

    pub fn with_disambiguator(mut self, disambiguator: impl Into<String>) -> Self {
        self.disambiguator = disambiguator.into();
        self
    }

    /// Add a filter such as `types`, `sparql` or `coreferenceResolution`
    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_filters(mut self, filters: BTreeMap<String, String>) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Filters after merging the caller's over `policy=whitelist`
    pub fn merged_filters(&self) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::from([("policy".to_string(), DEFAULT_POLICY.to_string())]);
        if let Some(filters) = &self.filters {
            merged.extend(filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Headers after merging the caller's over `accept: application/json`.
    ///
    /// Names compare case-insensitively, so a caller `Accept` replaces the
    /// default.
    pub fn merged_headers(&self) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::from([("accept".to_string(), "application/json".to_string())]);
        if let Some(headers) = &self.headers {
            for (name, value) in headers {
                merged.insert(name.to_ascii_lowercase(), value.clone());
            }
        }
        merged
    }

    /// Form fields posted to the service
    pub fn form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            ("text".to_string(), self.text.clone()),
            // Debug formatting keeps the decimal point ("0.0", not "0")
            ("confidence".to_string(), format!("{:?}", self.confidence)),
            ("support".to_string(), self.support.to_string()),
            ("spotter".to_string(), self.spotter.clone()),
            ("disambiguator".to_string(), self.disambiguator.clone()),
        ];
        form.extend(self.merged_filters());
        form
    }
}

/// Ensure the address names its protocol (`http://`, `https://`, ...)
pub fn validate_address(address: &str) -> Result<()> {
    if address.contains("://") {
        Ok(())
    } else {
        Err(SpotlightError::Configuration(format!(
            "Looks like you forgot the protocol (http/https) in your url ({address})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(form: &'a [(String, String)], name: &str) -> Option<&'a str> {
        form.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_request_defaults() {
        let request = SpotlightRequest::new("Berlin is a city.");
        assert_eq!(request.confidence, 0.0);
        assert_eq!(request.support, 0);
        assert_eq!(request.spotter, "LingPipeSpotter");
        assert_eq!(request.disambiguator, "Default");
        assert!(request.filters.is_none());
        assert!(request.headers.is_none());
    }

    #[test]
    fn test_form_fields() {
        let request = SpotlightRequest::new("Berlin")
            .with_confidence(0.4)
            .with_support(20)
            .with_spotter("Default")
            .with_disambiguator("Document")
            .with_filter("types", "DBpedia:Place");

        let form = request.form();
        assert_eq!(field(&form, "text"), Some("Berlin"));
        assert_eq!(field(&form, "confidence"), Some("0.4"));
        assert_eq!(field(&form, "support"), Some("20"));
        assert_eq!(field(&form, "spotter"), Some("Default"));
        assert_eq!(field(&form, "disambiguator"), Some("Document"));
        assert_eq!(field(&form, "policy"), Some("whitelist"));
        assert_eq!(field(&form, "types"), Some("DBpedia:Place"));
    }

    #[test]
    fn test_confidence_keeps_decimal_point() {
        let form = SpotlightRequest::new("x").form();
        assert_eq!(field(&form, "confidence"), Some("0.0"));

        let form = SpotlightRequest::new("x").with_confidence(1.0).form();
        assert_eq!(field(&form, "confidence"), Some("1.0"));
    }

    #[test]
    fn test_caller_filters_override_policy() {
        let request = SpotlightRequest::new("x").with_filter("policy", "blacklist");
        let merged = request.merged_filters();
        assert_eq!(merged.get("policy").map(String::as_str), Some("blacklist"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_empty_filters_equal_no_filters() {
        let none = SpotlightRequest::new("x");
        let empty = SpotlightRequest::new("x").with_filters(BTreeMap::new());
        assert_ne!(none.filters, empty.filters);
        assert_eq!(none.merged_filters(), empty.merged_filters());
    }

    #[test]
    fn test_header_merge() {
        let request = SpotlightRequest::new("x").with_header("X-Trace", "abc");
        let headers = request.merged_headers();
        assert_eq!(headers.get("accept").map(String::as_str), Some("application/json"));
        assert_eq!(headers.get("x-trace").map(String::as_str), Some("abc"));

        let request = SpotlightRequest::new("x").with_header("Accept", "text/xml");
        let headers = request.merged_headers();
        assert_eq!(headers.get("accept").map(String::as_str), Some("text/xml"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_from_defaults_policy() {
        let defaults = RequestDefaults {
            policy: "blacklist".to_string(),
            support: 20,
            ..Default::default()
        };
        let request = SpotlightRequest::from_defaults("x", &defaults);
        assert_eq!(request.support, 20);
        assert_eq!(
            request.merged_filters().get("policy").map(String::as_str),
            Some("blacklist")
        );

        let request = SpotlightRequest::from_defaults("x", &RequestDefaults::default());
        assert!(request.filters.is_none());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("http://localhost:2222/rest/annotate").is_ok());
        assert!(validate_address("https://example.org").is_ok());

        let err = validate_address("localhost").unwrap_err();
        assert!(matches!(err, SpotlightError::Configuration(_)));
        assert!(err.to_string().contains("localhost"));
    }
}

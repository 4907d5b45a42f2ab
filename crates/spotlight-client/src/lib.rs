//! Spotlight Client - DBpedia Spotlight REST API wrapper
//!
//! Posts a text plus annotation options to a Spotlight server and turns
//! the `@`-marked, all-strings JSON it returns into clean, typed maps.
//!
//! ```no_run
//! use spotlight_client::{annotate, SpotlightRequest};
//!
//! let request = SpotlightRequest::new("President Obama called Angela Merkel.")
//!     .with_confidence(0.4)
//!     .with_support(20);
//! let resources = annotate("http://localhost:2222/rest/annotate", &request)?;
//! for resource in &resources {
//!     println!("{} -> {}", resource["surfaceForm"], resource["URI"]);
//! }
//! # Ok::<(), spotlight_client::SpotlightError>(())
//! ```

pub mod client;
pub mod normalize;
pub mod request;
pub mod transport;

pub use client::{
    annotate, annotate_response, candidates, candidates_response, CleanMap, SpotlightClient,
};
pub use normalize::{clean, clean_map, convert_number, EXEMPT_FIELDS};
pub use request::{validate_address, SpotlightRequest, DEFAULT_POLICY};
pub use transport::ReqwestTransport;

pub use spotlight_core::{
    ErrorKind, HttpResponse, HttpTransport, Result, SpotlightConfig, SpotlightError,
};

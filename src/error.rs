//! Error types
//!
//! Failures are split by where they come from: the transport underneath a
//! fetch, the URI helpers, and navigation itself. Only a missing link on a
//! `follow` is an error at the navigation level; a missing property or
//! embedded relation is reported as `None`.

use thiserror::Error;

/// Failure underneath a fetch: network, status, or body parsing.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// The body was not valid JSON
    #[error("response from {url} is not valid JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body was JSON but not an object, so it cannot back a resource
    #[error("response from {url} is not a JSON object")]
    NotAnObject { url: String },
}

impl FetchError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Failure inside URI joining or template expansion.
#[derive(Debug, Error, PartialEq)]
pub enum UriError {
    /// The base URL handed to the joiner is not absolute
    #[error("base url {url:?} is not an absolute url: {source}")]
    InvalidBase {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A `{` in a template has no matching `}`
    #[error("unterminated expression in uri template {template:?}")]
    UnterminatedExpression { template: String },

    /// A `:n` prefix modifier that is not a number in 1..=9999
    #[error("invalid prefix modifier {modifier:?} in uri template {template:?}")]
    InvalidPrefix { template: String, modifier: String },
}

/// Navigation error returned by [`crate::Resource`] operations.
#[derive(Debug, Error)]
pub enum HalError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A relation was required for navigation but is absent from `_links`.
    /// Callers probing optional relations are expected to match on this.
    #[error("{0} was not present in the resource's _links")]
    LinkNotPresent(String),

    #[error(transparent)]
    Uri(#[from] UriError),

    /// An `_embedded` relation holds something other than resource objects
    #[error("embedded {rel} is not a resource object: {found}")]
    MalformedEmbedded { rel: String, found: String },

    /// A URL to load is not absolute
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl HalError {
    /// The missing relation for [`HalError::LinkNotPresent`].
    pub fn rel(&self) -> Option<&str> {
        match self {
            Self::LinkNotPresent(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn is_link_not_present(&self) -> bool {
        matches!(self, Self::LinkNotPresent(_))
    }
}

pub type Result<T, E = HalError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_not_present_message_names_rel() {
        let err = HalError::LinkNotPresent("ht:me".to_string());
        assert_eq!(err.to_string(), "ht:me was not present in the resource's _links");
        assert_eq!(err.rel(), Some("ht:me"));
        assert!(err.is_link_not_present());
    }

    #[test]
    fn test_fetch_error_status() {
        let err = FetchError::Status {
            url: "http://h/x".to_string(),
            status: 404,
        };
        assert_eq!(err.status(), Some(404));

        let err = HalError::from(err);
        assert!(err.rel().is_none());
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_malformed_embedded_message() {
        let err = HalError::MalformedEmbedded {
            rel: "item".to_string(),
            found: "5".to_string(),
        };
        assert_eq!(err.to_string(), "embedded item is not a resource object: 5");
        assert!(!err.is_link_not_present());
    }
}

//! Fetch capability
//!
//! A [`HalClient`] turns a URL into a parsed JSON document. Navigation code
//! only ever sees this trait, so transports are interchangeable.
//!
//! - [`http`] - reqwest transport requesting `application/hal+json`
//! - [`StaticHalClient`] - documents served from memory

pub mod http;

use crate::error::FetchError;
use serde_json::Value;
use std::collections::HashMap;

pub use http::{HttpHalClient, HttpOptions};

#[async_trait::async_trait]
pub trait HalClient: Send + Sync {
    /// Fetch `url` and parse the body as JSON
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// Serves pre-loaded documents keyed by absolute URL.
///
/// Unknown URLs answer like a 404. Useful for offline navigation of a
/// captured API and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticHalClient {
    documents: HashMap<String, Value>,
}

impl StaticHalClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, document: Value) -> Self {
        self.insert(url, document);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, document: Value) {
        self.documents.insert(url.into(), document);
    }
}

#[async_trait::async_trait]
impl HalClient for StaticHalClient {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        tracing::debug!("GET {} (static)", url);
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_client_serves_documents() {
        let client = StaticHalClient::new().with("http://h/", json!({"name": "root"}));

        let doc = client.fetch("http://h/").await.unwrap();
        assert_eq!(doc["name"], "root");

        let err = client.fetch("http://h/missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}

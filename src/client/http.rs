//! HTTP transport for HAL documents

use super::HalClient;
use crate::error::FetchError;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;

/// Media types requested when none is configured
pub const DEFAULT_ACCEPT: &str = "application/hal+json, application/json";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Request settings for [`HttpHalClient`]
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    pub accept: String,
    pub timeout: Option<Duration>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: format!("halnav/{}", env!("CARGO_PKG_VERSION")),
            accept: DEFAULT_ACCEPT.to_string(),
            timeout: None,
        }
    }
}

/// reqwest-backed [`HalClient`]
#[derive(Clone)]
pub struct HttpHalClient {
    client: Client,
    accept: String,
}

impl HttpHalClient {
    /// Create a client with default options
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(&HttpOptions::default())
    }

    pub fn with_options(options: &HttpOptions) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(options.user_agent.clone());
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Client)?;

        Ok(Self {
            client,
            accept: options.accept.clone(),
        })
    }

    /// Wrap an existing reqwest client, e.g. one carrying auth headers
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl HalClient for HttpHalClient {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, &self.accept)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::InvalidJson {
            url: url.to_string(),
            source,
        })
    }
}

/// Format a fetch error for display on the command line
pub fn format_fetch_error(error: &FetchError) -> String {
    match error.status() {
        Some(401) => "Authentication failed.".to_string(),
        Some(403) => "Permission denied.".to_string(),
        Some(404) => "Resource not found.".to_string(),
        Some(406) => "Server cannot produce a JSON representation.".to_string(),
        Some(429) => "Rate limit exceeded. Please try again later.".to_string(),
        Some(status) if status >= 500 => "Server error. Please try again.".to_string(),
        _ => error.to_string(),
    }
}

//! Resource navigation model
//!
//! A [`Resource`] wraps one HAL document. Its `_embedded` children are
//! wrapped eagerly into child resources when it is built; its `_links` are
//! followed on demand, each follow being one fresh fetch.
//!
//! # Architecture
//!
//! - [`Hal`] - the collaborators every resource shares: a [`HalClient`], a
//!   [`UriTemplateProcessor`] and a [`UriJoiner`]
//! - [`entity`] - the [`Resource`] itself and the [`Resolved`] lookup result
//! - [`link`] - typed [`Link`] / [`Links`] views over `_links`
//!
//! # Example
//!
//! ```no_run
//! use halnav::{Hal, HttpHalClient, Variables};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hal = Hal::new(HttpHalClient::new()?);
//! let root = hal.load("http://haltalk.herokuapp.com/").await?;
//! let user = root
//!     .follow("ht:me", &Variables::new().with("name", "clanie"))
//!     .await?;
//! println!("{:?}", user.prop("real_name"));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod link;

use crate::client::HalClient;
use crate::error::Result;
use crate::uri::{PathJoiner, Rfc6570Processor, UriJoiner, UriTemplateProcessor, Variables};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

pub use entity::{Resolved, Resource};
pub use link::{Link, Links};

/// Shared collaborators for a tree of resources. Cheap to clone.
#[derive(Clone)]
pub struct Hal {
    client: Arc<dyn HalClient>,
    templates: Arc<dyn UriTemplateProcessor>,
    joiner: Arc<dyn UriJoiner>,
}

impl Hal {
    /// Use `client` with the built-in template processor and joiner
    pub fn new(client: impl HalClient + 'static) -> Self {
        Self::from_parts(
            Arc::new(client),
            Arc::new(Rfc6570Processor),
            Arc::new(PathJoiner),
        )
    }

    pub fn from_parts(
        client: Arc<dyn HalClient>,
        templates: Arc<dyn UriTemplateProcessor>,
        joiner: Arc<dyn UriJoiner>,
    ) -> Self {
        Self {
            client,
            templates,
            joiner,
        }
    }

    pub fn with_template_processor(mut self, templates: impl UriTemplateProcessor + 'static) -> Self {
        self.templates = Arc::new(templates);
        self
    }

    pub fn with_joiner(mut self, joiner: impl UriJoiner + 'static) -> Self {
        self.joiner = Arc::new(joiner);
        self
    }

    /// Fetch `url` and wrap it as a root resource
    pub async fn load(&self, url: &str) -> Result<Resource> {
        Resource::load(self, url).await
    }

    /// Wrap an already available document without fetching
    pub fn wrap(&self, document: Map<String, Value>, base_url: &str) -> Result<Resource> {
        Resource::wrap(self, document, base_url)
    }

    pub(crate) fn client(&self) -> &dyn HalClient {
        self.client.as_ref()
    }

    /// Absolute URL for `link` relative to `base_url`, expanding templates first
    pub(crate) fn resolve_href(
        &self,
        base_url: &str,
        link: &Link,
        variables: &Variables,
    ) -> Result<String> {
        let href = if link.templated {
            self.templates.process(&link.href, variables)?
        } else {
            link.href.clone()
        };
        Ok(self.joiner.join(base_url, &href)?)
    }
}

impl fmt::Debug for Hal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hal").finish_non_exhaustive()
    }
}

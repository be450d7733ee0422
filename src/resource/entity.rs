//! The navigable resource

use super::link::{Link, Links};
use super::Hal;
use crate::error::{FetchError, HalError, Result};
use crate::uri::Variables;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

const LINKS: &str = "_links";
const EMBEDDED: &str = "_embedded";
const SELF_REL: &str = "self";

/// One HAL representation and the resources embedded in it.
///
/// Immutable once built. Navigation returns new resources; `refresh` never
/// updates the receiver.
#[derive(Clone)]
pub struct Resource {
    hal: Hal,
    document: Map<String, Value>,
    embedded: BTreeMap<String, Vec<Resource>>,
    base_url: String,
}

/// What a name resolved to, in precedence order.
#[derive(Debug)]
pub enum Resolved<'a> {
    /// The name is an `_embedded` relation
    Embedded(&'a [Resource]),
    /// The name is a `_links` relation, which was followed
    Followed(Resource),
    /// The name is a plain document property
    Property(&'a Value),
}

impl<'a> Resolved<'a> {
    pub fn as_embedded(&self) -> Option<&'a [Resource]> {
        match self {
            Self::Embedded(children) => Some(*children),
            _ => None,
        }
    }

    pub fn into_followed(self) -> Option<Resource> {
        match self {
            Self::Followed(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&'a Value> {
        match self {
            Self::Property(value) => Some(*value),
            _ => None,
        }
    }
}

impl Resource {
    /// Fetch `url` and wrap the returned document. The URL becomes the base
    /// for every relative link of the resource.
    pub async fn load(hal: &Hal, url: &str) -> Result<Self> {
        ensure_absolute(url)?;
        tracing::debug!("loading resource {}", url);

        let document = match hal.client().fetch(url).await? {
            Value::Object(document) => document,
            _ => {
                return Err(FetchError::NotAnObject {
                    url: url.to_string(),
                }
                .into())
            }
        };

        Self::build(hal, document, url.to_string())
    }

    /// Wrap a document that is already at hand, such as an embedded one.
    ///
    /// The base URL is the document's own `self` link joined onto `base_url`,
    /// or `base_url` itself when there is no `self` link.
    pub fn wrap(hal: &Hal, document: Map<String, Value>, base_url: &str) -> Result<Self> {
        let self_link = document
            .get(LINKS)
            .and_then(|links| links.get(SELF_REL))
            .and_then(Links::from_value)
            .and_then(Links::into_first);

        let base_url = match self_link {
            Some(link) => hal.resolve_href(base_url, &link, &Variables::new())?,
            None => base_url.to_string(),
        };

        Self::build(hal, document, base_url)
    }

    fn build(hal: &Hal, document: Map<String, Value>, base_url: String) -> Result<Self> {
        ensure_absolute(&base_url)?;
        let embedded = wrap_embedded(hal, &document, &base_url)?;

        Ok(Self {
            hal: hal.clone(),
            document,
            embedded,
            base_url,
        })
    }

    /// Embedded resources, else the followed link, else the property
    /// named `name`. `None` when the name matches none of them.
    pub async fn resolve(&self, name: &str, variables: &Variables) -> Result<Option<Resolved<'_>>> {
        if let Some(children) = self.embedded.get(name) {
            return Ok(Some(Resolved::Embedded(children)));
        }

        if let Some(link) = self.link(name) {
            let followed = self.follow_link(&link, variables).await?;
            return Ok(Some(Resolved::Followed(followed)));
        }

        Ok(self.prop(name).map(Resolved::Property))
    }

    /// Property-style access: [`Resource::resolve`] without variables.
    pub async fn get(&self, name: &str) -> Result<Option<Resolved<'_>>> {
        self.resolve(name, &Variables::new()).await
    }

    /// Call-style access: a JSON object argument supplies the template
    /// variables, any other argument is ignored.
    pub async fn call(&self, name: &str, arg: Option<&Value>) -> Result<Option<Resolved<'_>>> {
        let variables = arg.and_then(Variables::from_json).unwrap_or_default();
        self.resolve(name, &variables).await
    }

    /// Follow the first link of relation `rel`.
    ///
    /// # Errors
    ///
    /// [`HalError::LinkNotPresent`] when `rel` is not in `_links`.
    pub async fn follow(&self, rel: &str, variables: &Variables) -> Result<Resource> {
        let link = self
            .link(rel)
            .ok_or_else(|| HalError::LinkNotPresent(rel.to_string()))?;
        tracing::debug!("following {} from {}", rel, self.base_url);
        self.follow_link(&link, variables).await
    }

    /// Follow a link value obtained earlier, e.g. one entry of [`Resource::links`].
    pub async fn follow_link(&self, link: &Link, variables: &Variables) -> Result<Resource> {
        let url = self.hal.resolve_href(&self.base_url, link, variables)?;
        Resource::load(&self.hal, &url).await
    }

    /// The absolute URL relation `rel` points at, without fetching it.
    pub fn href(&self, rel: &str, variables: &Variables) -> Result<String> {
        let link = self
            .link(rel)
            .ok_or_else(|| HalError::LinkNotPresent(rel.to_string()))?;
        self.hal.resolve_href(&self.base_url, &link, variables)
    }

    /// First link for `rel`, whether `_links[rel]` is one link or a list.
    pub fn link(&self, rel: &str) -> Option<Link> {
        self.links(rel).and_then(Links::into_first)
    }

    pub fn links(&self, rel: &str) -> Option<Links> {
        self.raw_links(rel).and_then(Links::from_value)
    }

    /// `_links[rel]` exactly as it appears in the document
    pub fn raw_links(&self, rel: &str) -> Option<&Value> {
        self.document.get(LINKS).and_then(|links| links.get(rel))
    }

    /// Plain document property, bypassing links and embedded resources
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.document.get(name)
    }

    pub fn embedded(&self, rel: &str) -> Option<&[Resource]> {
        self.embedded.get(rel).map(Vec::as_slice)
    }

    /// Re-fetch through the `self` link. Returns a new resource.
    pub async fn refresh(&self) -> Result<Resource> {
        self.follow(SELF_REL, &Variables::new()).await
    }

    /// Load the complete representation of a possibly partial embedded
    /// resource. Same as [`Resource::refresh`].
    pub async fn full(&self) -> Result<Resource> {
        self.refresh().await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    pub fn into_document(self) -> Map<String, Value> {
        self.document
    }

    /// Document entries other than `_links` and `_embedded`
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.document
            .iter()
            .filter(|(key, _)| key.as_str() != LINKS && key.as_str() != EMBEDDED)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Relation names present in `_links`
    pub fn rels(&self) -> Vec<&str> {
        match self.document.get(LINKS) {
            Some(Value::Object(links)) => links.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Relation names of the embedded resources
    pub fn embedded_rels(&self) -> Vec<&str> {
        self.embedded.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("base_url", &self.base_url)
            .field("document", &self.document)
            .field("embedded", &self.embedded_rels())
            .finish_non_exhaustive()
    }
}

fn ensure_absolute(url: &str) -> Result<()> {
    Url::parse(url).map_err(|source| HalError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    Ok(())
}

/// Wrap every `_embedded` entry into child resources anchored at `base_url`.
/// An empty list is left out, so no entry is ever empty. Any element that is
/// not a JSON object fails the whole parent.
///
/// Children are built from copies: the parent document keeps its raw
/// `_embedded` so `prop("_embedded")` and `document()` stay faithful to what
/// the server sent. Deeply nested documents therefore hold one copy of a
/// subtree per level above it.
fn wrap_embedded(
    hal: &Hal,
    document: &Map<String, Value>,
    base_url: &str,
) -> Result<BTreeMap<String, Vec<Resource>>> {
    let mut embedded = BTreeMap::new();

    let Some(Value::Object(entries)) = document.get(EMBEDDED) else {
        return Ok(embedded);
    };

    for (rel, value) in entries {
        let children = match value {
            Value::Array(items) => items
                .iter()
                .map(|item| wrap_child(hal, rel, item, base_url))
                .collect::<Result<Vec<_>>>()?,
            other => vec![wrap_child(hal, rel, other, base_url)?],
        };

        if !children.is_empty() {
            embedded.insert(rel.clone(), children);
        }
    }

    Ok(embedded)
}

fn wrap_child(hal: &Hal, rel: &str, value: &Value, base_url: &str) -> Result<Resource> {
    match value {
        Value::Object(child) => Resource::wrap(hal, child.clone(), base_url),
        other => Err(HalError::MalformedEmbedded {
            rel: rel.to_string(),
            found: other.to_string(),
        }),
    }
}

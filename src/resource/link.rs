//! Typed views over `_links` entries

use serde::Serialize;
use serde_json::Value;

/// A single HAL link object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    /// When set, `href` is a URI template and must be expanded before use
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: false,
            media_type: None,
            name: None,
            title: None,
            profile: None,
            hreflang: None,
            deprecation: None,
        }
    }

    pub fn templated(href: impl Into<String>) -> Self {
        Self {
            templated: true,
            ..Self::new(href)
        }
    }

    /// Read a link object. Anything without a string `href` is not a link;
    /// optional attributes of the wrong type are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        let Some(href) = value.get("href").and_then(Value::as_str) else {
            tracing::warn!("ignoring link without a string href: {}", value);
            return None;
        };

        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            href: href.to_string(),
            templated: value
                .get("templated")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            media_type: text("type"),
            name: text("name"),
            title: text("title"),
            profile: text("profile"),
            hreflang: text("hreflang"),
            deprecation: text("deprecation"),
        })
    }
}

/// The value of one relation in `_links`: a lone link or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Links {
    One(Link),
    Many(Vec<Link>),
}

impl Links {
    /// Malformed entries of a list are skipped; a list with no usable entry
    /// is treated as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => {
                let links: Vec<Link> = items.iter().filter_map(Link::from_value).collect();
                if links.is_empty() {
                    None
                } else {
                    Some(Self::Many(links))
                }
            }
            other => Link::from_value(other).map(Self::One),
        }
    }

    pub fn first(&self) -> Option<&Link> {
        match self {
            Self::One(link) => Some(link),
            Self::Many(links) => links.first(),
        }
    }

    pub fn into_first(self) -> Option<Link> {
        match self {
            Self::One(link) => Some(link),
            Self::Many(links) => links.into_iter().next(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        match self {
            Self::One(link) => std::slice::from_ref(link).iter(),
            Self::Many(links) => links.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(links) => links.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<Link> {
        match self {
            Self::One(link) => vec![link],
            Self::Many(links) => links,
        }
    }
}

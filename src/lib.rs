//! halnav - navigate HAL+JSON hypermedia APIs by relation.
//!
//! Load a root resource, then move through the API with `follow`, read
//! `_embedded` resources and plain properties, and let templated links be
//! expanded for you:
//!
//! - **Navigation** - [`Hal`], [`Resource`], [`Resolved`], [`Link`], [`Links`]
//! - **URI helpers** - [`UriTemplateProcessor`], [`UriJoiner`], [`Variables`]
//! - **Transport** - [`HalClient`], [`HttpHalClient`], [`StaticHalClient`]
//! - **Errors** - [`HalError`], [`FetchError`], [`UriError`]

pub mod client;
pub mod config;
pub mod error;
pub mod resource;
pub mod uri;
pub mod walk;

pub use client::{HalClient, HttpHalClient, HttpOptions, StaticHalClient};
pub use config::Config;
pub use error::{FetchError, HalError, UriError};
pub use resource::{Hal, Link, Links, Resolved, Resource};
pub use uri::{PathJoiner, Rfc6570Processor, UriJoiner, UriTemplateProcessor, VarValue, Variables};
pub use walk::{walk, Outcome, Step, WalkError};

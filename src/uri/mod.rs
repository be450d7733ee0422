//! URI resolution for link targets
//!
//! Two independent capabilities used when following a link:
//!
//! - [`template`] - expands templated hrefs (`/users/{id}`) with [`Variables`]
//! - [`joiner`] - joins the (expanded) href onto the resource's base URL
//!
//! Both sit behind traits so a [`crate::Hal`] context can be built with
//! alternative implementations.

pub mod joiner;
pub mod template;
mod variables;

pub use joiner::{PathJoiner, UriJoiner};
pub use template::{Rfc6570Processor, UriTemplateProcessor};
pub use variables::{VarValue, Variables};

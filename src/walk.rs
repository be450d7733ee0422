//! Multi-step navigation
//!
//! A walk resolves a sequence of names from a starting resource, each step
//! using [`Resource::resolve`] precedence. A step written `rel[2]` picks an
//! element when the name resolves to embedded resources or a JSON array.

use crate::error::HalError;
use crate::resource::{Resolved, Resource};
use crate::uri::Variables;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub index: Option<usize>,
}

impl Step {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    pub fn at(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid step {0:?}, expected `rel` or `rel[index]`")]
pub struct StepParseError(String);

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StepParseError(s.to_string());

        let Some(open) = s.strip_suffix(']') else {
            if s.is_empty() {
                return Err(invalid());
            }
            return Ok(Step::new(s));
        };

        let (name, index) = open.rsplit_once('[').ok_or_else(invalid)?;
        if name.is_empty() {
            return Err(invalid());
        }
        let index = index.parse().map_err(|_| invalid())?;
        Ok(Step::at(name, index))
    }
}

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("step {step}: {source}")]
    Hal {
        step: String,
        #[source]
        source: HalError,
    },

    #[error("step {0}: no embedded resource, link or property with that name")]
    NotFound(String),

    #[error("step {step}: index {index} out of range ({len} available)")]
    IndexOutOfRange {
        step: String,
        index: usize,
        len: usize,
    },

    #[error("step {0}: cannot navigate past a plain property")]
    PastProperty(String),
}

/// Where a walk ended
#[derive(Debug)]
pub enum Outcome {
    Resource(Resource),
    Value(Value),
}

/// Resolve `steps` one after another starting at `start`.
///
/// Every templated link along the way is expanded with `variables`. A step
/// resolving to a plain property must be the last one.
pub async fn walk(
    start: Resource,
    steps: &[Step],
    variables: &Variables,
) -> Result<Outcome, WalkError> {
    let mut current = start;

    for (position, step) in steps.iter().enumerate() {
        tracing::debug!("walk step {}", step);

        let resolved = current
            .resolve(&step.name, variables)
            .await
            .map_err(|source| WalkError::Hal {
                step: step.to_string(),
                source,
            })?;

        let next = match resolved {
            None => return Err(WalkError::NotFound(step.to_string())),
            Some(Resolved::Embedded(children)) => {
                let index = step.index.unwrap_or(0);
                children
                    .get(index)
                    .cloned()
                    .ok_or_else(|| WalkError::IndexOutOfRange {
                        step: step.to_string(),
                        index,
                        len: children.len(),
                    })?
            }
            Some(Resolved::Followed(resource)) => resource,
            Some(Resolved::Property(value)) => {
                if position + 1 < steps.len() {
                    return Err(WalkError::PastProperty(step.to_string()));
                }
                let value = match step.index {
                    Some(index) => value.get(index).cloned().ok_or_else(|| {
                        WalkError::IndexOutOfRange {
                            step: step.to_string(),
                            index,
                            len: value.as_array().map_or(0, Vec::len),
                        }
                    })?,
                    None => value.clone(),
                };
                return Ok(Outcome::Value(value));
            }
        };

        current = next;
    }

    Ok(Outcome::Resource(current))
}

//! Variables for URI template expansion

use serde_json::Value;
use std::collections::BTreeMap;

/// A template variable value. RFC 6570 distinguishes strings, lists and
/// associative arrays, and each expands differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    String(String),
    List(Vec<String>),
    Map(Vec<(String, String)>),
}

impl VarValue {
    /// Empty lists and maps count as undefined during expansion.
    pub fn is_undefined(&self) -> bool {
        match self {
            Self::String(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Map(pairs) => pairs.is_empty(),
        }
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&String> for VarValue {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

macro_rules! var_value_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for VarValue {
                fn from(v: $t) -> Self {
                    Self::String(v.to_string())
                }
            }
        )*
    };
}

var_value_from_display!(i32, i64, u32, u64, usize, bool);

impl From<Vec<String>> for VarValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for VarValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<(String, String)>> for VarValue {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::Map(pairs)
    }
}

impl From<Vec<(&str, &str)>> for VarValue {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Named values used to expand templated links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables(BTreeMap<String, VarValue>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<VarValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<VarValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build variables from a JSON object.
    ///
    /// Scalars become strings, arrays of scalars become lists and objects of
    /// scalars become maps. `null` entries and nested containers are dropped.
    /// Returns `None` when `value` is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };

        let mut vars = Self::new();
        for (name, value) in map {
            let var = match value {
                Value::Array(items) => {
                    VarValue::List(items.iter().filter_map(scalar_to_string).collect())
                }
                Value::Object(pairs) => VarValue::Map(
                    pairs
                        .iter()
                        .filter_map(|(k, v)| scalar_to_string(v).map(|v| (k.clone(), v)))
                        .collect(),
                ),
                scalar => match scalar_to_string(scalar) {
                    Some(s) => VarValue::String(s),
                    None => continue,
                },
            };
            vars.insert(name.clone(), var);
        }

        Some(vars)
    }
}

impl<K, V> FromIterator<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<VarValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

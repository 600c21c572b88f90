//! Named parameter extraction.
//!
//! A parameter may come from the parsed body, the query string or a path
//! capture. Lookup order is body, then query, then path; a `null` body field
//! does not hide a query parameter of the same name.

use crate::error::Result;
use crate::http::ActionRequest;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ParamSource {
    Body,
    Query,
    Path,
}

/// Mapping from each requested name to its value (`null` when absent).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// True when `name` was requested and found on the request.
    pub fn is_present(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(|value| !value.is_null())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserialize the collected parameters into a typed payload.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.0.clone()))?)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        Value::Object(params.0)
    }
}

pub(crate) fn lookup(request: &ActionRequest, name: &str) -> Option<(ParamSource, Value)> {
    if let Some(value) = request.body_param(name).filter(|value| !value.is_null()) {
        return Some((ParamSource::Body, value.clone()));
    }
    if let Some(value) = request.query_param(name) {
        return Some((ParamSource::Query, Value::String(value.to_string())));
    }
    request
        .path_param(name)
        .map(|value| (ParamSource::Path, Value::String(value.to_string())))
}

/// Collect `names` from `request`. Every name becomes a key, present or not.
pub fn extract<I, S>(request: &ActionRequest, names: I) -> Params
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let fields = names
        .into_iter()
        .map(|name| {
            let name = name.as_ref();
            let value = lookup(request, name)
                .map(|(_, value)| value)
                .unwrap_or(Value::Null);
            (name.to_string(), value)
        })
        .collect();
    Params(fields)
}

use crate::error::{ActionError, Result, RouteResolutionError};
use crate::http::helpers::is_redirect_status;
use crate::routing::RoutePattern;
use axum::http::StatusCode;
use std::collections::{BTreeMap, HashMap};

/// Values substituted into a named route's captures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for RouteParams {
    fn from(pairs: [(K, V); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

/// Turns route names into URLs. Controllers receive it by injection.
pub trait UrlGenerator: Send + Sync + 'static {
    fn url_for(
        &self,
        name: &str,
        params: &RouteParams,
    ) -> std::result::Result<String, RouteResolutionError>;

    /// Status used by redirects that do not set one explicitly.
    fn redirect_status(&self) -> StatusCode {
        StatusCode::FOUND
    }
}

/// Named routes collected from the registered groups.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, RoutePattern>,
    redirect_status: StatusCode,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            redirect_status: StatusCode::FOUND,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, pattern: RoutePattern) -> Result<()> {
        let name = name.into();
        if let Some(existing) = self.routes.get(&name) {
            return Err(ActionError::invalid_route(
                pattern.as_str(),
                format!("route name '{name}' is already used by {existing}"),
            ));
        }
        self.routes.insert(name, pattern);
        Ok(())
    }

    pub fn with_redirect_status(mut self, status: StatusCode) -> Result<Self> {
        if !is_redirect_status(status) {
            return Err(ActionError::InvalidRedirectStatus(status));
        }
        self.redirect_status = status;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&RoutePattern> {
        self.routes.get(name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlGenerator for RouteTable {
    fn url_for(
        &self,
        name: &str,
        params: &RouteParams,
    ) -> std::result::Result<String, RouteResolutionError> {
        self.routes
            .get(name)
            .ok_or_else(|| RouteResolutionError::UnknownRoute(name.to_string()))?
            .render(name, params)
    }

    fn redirect_status(&self) -> StatusCode {
        self.redirect_status
    }
}

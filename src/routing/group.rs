use crate::error::Result;
use crate::middleware::Middleware;
use crate::routing::{Action, RoutePattern};
use axum::http::Method;
use std::sync::Arc;

/// One route: method, path relative to its group, handler and optional name.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    path: String,
    action: Action,
    name: Option<String>,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>, action: Action) -> Self {
        Self {
            method,
            path: path.into(),
            action,
            name: None,
        }
    }

    pub fn get(path: impl Into<String>, action: Action) -> Self {
        Self::new(Method::GET, path, action)
    }

    pub fn post(path: impl Into<String>, action: Action) -> Self {
        Self::new(Method::POST, path, action)
    }

    pub fn put(path: impl Into<String>, action: Action) -> Self {
        Self::new(Method::PUT, path, action)
    }

    pub fn patch(path: impl Into<String>, action: Action) -> Self {
        Self::new(Method::PATCH, path, action)
    }

    pub fn delete(path: impl Into<String>, action: Action) -> Self {
        Self::new(Method::DELETE, path, action)
    }

    /// Name the route so redirects can target it.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Routes sharing a path prefix and a middleware chain.
///
/// The first middleware attached is the outermost one. Nested groups run
/// inside their parent's chain.
///
/// ```
/// use actionkit::prelude::*;
///
/// let group = RouteGroup::new("/userService")
///     .get("/hello", Action::from_fn(|_req, res| async move {
///         Ok(helpers::write(res, "demo route hello", StatusCode::OK))
///     }))
///     .middleware(JsonOnly::new());
/// assert_eq!(group.routes().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RouteGroup {
    prefix: String,
    middleware: Vec<Arc<dyn Middleware>>,
    routes: Vec<Route>,
    groups: Vec<RouteGroup>,
}

impl RouteGroup {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn get(self, path: impl Into<String>, action: Action) -> Self {
        self.route(Route::get(path, action))
    }

    pub fn post(self, path: impl Into<String>, action: Action) -> Self {
        self.route(Route::post(path, action))
    }

    pub fn put(self, path: impl Into<String>, action: Action) -> Self {
        self.route(Route::put(path, action))
    }

    pub fn patch(self, path: impl Into<String>, action: Action) -> Self {
        self.route(Route::patch(path, action))
    }

    pub fn delete(self, path: impl Into<String>, action: Action) -> Self {
        self.route(Route::delete(path, action))
    }

    /// Attach middleware around every route of this group and its subgroups.
    pub fn middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn middleware_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn group(mut self, group: RouteGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn middleware_chain(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn groups(&self) -> &[RouteGroup] {
        &self.groups
    }

    /// Resolve prefixes and chains into one entry per route.
    pub fn flatten(&self) -> Result<Vec<RouteEntry>> {
        let mut entries = Vec::new();
        self.flatten_into("", &[], &mut entries)?;
        Ok(entries)
    }

    fn flatten_into(
        &self,
        parent_prefix: &str,
        parent_chain: &[Arc<dyn Middleware>],
        entries: &mut Vec<RouteEntry>,
    ) -> Result<()> {
        let prefix = RoutePattern::join(parent_prefix, &self.prefix)?;
        let prefix = match prefix.as_str() {
            "/" => "",
            other => other,
        };
        let chain: Vec<Arc<dyn Middleware>> = parent_chain
            .iter()
            .chain(self.middleware.iter())
            .cloned()
            .collect();

        for route in &self.routes {
            entries.push(RouteEntry {
                method: route.method.clone(),
                pattern: RoutePattern::join(prefix, &route.path)?,
                name: route.name.clone(),
                middleware: chain.clone(),
                action: route.action.clone(),
            });
        }
        for group in &self.groups {
            group.flatten_into(prefix, &chain, entries)?;
        }
        Ok(())
    }
}

/// A route with its full pattern and the complete middleware chain around it.
#[derive(Clone)]
pub struct RouteEntry {
    pub method: Method,
    pub pattern: RoutePattern,
    pub name: Option<String>,
    pub middleware: Vec<Arc<dyn Middleware>>,
    pub action: Action,
}

//! Application Bootstrap
//!
//! Composes route groups and the service container into an axum router.

mod shutdown;

pub use shutdown::shutdown_signal;

use crate::di::{Container, Services};
use crate::error::{ActionError, Result};
use crate::http::ActionRequest;
use crate::middleware::Pipeline;
use crate::routing::{RouteEntry, RouteGroup, RouteParams, RouteTable, UrlGenerator};
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{FromRequestParts, RawPathParams, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tracing::Instrument;

/// Default cap on request bodies read by the dispatch layer.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// A composed application: the axum router plus what it was built from.
///
/// # Example
///
/// ```rust,no_run
/// use actionkit::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> actionkit::Result<()> {
///     let app = Application::builder()
///         .group(
///             RouteGroup::new("/userService")
///                 .get("/hello", Action::from_fn(|_req, res| async move {
///                     Ok(helpers::write(res, "demo route hello", StatusCode::OK))
///                 }))
///                 .middleware(JsonOnly::new()),
///         )
///         .build()?;
///
///     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
///     app.serve(listener).await.unwrap();
///     Ok(())
/// }
/// ```
pub struct Application {
    router: Router,
    services: Services,
    routes: Arc<RouteTable>,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// A handle to the axum router, for nesting or serving elsewhere.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn url_for(&self, name: &str, params: impl Into<RouteParams>) -> Result<String> {
        Ok(self.routes.url_for(name, &params.into())?)
    }

    /// Run one request through the router without a network listener.
    pub async fn dispatch(&self, request: Request) -> Response {
        match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, routes = self.routes.len(), "serving");
        }
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }
}

/// Collects the container and route groups, then validates and wires them.
pub struct ApplicationBuilder {
    container: Container,
    groups: Vec<RouteGroup>,
    redirect_status: StatusCode,
    body_limit: usize,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            container: Container::new(),
            groups: Vec::new(),
            redirect_status: StatusCode::FOUND,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Services handed to controllers. Replaces any previous container.
    pub fn container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn group(mut self, group: RouteGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Status used by redirects to named routes (302 unless changed).
    pub fn redirect_status(mut self, status: StatusCode) -> Self {
        self.redirect_status = status;
        self
    }

    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Flatten the groups, register the route table as `dyn UrlGenerator`,
    /// check that every bound controller can be injected, and build the router.
    pub fn build(self) -> Result<Application> {
        let Self {
            mut container,
            groups,
            redirect_status,
            body_limit,
        } = self;

        let mut entries = Vec::new();
        for group in &groups {
            entries.extend(group.flatten()?);
        }

        let mut table = RouteTable::new().with_redirect_status(redirect_status)?;
        for entry in &entries {
            if let Some(name) = &entry.name {
                table.insert(name.clone(), entry.pattern.clone())?;
            }
        }
        container.register(table.clone());
        container.register_trait::<dyn UrlGenerator, RouteTable, _>(|table| {
            table as Arc<dyn UrlGenerator>
        });
        let services = Services::new(container);

        for entry in &entries {
            entry.action.verify(&services).inspect_err(|err| {
                tracing::error!(
                    route = %entry.pattern,
                    action = entry.action.name(),
                    error = %err,
                    "cannot build controller"
                );
            })?;
        }

        let router = build_router(entries, &services, body_limit)?;
        tracing::debug!(named_routes = table.len(), "application built");

        Ok(Application {
            router,
            services,
            routes: Arc::new(table),
        })
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn build_router(entries: Vec<RouteEntry>, services: &Services, body_limit: usize) -> Result<Router> {
    let mut seen = HashSet::new();
    let mut shapes: HashMap<String, String> = HashMap::new();
    let mut by_path: BTreeMap<String, MethodRouter> = BTreeMap::new();

    for entry in entries {
        let path = entry.pattern.as_str().to_string();
        let registered = shapes
            .entry(entry.pattern.shape())
            .or_insert_with(|| path.clone());
        if *registered != path {
            return Err(ActionError::invalid_route(
                &path,
                format!("conflicts with {registered}; captures at the same position must share a name"),
            ));
        }
        if !seen.insert((entry.method.clone(), path.clone())) {
            return Err(ActionError::invalid_route(
                &path,
                format!("{} is registered twice", entry.method),
            ));
        }
        let filter = MethodFilter::try_from(entry.method.clone()).map_err(|_| {
            ActionError::invalid_route(&path, format!("unsupported method {}", entry.method))
        })?;

        let pipeline = Pipeline::new(entry.middleware, entry.action, services.clone());
        let handler = move |request: Request| {
            let pipeline = pipeline.clone();
            async move { dispatch(pipeline, body_limit, request).await }
        };

        let method_router = by_path.remove(&path).unwrap_or_default();
        by_path.insert(path, method_router.on(filter, handler));
    }

    Ok(by_path
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            router.route(&path, method_router)
        }))
}

async fn dispatch(pipeline: Pipeline, body_limit: usize, request: Request) -> Response {
    let (mut parts, body) = request.into_parts();
    let path_params: Vec<(String, String)> = RawPathParams::from_request_parts(&mut parts, &())
        .await
        .map(|params| {
            params
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        })
        .unwrap_or_default();

    let body = match to_bytes(body, body_limit).await {
        Ok(body) => body,
        Err(err) => return ActionError::BodyRead(err.to_string()).into_response(),
    };

    let request = ActionRequest::new(parts, body).with_path_params(path_params);
    let span = tracing::debug_span!(
        "dispatch",
        request_id = %request.id(),
        method = %request.method(),
        path = request.path(),
    );

    async move {
        tracing::debug!(middleware = pipeline.len(), "dispatching");
        match pipeline.run(request).await {
            Ok(response) => response.finalize(),
            Err(err) => err.into_response(),
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::helpers;
    use crate::routing::{Action, Route};
    use axum::body::to_bytes;

    fn echo_id() -> Action {
        Action::from_fn(|request, response| async move {
            let id = request.param("id");
            helpers::json(response, &id, StatusCode::OK)
        })
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_reaches_handler_with_path_params() {
        let app = Application::builder()
            .group(RouteGroup::new("/items").route(Route::get("/{id}", echo_id()).name("items.show")))
            .build()
            .unwrap();

        let response = app
            .dispatch(Request::builder().uri("/items/7").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "\"7\"");
        assert_eq!(app.url_for("items.show", [("id", 7)]).unwrap(), "/items/7");
    }

    #[tokio::test]
    async fn test_same_path_different_methods() {
        let app = Application::builder()
            .group(
                RouteGroup::new("/things")
                    .get("/", Action::from_fn(|_q, r| async move { Ok(helpers::write(r, "list", StatusCode::OK)) }))
                    .post("/", Action::from_fn(|_q, r| async move { Ok(helpers::write(r, "made", StatusCode::CREATED)) })),
            )
            .build()
            .unwrap();

        let get = app
            .dispatch(Request::builder().uri("/things").body(Body::empty()).unwrap())
            .await;
        assert_eq!(body_text(get).await, "list");

        let post = app
            .dispatch(Request::builder().method("POST").uri("/things").body(Body::empty()).unwrap())
            .await;
        assert_eq!(post.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let result = Application::builder()
            .group(RouteGroup::new("/a").get("/x", echo_id()).get("/x", echo_id()))
            .build();
        assert!(matches!(result, Err(ActionError::InvalidRoute { .. })));
    }

    #[test]
    fn test_capture_names_must_agree_across_methods() {
        let result = Application::builder()
            .group(RouteGroup::new("/users").get("/{id}", echo_id()).put("/{user_id}", echo_id()))
            .build();
        match result {
            Err(ActionError::InvalidRoute { pattern, .. }) => assert_eq!(pattern, "/users/{user_id}"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("conflicting captures should fail the build"),
        }
    }

    #[test]
    fn test_colon_segment_rejected() {
        let result = Application::builder()
            .group(RouteGroup::new("/users").get("/:id", echo_id()))
            .build();
        assert!(matches!(result, Err(ActionError::InvalidRoute { .. })));
    }

    #[tokio::test]
    async fn test_same_capture_name_shares_path() {
        let app = Application::builder()
            .group(RouteGroup::new("/users").get("/{id}", echo_id()).put("/{id}", echo_id()))
            .build()
            .unwrap();
        let response = app
            .dispatch(Request::builder().method("PUT").uri("/users/3").body(Body::empty()).unwrap())
            .await;
        assert_eq!(body_text(response).await, "\"3\"");
    }

    #[test]
    fn test_invalid_redirect_status_rejected() {
        let result = Application::builder()
            .redirect_status(StatusCode::OK)
            .build();
        assert!(matches!(result, Err(ActionError::InvalidRedirectStatus(_))));
    }

    #[test]
    fn test_route_table_is_injectable() {
        let app = Application::builder()
            .group(RouteGroup::new("/").route(Route::get("/", echo_id()).name("home")))
            .build()
            .unwrap();

        let router = app.services().resolve_trait::<dyn UrlGenerator>().unwrap();
        assert_eq!(router.url_for("home", &RouteParams::new()).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let app = Application::builder()
            .body_limit(4)
            .group(RouteGroup::new("/").post("/upload", echo_id()))
            .build()
            .unwrap();

        let response = app
            .dispatch(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .body(Body::from("far too long"))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

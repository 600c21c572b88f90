//! # actionkit
//!
//! A thin controller layer for axum: controllers with response helpers,
//! route groups with middleware chains, and constructor injection.
//!
//! ## Features
//!
//! - **Controller helpers**: `json`, `ok`, `created`, `redirect`, `write`,
//!   `no_content` and `validation_errors` on every [`ActionController`]
//! - **Param extraction**: body, then query, then path, absent names as `null`
//! - **Route groups**: shared prefixes and middleware, composed once at startup
//! - **Injection**: `#[derive(Injectable)]` resolves `Arc<T>`, `Arc<dyn Trait>`
//!   and named services; missing services fail the build, not the request
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actionkit::prelude::*;
//! use actionkit::validation::{Rule, RuleValidator, Validator};
//!
//! #[derive(Injectable)]
//! pub struct UserController {
//!     router: Arc<dyn UrlGenerator>,
//!     validator: Arc<RuleValidator>,
//! }
//!
//! impl ActionController for UserController {
//!     fn router(&self) -> actionkit::Result<&dyn UrlGenerator> {
//!         Ok(self.router.as_ref())
//!     }
//!
//!     fn validator(&self) -> actionkit::Result<&dyn Validator> {
//!         Ok(self.validator.as_ref())
//!     }
//! }
//!
//! impl UserController {
//!     async fn create(
//!         self: Arc<Self>,
//!         request: ActionRequest,
//!         response: ActionResponse,
//!     ) -> actionkit::Result<ActionResponse> {
//!         let input = self.params(&request, ["email"]);
//!         if !self.validator.validate(&input, [("email", &[Rule::Required, Rule::Email][..])]) {
//!             return self.validation_errors(response);
//!         }
//!         self.created(response, "users.show", [("id", 1)])
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> actionkit::Result<()> {
//!     let mut container = Container::new();
//!     container.register_factory(RuleValidator::new);
//!
//!     let app = Application::builder()
//!         .container(container)
//!         .group(
//!             RouteGroup::new("/users")
//!                 .middleware(JsonOnly::new())
//!                 .post("/", Action::bind(UserController::create))
//!                 .route(Route::get("/{id}", Action::from_fn(|_req, res| async move {
//!                     Ok(res)
//!                 })).name("users.show")),
//!         )
//!         .build()?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     app.serve(listener).await.unwrap();
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod config;
pub mod controller;
pub mod di;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routing;
pub mod validation;

// Re-export core types
pub use application::{Application, ApplicationBuilder};
pub use controller::ActionController;
pub use di::{Container, ContainerBuilder, Injectable, Services};
pub use error::{ActionError, Result, RouteResolutionError};
pub use http::{ActionRequest, ActionResponse, Params};
pub use middleware::{JsonOnly, Middleware, Next, RequestLogging};
pub use routing::{Action, Route, RouteGroup, RouteParams, RouteTable, UrlGenerator};

// The derive shares the trait's name, as serde does.
pub use actionkit_macro::Injectable;

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use actionkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::application::{Application, ApplicationBuilder, shutdown_signal};
    pub use crate::controller::ActionController;
    pub use crate::di::{Container, ContainerBuilder, Injectable, Services};
    pub use crate::error::{ActionError, Result};
    pub use crate::http::{ActionRequest, ActionResponse, Params, helpers};
    pub use crate::middleware::{JsonOnly, Middleware, Next, RequestLogging};
    pub use crate::routing::{Action, Route, RouteGroup, RouteParams, UrlGenerator};
    pub use actionkit_macro::Injectable;
    pub use async_trait::async_trait;
    pub use axum::http::StatusCode;
    pub use std::sync::Arc;
}

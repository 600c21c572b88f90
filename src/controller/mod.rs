//! The contract shared by every controller.
//!
//! Controllers are plain structs whose collaborators are injected at
//! construction (usually through `#[derive(Injectable)]`). Implementing
//! [`ActionController`] gives them the request and response helpers; the only
//! methods worth overriding are [`router`](ActionController::router) and
//! [`validator`](ActionController::validator), which expose the injected
//! collaborators those helpers need.
//!
//! # Example
//! ```
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
//!     pub async fn create(
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
//! ```

use crate::error::{ActionError, Result};
use crate::http::{ActionRequest, ActionResponse, Params, helpers};
use crate::routing::{RouteParams, UrlGenerator};
use crate::validation::Validator;
use axum::http::StatusCode;
use serde::Serialize;

pub trait ActionController: Send + Sync + 'static {
    /// URL generator used by [`redirect`](Self::redirect) and [`created`](Self::created).
    fn router(&self) -> Result<&dyn UrlGenerator> {
        Err(ActionError::service_not_found("router"))
    }

    /// Validator read by [`validation_errors`](Self::validation_errors).
    fn validator(&self) -> Result<&dyn Validator> {
        Err(ActionError::service_not_found("validator"))
    }

    /// Read `names` from the request; absent names map to `null`.
    fn params<I, S>(&self, request: &ActionRequest, names: I) -> Params
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        request.params(names)
    }

    /// Redirect to a named route with the router's default redirect status.
    fn redirect(
        &self,
        response: ActionResponse,
        route: &str,
        params: impl Into<RouteParams>,
    ) -> Result<ActionResponse>
    where
        Self: Sized,
    {
        let router = self.router()?;
        let url = router.url_for(route, &params.into())?;
        tracing::debug!(route, %url, "redirecting to named route");
        helpers::redirect(response, &url, router.redirect_status())
    }

    /// Redirect to a literal URL.
    fn redirect_to(&self, response: ActionResponse, url: &str) -> Result<ActionResponse>
    where
        Self: Sized,
    {
        let status = self
            .router()
            .map(|router| router.redirect_status())
            .unwrap_or(StatusCode::FOUND);
        helpers::redirect(response, url, status)
    }

    /// JSON response with an explicit status; there is no implied `200`.
    fn ok<T>(&self, response: ActionResponse, data: &T, status: StatusCode) -> Result<ActionResponse>
    where
        Self: Sized,
        T: Serialize + ?Sized,
    {
        self.json_with_status(response, data, status)
    }

    /// `201 Created` pointing `Location` at the new resource's route.
    fn created(
        &self,
        response: ActionResponse,
        route: &str,
        params: impl Into<RouteParams>,
    ) -> Result<ActionResponse>
    where
        Self: Sized,
    {
        Ok(self
            .redirect(response, route, params)?
            .with_status(StatusCode::CREATED))
    }

    fn no_content(&self, response: ActionResponse) -> ActionResponse
    where
        Self: Sized,
    {
        helpers::no_content(response)
    }

    /// The validator's errors as a `400` JSON body.
    fn validation_errors(&self, response: ActionResponse) -> Result<ActionResponse>
    where
        Self: Sized,
    {
        let errors = self.validator()?.errors();
        helpers::bad_request(response, &errors)
    }

    fn json<T>(&self, response: ActionResponse, data: &T) -> Result<ActionResponse>
    where
        Self: Sized,
        T: Serialize + ?Sized,
    {
        self.json_with_status(response, data, StatusCode::OK)
    }

    fn json_with_status<T>(
        &self,
        response: ActionResponse,
        data: &T,
        status: StatusCode,
    ) -> Result<ActionResponse>
    where
        Self: Sized,
        T: Serialize + ?Sized,
    {
        helpers::json(response, data, status)
    }

    fn write(&self, response: ActionResponse, text: &str) -> ActionResponse
    where
        Self: Sized,
    {
        self.write_with_status(response, text, StatusCode::OK)
    }

    fn write_with_status(
        &self,
        response: ActionResponse,
        text: &str,
        status: StatusCode,
    ) -> ActionResponse
    where
        Self: Sized,
    {
        helpers::write(response, text, status)
    }
}

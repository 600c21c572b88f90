use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ActionError>;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Route resolution failed: {0}")]
    RouteResolution(#[from] RouteResolutionError),

    #[error("Service not found: {name}")]
    ServiceNotFound { name: String },

    #[error("Failed to downcast service '{name}' to {type_name}")]
    DowncastFailed { name: String, type_name: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid header value for {header}: {value:?}")]
    InvalidHeader { header: String, value: String },

    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    #[error("Invalid route '{pattern}': {message}")]
    InvalidRoute { pattern: String, message: String },

    #[error("Invalid redirect status: {0}")]
    InvalidRedirectStatus(StatusCode),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of the router collaborator when turning a route name into a URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteResolutionError {
    #[error("no route named '{0}'")]
    UnknownRoute(String),

    #[error("route '{route}' requires parameter '{parameter}'")]
    MissingParameter { route: String, parameter: String },
}

impl ActionError {
    pub fn service_not_found(name: impl Into<String>) -> Self {
        Self::ServiceNotFound { name: name.into() }
    }

    pub fn invalid_route(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRoute {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// HTTP status used when this error escapes to the server.
    pub fn status(&self) -> StatusCode {
        match self {
            ActionError::BodyRead(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(error = %self, status = status.as_u16(), "request failed");

        (
            status,
            Json(json!({
                "statusCode": status.as_u16(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        )
            .into_response()
    }
}

use crate::error::Result;
use crate::http::{ActionRequest, ActionResponse, helpers, is_json_media_type};
use crate::middleware::{Middleware, Next};
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;

/// Rejects requests whose `Content-Type` is not JSON.
///
/// Requests without a content type are rejected as well. Accepted media
/// types are `application/json` and any `application/*+json`.
#[derive(Debug, Clone)]
pub struct JsonOnly {
    status: StatusCode,
}

impl JsonOnly {
    pub fn new() -> Self {
        Self {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Use a different 4xx status for rejected requests.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        debug_assert!(status.is_client_error(), "JsonOnly must reject with a 4xx status");
        self.status = status;
        self
    }

    fn reject(&self, request: &ActionRequest) -> Result<ActionResponse> {
        let received = request.content_type().unwrap_or("none");
        tracing::warn!(
            request_id = %request.id(),
            method = %request.method(),
            path = request.path(),
            content_type = received,
            "rejected non-JSON request"
        );
        helpers::json(
            ActionResponse::new(),
            &json!({
                "error": format!("Content-Type must be {}, got {}", helpers::JSON_CONTENT_TYPE, received),
                "expected": helpers::JSON_CONTENT_TYPE,
            }),
            self.status,
        )
    }
}

impl Default for JsonOnly {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for JsonOnly {
    async fn handle(&self, request: ActionRequest, next: Next) -> Result<ActionResponse> {
        let accepted = request
            .media_type()
            .is_some_and(|media| is_json_media_type(&media));
        if !accepted {
            return self.reject(&request);
        }
        next.run(request).await
    }

    fn name(&self) -> &str {
        "json_only"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::Services;
    use crate::middleware::Pipeline;
    use crate::routing::Action;
    use axum::body::Bytes;
    use axum::http::{Request, header};
    use serde_json::Value;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn gated(calls: &Arc<AtomicUsize>) -> Pipeline {
        gated_with(calls, JsonOnly::new())
    }

    fn gated_with(calls: &Arc<AtomicUsize>, gate: JsonOnly) -> Pipeline {
        let calls = Arc::clone(calls);
        let action = Action::from_fn(move |_request, response| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(helpers::write(response, "reached", StatusCode::OK)) }
        });
        Pipeline::new(vec![Arc::new(gate)], action, Services::default())
    }

    fn request(content_type: Option<&str>) -> ActionRequest {
        let mut builder = Request::builder().method("POST").uri("/userService/create");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        ActionRequest::from_request(builder.body(Bytes::from_static(b"{}")).unwrap())
    }

    #[tokio::test]
    async fn test_rejects_missing_content_type() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = gated(&calls).run(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: Value = response.body_json().unwrap();
        assert_eq!(body["expected"], "application/json");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejects_form_content_type() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = gated(&calls)
            .run(request(Some("application/x-www-form-urlencoded")))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_passes_json_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = gated(&calls)
            .run(request(Some("application/json; charset=utf-8")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body_text(), Some("reached"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_custom_status() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = gated_with(&calls, JsonOnly::new().with_status(StatusCode::BAD_REQUEST));

        let response = pipeline.run(request(Some("text/plain"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

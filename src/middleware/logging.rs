use crate::error::Result;
use crate::http::{ActionRequest, ActionResponse};
use crate::middleware::{Middleware, Next};
use async_trait::async_trait;
use std::time::Instant;

/// Logs each request with its status and latency.
#[derive(Clone, Default)]
pub struct RequestLogging;

#[async_trait]
impl Middleware for RequestLogging {
    async fn handle(&self, request: ActionRequest, next: Next) -> Result<ActionResponse> {
        let id = request.id();
        let method = request.method().clone();
        let uri = request.uri().clone();
        let start = Instant::now();

        tracing::info!(request_id = %id, %method, %uri, "--> request");

        match next.run(request).await {
            Ok(response) => {
                tracing::info!(
                    request_id = %id,
                    %method,
                    %uri,
                    status = response.status().as_u16(),
                    elapsed = ?start.elapsed(),
                    "<-- response"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %id,
                    %method,
                    %uri,
                    error = %e,
                    elapsed = ?start.elapsed(),
                    "<-- failed"
                );
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        "request_logging"
    }
}

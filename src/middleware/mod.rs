use crate::di::Services;
use crate::error::Result;
use crate::http::{ActionRequest, ActionResponse};
use crate::routing::{Action, ActionFuture};
use async_trait::async_trait;
use std::sync::Arc;

mod json_only;
mod logging;

pub use json_only::JsonOnly;
pub use logging::RequestLogging;

/// A stage wrapped around a route's handler.
///
/// Call `next.run(request)` to continue to the inner stages, optionally
/// post-processing what they return; return a response without calling it to
/// short-circuit.
///
/// # Example
/// ```
/// use actionkit::prelude::*;
///
/// struct RequireApiKey;
///
/// #[async_trait]
/// impl Middleware for RequireApiKey {
///     async fn handle(&self, request: ActionRequest, next: Next) -> actionkit::Result<ActionResponse> {
///         if request.header("x-api-key").is_none() {
///             return helpers::json(
///                 ActionResponse::new(),
///                 &serde_json::json!({"error": "missing api key"}),
///                 StatusCode::UNAUTHORIZED,
///             );
///         }
///         next.run(request).await
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, request: ActionRequest, next: Next) -> Result<ActionResponse>;

    /// Label used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A route's middleware chain and handler, composed once at registration.
///
/// Cloning shares the composed chain.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    middleware: Vec<Arc<dyn Middleware>>,
    action: Action,
    services: Services,
}

impl Pipeline {
    pub fn new(middleware: Vec<Arc<dyn Middleware>>, action: Action, services: Services) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                middleware,
                action,
                services,
            }),
        }
    }

    /// Run the whole chain for one request.
    pub fn run(&self, request: ActionRequest) -> ActionFuture {
        Next {
            pipeline: Arc::clone(&self.inner),
            index: 0,
        }
        .run(request)
    }

    pub fn len(&self) -> usize {
        self.inner.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.middleware.is_empty()
    }
}

/// The remaining stages of a pipeline.
pub struct Next {
    pipeline: Arc<PipelineInner>,
    index: usize,
}

impl Next {
    /// Execute the next middleware, or the handler when none are left.
    pub fn run(self, request: ActionRequest) -> ActionFuture {
        match self.pipeline.middleware.get(self.index).cloned() {
            Some(middleware) => {
                let next = Next {
                    pipeline: Arc::clone(&self.pipeline),
                    index: self.index + 1,
                };
                Box::pin(async move { middleware.handle(request, next).await })
            }
            None => self.pipeline.action.call(
                &self.pipeline.services,
                request,
                ActionResponse::new(),
            ),
        }
    }
}

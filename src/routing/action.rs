use crate::controller::ActionController;
use crate::di::{Injectable, Services};
use crate::error::Result;
use crate::http::{ActionRequest, ActionResponse};
use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by every stage of a dispatch pipeline.
pub type ActionFuture = Pin<Box<dyn Future<Output = Result<ActionResponse>> + Send>>;

type CallFn = dyn Fn(&Services, ActionRequest, ActionResponse) -> ActionFuture + Send + Sync;
type VerifyFn = dyn Fn(&Services) -> Result<()> + Send + Sync;

/// The handler bound to a route.
///
/// Either a plain async closure, or a controller method whose controller is
/// built through [`Injectable`] for every request.
#[derive(Clone)]
pub struct Action {
    call: Arc<CallFn>,
    verify: Option<Arc<VerifyFn>>,
    name: &'static str,
}

impl Action {
    /// Wrap an async closure `(request, response) -> Result<response>`.
    pub fn from_fn<F, Fut>(handler: F) -> Self
    where
        F: Fn(ActionRequest, ActionResponse) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ActionResponse>> + Send + 'static,
    {
        Self {
            call: Arc::new(
                move |_: &Services, request: ActionRequest, response: ActionResponse| -> ActionFuture {
                    Box::pin(handler(request, response))
                },
            ),
            verify: None,
            name: type_name::<F>(),
        }
    }

    /// Bind a controller method such as `UserController::create`.
    pub fn bind<C, F, Fut>(method: F) -> Self
    where
        C: ActionController + Injectable,
        F: Fn(Arc<C>, ActionRequest, ActionResponse) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ActionResponse>> + Send + 'static,
    {
        let verify: Arc<VerifyFn> = Arc::new(|services: &Services| C::inject(services).map(drop));
        Self {
            call: Arc::new(
                move |services: &Services, request: ActionRequest, response: ActionResponse| -> ActionFuture {
                    let controller = match C::inject(services) {
                        Ok(controller) => Arc::new(controller),
                        Err(err) => return Box::pin(async move { Err(err) }),
                    };
                    Box::pin(method(controller, request, response))
                },
            ),
            verify: Some(verify),
            name: type_name::<C>(),
        }
    }

    pub fn call(
        &self,
        services: &Services,
        request: ActionRequest,
        response: ActionResponse,
    ) -> ActionFuture {
        (self.call)(services, request, response)
    }

    /// Check that a bound controller can be built from `services`.
    pub fn verify(&self, services: &Services) -> Result<()> {
        match &self.verify {
            Some(verify) => verify(services),
            None => Ok(()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

use crate::di::Services;
use crate::error::Result;

/// Types built by constructor injection from the service locator
///
/// Controllers declare their collaborators as fields and receive them here,
/// once per instantiation. This trait is typically implemented through
/// `#[derive(Injectable)]`.
///
/// # Example
/// ```
/// use actionkit::{Injectable, Services, UrlGenerator};
/// use std::sync::Arc;
///
/// #[derive(Injectable)]
/// pub struct UserController {
///     // Resolved through the trait binding
///     router: Arc<dyn UrlGenerator>,
///     // Resolved by name
///     #[inject(name = "mailer.from")]
///     sender: Arc<String>,
///     // The locator itself
///     services: Services,
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the locator
    ///
    /// # Errors
    /// Returns `ServiceNotFound` if any required dependency is not registered.
    fn inject(services: &Services) -> Result<Self>;
}

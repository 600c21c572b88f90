use proc_macro::TokenStream;

mod injectable;

/// Derive constructor injection for a controller or service
///
/// Every field must be one of:
/// - `Arc<T>`: resolved by type (instances and factories)
/// - `Arc<dyn Trait>`: resolved through the trait binding
/// - `Arc<T>` with `#[inject(name = "...")]`: resolved by name
/// - `Services`: the read-only locator itself
///
/// # Example
/// ```ignore
/// use actionkit::{Injectable, Services, UrlGenerator};
///
/// #[derive(Injectable)]
/// pub struct UserController {
///     router: Arc<dyn UrlGenerator>,
///     #[inject(name = "signup.notice")]
///     notice: Arc<String>,
///     services: Services,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}

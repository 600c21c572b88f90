use crate::di::Container;
use std::sync::Arc;

/// Builder for constructing a service container
///
/// Use this to configure and register services before handing the container
/// to [`Application::builder`](crate::application::Application::builder).
///
/// # Example
/// ```
/// use actionkit::ContainerBuilder;
/// use actionkit::validation::{RuleValidator, Validator};
/// use std::sync::Arc;
///
/// let container = ContainerBuilder::new()
///     .register_factory(RuleValidator::new)
///     .bind::<dyn Validator, RuleValidator, _>(|v| v as Arc<dyn Validator>)
///     .build();
/// assert!(container.contains::<dyn Validator>());
/// ```
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            container: Container::new(),
        }
    }

    /// Register a service instance
    pub fn register<T: 'static + Send + Sync>(mut self, instance: T) -> Self {
        self.container.register(instance);
        self
    }

    /// Register a transient service built fresh for every resolve
    pub fn register_factory<T, F>(mut self, factory: F) -> Self
    where
        T: 'static + Send + Sync,
        F: Fn() -> T + 'static + Send + Sync,
    {
        self.container.register_factory(factory);
        self
    }

    /// Register a service under a name
    pub fn register_named<T: 'static + Send + Sync>(
        mut self,
        name: impl Into<String>,
        instance: T,
    ) -> Self {
        self.container.register_named(name, instance);
        self
    }

    /// Bind a trait to a concrete implementation
    ///
    /// This enables resolving `Arc<dyn Trait>` to the registered implementation.
    /// The implementation must have been registered first (or will be).
    pub fn bind<Trait, Impl, F>(mut self, caster: F) -> Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        self.container.register_trait::<Trait, Impl, F>(caster);
        self
    }

    /// Build the container
    pub fn build(self) -> Container {
        self.container
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

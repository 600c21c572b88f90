use crate::di::Container;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Read-only view of a frozen [`Container`].
///
/// Cloning is cheap; every clone shares the same registrations. Handlers can
/// look services up but never register new ones.
#[derive(Clone)]
pub struct Services {
    container: Arc<Container>,
}

impl Services {
    pub fn new(container: Container) -> Self {
        Self {
            container: Arc::new(container),
        }
    }

    pub fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        self.container.resolve::<T>()
    }

    pub fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        self.container.resolve_trait::<T>()
    }

    pub fn resolve_named<T: 'static + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        self.container.resolve_named::<T>(name)
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.container.contains::<T>()
    }

    pub fn contains_named(&self, name: &str) -> bool {
        self.container.contains_named(name)
    }
}

impl From<Container> for Services {
    fn from(container: Container) -> Self {
        Self::new(container)
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(Container::new())
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("registrations", &self.container.len())
            .finish()
    }
}

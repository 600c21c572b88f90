use crate::error::{ActionError, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

type AnyService = Arc<dyn Any + Send + Sync>;

/// Casts the stored implementation into an `Arc<dyn Trait>` wrapped in another `Arc<dyn Any>`.
type CasterFn = Arc<dyn Fn(AnyService) -> Option<AnyService> + Send + Sync>;

/// Produces a fresh instance on every resolve.
type FactoryFn = Arc<dyn Fn() -> AnyService + Send + Sync>;

/// Service registry used while composing an application.
///
/// Services are registered by type, by trait binding, by name, or as
/// transient factories. Once composition is done the container is frozen
/// into [`Services`](crate::di::Services), which only exposes lookups.
pub struct Container {
    services: DashMap<TypeId, AnyService>,
    factories: DashMap<TypeId, FactoryFn>,
    named: DashMap<String, AnyService>,
    trait_mappings: DashMap<TypeId, TypeId>,
    casters: DashMap<TypeId, CasterFn>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            factories: DashMap::new(),
            named: DashMap::new(),
            trait_mappings: DashMap::new(),
            casters: DashMap::new(),
        }
    }

    pub fn register<T: 'static + Send + Sync>(&mut self, instance: T) -> &mut Self {
        self.services.insert(TypeId::of::<T>(), Arc::new(instance));
        self
    }

    /// Register a transient service: every resolve builds a new instance.
    pub fn register_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn() -> T + 'static + Send + Sync,
    {
        let factory: FactoryFn = Arc::new(move || Arc::new(factory()) as AnyService);
        self.factories.insert(TypeId::of::<T>(), factory);
        self
    }

    /// Register a service under a name, replacing any previous entry.
    pub fn register_named<T: 'static + Send + Sync>(
        &mut self,
        name: impl Into<String>,
        instance: T,
    ) -> &mut Self {
        self.named.insert(name.into(), Arc::new(instance));
        self
    }

    pub fn register_trait<Trait, Impl, F>(&mut self, caster_fn: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        let trait_id = TypeId::of::<Trait>();
        self.trait_mappings.insert(trait_id, TypeId::of::<Impl>());

        let caster: CasterFn = Arc::new(move |instance: AnyService| {
            let concrete = instance.downcast::<Impl>().ok()?;
            let trait_obj: Arc<Trait> = caster_fn(concrete);
            Some(Arc::new(trait_obj) as AnyService)
        });
        self.casters.insert(trait_id, caster);
        self
    }

    fn instance(&self, type_id: &TypeId) -> Option<AnyService> {
        if let Some(entry) = self.services.get(type_id) {
            return Some(entry.value().clone());
        }
        self.factories.get(type_id).map(|factory| (factory.value())())
    }

    pub fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let instance = self
            .instance(&TypeId::of::<T>())
            .ok_or_else(|| ActionError::service_not_found(type_name::<T>()))?;
        instance.downcast::<T>().map_err(|_| ActionError::DowncastFailed {
            name: type_name::<T>().to_string(),
            type_name: type_name::<T>().to_string(),
        })
    }

    pub fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let trait_id = TypeId::of::<T>();
        let not_found = || ActionError::service_not_found(type_name::<T>());

        let impl_id = *self.trait_mappings.get(&trait_id).ok_or_else(not_found)?;
        let caster = self.casters.get(&trait_id).ok_or_else(not_found)?.value().clone();
        let instance = self.instance(&impl_id).ok_or_else(not_found)?;

        let downcast_failed = || ActionError::DowncastFailed {
            name: type_name::<T>().to_string(),
            type_name: format!("Arc<{}>", type_name::<T>()),
        };
        let wrapper = caster(instance)
            .ok_or_else(downcast_failed)?
            .downcast::<Arc<T>>()
            .map_err(|_| downcast_failed())?;
        Ok(wrapper.as_ref().clone())
    }

    pub fn resolve_named<T: 'static + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let instance = self
            .named
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ActionError::service_not_found(name))?;
        instance.downcast::<T>().map_err(|_| ActionError::DowncastFailed {
            name: name.to_string(),
            type_name: type_name::<T>().to_string(),
        })
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.services.contains_key(&type_id)
            || self.factories.contains_key(&type_id)
            || self.trait_mappings.contains_key(&type_id)
    }

    pub fn contains_named(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.services.len() + self.factories.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestService {
        value: i32,
    }

    trait MyTrait: Send + Sync {
        fn get_value(&self) -> i32;
    }

    struct MyTraitImpl {
        value: i32,
    }

    impl MyTrait for MyTraitImpl {
        fn get_value(&self) -> i32 {
            self.value
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut container = Container::new();
        container.register(TestService { value: 42 });
        let service = container.resolve::<TestService>().unwrap();
        assert_eq!(service.value, 42);
    }

    #[test]
    fn test_register_and_resolve_trait() {
        let mut container = Container::new();
        container.register(MyTraitImpl { value: 99 });
        container.register_trait::<dyn MyTrait, MyTraitImpl, _>(|i| i as Arc<dyn MyTrait>);
        let trait_instance = container.resolve_trait::<dyn MyTrait>().unwrap();
        assert_eq!(trait_instance.get_value(), 99);
    }

    #[test]
    fn test_trait_without_implementation_is_not_found() {
        let mut container = Container::new();
        container.register_trait::<dyn MyTrait, MyTraitImpl, _>(|i| i as Arc<dyn MyTrait>);
        let err = container.resolve_trait::<dyn MyTrait>().err().unwrap();
        assert!(matches!(err, ActionError::ServiceNotFound { .. }));
    }

    #[test]
    fn test_factory_builds_fresh_instances() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        let mut container = Container::new();
        container.register_factory(|| TestService {
            value: BUILT.fetch_add(1, Ordering::SeqCst) as i32,
        });

        let first = container.resolve::<TestService>().unwrap();
        let second = container.resolve::<TestService>().unwrap();
        assert_ne!(first.value, second.value);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_named_lookup() {
        let mut container = Container::new();
        container.register_named("answer", TestService { value: 7 });

        assert_eq!(container.resolve_named::<TestService>("answer").unwrap().value, 7);
        assert!(matches!(
            container.resolve_named::<TestService>("question"),
            Err(ActionError::ServiceNotFound { ref name }) if name == "question"
        ));
        assert!(matches!(
            container.resolve_named::<String>("answer"),
            Err(ActionError::DowncastFailed { .. })
        ));
    }

    #[test]
    fn test_missing_service_reports_type_name() {
        let container = Container::new();
        match container.resolve::<TestService>() {
            Err(ActionError::ServiceNotFound { name }) => assert!(name.ends_with("TestService")),
            _ => panic!("expected ServiceNotFound"),
        }
    }
}

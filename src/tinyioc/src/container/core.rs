use std::any::Any;
use std::sync::Arc;

use snafu::prelude::*;
use tracing::{debug, trace};

use crate::container::registry::{
    AlreadyRegisteredSnafu, NotAssignableSnafu, NotConstructibleSnafu,
};
use crate::container::resolver::{CyclicDependencySnafu, NotRegisteredSnafu};
use crate::container::{Managed, ProviderMap, RegistryError, ResolveError, Resolver};
use crate::descriptor::{Component, TypeDescriptor, Upcast};
use crate::key::{KeyType, TypeKey};
use crate::lifetime::Lifetime;
use crate::module::Module;
use crate::provider::component::ComponentProvider;
use crate::provider::instance::InstanceProvider;
use crate::provider::{CallContext, Provider};

/// A registry of construction strategies, which resolves objects by
/// recursively satisfying their constructors from the same registry.
///
/// Registration needs a mutable borrow while resolution only needs a shared
/// one, so a container is fully wired before anything is resolved from it.
/// The registry itself is not synchronized.
///
/// ```rust
/// # use std::sync::Arc;
/// # use tinyioc::prelude::*;
/// trait Store: Send + Sync {}
///
/// struct MemoryStore;
///
/// impl Store for MemoryStore {}
///
/// #[component(dyn Store)]
/// impl MemoryStore {
///     #[inject]
///     fn new() -> Self {
///         Self
///     }
/// }
///
/// let mut container = Container::new();
/// container.register_component::<dyn Store, MemoryStore>().unwrap();
///
/// let first = container.resolve::<dyn Store>().unwrap();
/// let second = container.resolve::<dyn Store>().unwrap();
/// assert!(!Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug)]
pub struct Container {
    providers: ProviderMap,
}

impl Container {
    pub fn new() -> Self {
        Self {
            providers: ProviderMap::new(),
        }
    }

    /// Creates a container and lets `module` register everything into it.
    ///
    /// # Errors
    ///
    /// Returns the first registration error raised by `module`.
    pub fn init<M>(module: M) -> Result<Self, RegistryError>
    where
        M: Module,
    {
        let mut container = Self::new();
        module.configure(&mut container)?;
        Ok(container)
    }

    /// Registers the implementation described by `implementation` under the
    /// key `K`. Each resolution of `K` constructs a new object.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyRegistered`] if `K` is already registered.
    /// - [`RegistryError::NotConstructible`] if `implementation` is abstract.
    /// - [`RegistryError::NotAssignable`] if `implementation` doesn't satisfy
    ///   the contract of `K`.
    ///
    /// The container is left unchanged on error.
    pub fn register<K>(
        &mut self,
        implementation: impl Into<TypeDescriptor>,
    ) -> Result<(), RegistryError>
    where
        K: KeyType + ?Sized,
    {
        let mut descriptor = implementation.into();
        let key = TypeKey::of::<K>();
        let upcast = self.validate::<K>(&mut descriptor)?;

        let implementation = descriptor.key();
        let constructors = descriptor.into_constructors();
        let provider = ComponentProvider::new(implementation, constructors, upcast);
        self.insert(key, Box::new(provider));
        debug!(%key, %implementation, lifetime = %Lifetime::Transient, "registered");
        Ok(())
    }

    /// Registers the [`Component`] `T` under the key `K`.
    ///
    /// # Errors
    ///
    /// See [`Container::register`].
    pub fn register_component<K, T>(&mut self) -> Result<(), RegistryError>
    where
        K: KeyType + ?Sized,
        T: Component,
    {
        self.register::<K>(TypeDescriptor::of::<T>())
    }

    /// Registers an already constructed object under the key `K`. Every
    /// resolution of `K` returns this very object.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyRegistered`] if `K` is already registered.
    /// - [`RegistryError::NotAssignable`] if `T` doesn't satisfy the contract
    ///   of `K`.
    ///
    /// The container is left unchanged on error.
    pub fn register_instance<K, T>(&mut self, instance: Arc<T>) -> Result<(), RegistryError>
    where
        K: KeyType + ?Sized,
        T: Component,
    {
        let mut descriptor = TypeDescriptor::of::<T>();
        let key = TypeKey::of::<K>();
        let upcast = self.validate::<K>(&mut descriptor)?;

        let instance = upcast.apply(instance as Arc<dyn Any + Send + Sync>);
        self.insert(key, Box::new(InstanceProvider::new(instance)));
        debug!(%key, implementation = %descriptor.key(), lifetime = %Lifetime::Singleton, "registered");
        Ok(())
    }

    /// Registers an already constructed object under its own key `K`, which
    /// may be a foreign type or a trait object. Every resolution of `K`
    /// returns this very object.
    ///
    /// # Errors
    ///
    /// [`RegistryError::AlreadyRegistered`] if `K` is already registered.
    pub fn register_shared<K>(&mut self, instance: Arc<K>) -> Result<(), RegistryError>
    where
        K: KeyType + ?Sized,
    {
        let key = TypeKey::of::<K>();
        ensure!(
            !self.providers.contains(key),
            AlreadyRegisteredSnafu {
                key,
                implementation: key
            }
        );

        self.insert(key, Box::new(InstanceProvider::new(instance)));
        debug!(%key, implementation = %key, lifetime = %Lifetime::Singleton, "registered");
        Ok(())
    }

    pub fn is_registered<K>(&self) -> bool
    where
        K: ?Sized + 'static,
    {
        self.providers.contains(TypeKey::of::<K>())
    }

    /// Returns all registered keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.providers.keys()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate<K>(&self, descriptor: &mut TypeDescriptor) -> Result<Upcast<K>, RegistryError>
    where
        K: KeyType + ?Sized,
    {
        let key = TypeKey::of::<K>();
        let implementation = descriptor.key();

        ensure!(
            !self.providers.contains(key),
            AlreadyRegisteredSnafu {
                key,
                implementation
            }
        );
        ensure!(
            !descriptor.is_abstract(),
            NotConstructibleSnafu {
                key,
                implementation
            }
        );
        descriptor.take_upcast::<K>().context(NotAssignableSnafu {
            key,
            implementation,
        })
    }

    fn insert(&mut self, key: TypeKey, provider: Box<dyn Provider>) {
        if self.providers.insert(key, provider).is_err() {
            unreachable!("the key {key} should be checked to be absent before insertion")
        }
    }

    fn resolve_in(&self, context: &CallContext<'_>) -> Result<Box<dyn Managed>, ResolveError> {
        let key = context.key();
        let Some(provider) = self.providers.get(key) else {
            return NotRegisteredSnafu { key }.fail();
        };

        let trace = context.trace();
        // Shared instances never construct anything, so they can't close a cycle.
        if provider.lifetime() == Lifetime::Transient && trace.previous_exist_key(key) {
            return CyclicDependencySnafu { key }.fail();
        }

        trace!(%key, depth = trace.depth(), lifetime = %provider.lifetime(), "resolving");
        provider.dyn_provide(self, context)
    }
}

impl Resolver for Container {
    fn dyn_resolve(&self, key: TypeKey) -> Result<Box<dyn Managed>, ResolveError> {
        let context = CallContext::new(key);
        self.resolve_in(&context)
    }

    fn dyn_resolve_dependency<'a>(
        &self,
        key: TypeKey,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn Managed>, ResolveError> {
        let context = context.append(key);
        self.resolve_in(&context)
    }

    fn contains(&self, key: TypeKey) -> bool {
        self.providers.contains(key)
    }
}

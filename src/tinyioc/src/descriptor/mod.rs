mod constructor;

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::container::Managed;
use crate::key::{KeyType, TypeKey};

pub use constructor::{Arguments, Constructor};
pub(crate) use constructor::ErasedConstructor;

/// A concrete type which declares how a container constructs it.
///
/// Usually, you don't need to implement [`Component`] manually, because the
/// [`component`] macro generates the implementation from the associated
/// functions marked with `#[inject]`. A hand-written implementation looks
/// like this:
///
/// ```rust
/// # use std::sync::Arc;
/// # use tinyioc::descriptor::{Component, ComponentDescriptor, Constructor};
/// # use tinyioc::key::TypeKey;
/// trait Clock: Send + Sync {}
///
/// trait Timer: Send + Sync {}
///
/// struct SystemTimer {
///     clock: Option<Arc<dyn Clock>>,
/// }
///
/// impl Timer for SystemTimer {}
///
/// impl Component for SystemTimer {
///     fn describe() -> ComponentDescriptor<Self> {
///         ComponentDescriptor::new()
///             .constructor(Constructor::new(Vec::new(), |_| Ok(Self { clock: None })))
///             .constructor(Constructor::new(
///                 vec![TypeKey::of::<dyn Clock>()],
///                 |arguments| Ok(Self { clock: Some(arguments.next::<dyn Clock>()?) }),
///             ))
///             .implements::<dyn Timer>(|timer| timer)
///     }
/// }
/// ```
///
/// [`component`]: crate::component
pub trait Component: Managed + Sized {
    /// Returns the constructors and contracts of this type.
    fn describe() -> ComponentDescriptor<Self>;
}

/// A typed builder of the [`TypeDescriptor`] of a concrete type `T`.
///
/// A new builder already declares that `T` satisfies its own key.
pub struct ComponentDescriptor<T>
where
    T: Managed,
{
    constructors: Vec<Constructor<T>>,
    contracts: HashMap<TypeKey, Contract>,
}

impl<T> ComponentDescriptor<T>
where
    T: Managed,
{
    pub fn new() -> Self {
        let this = Self {
            constructors: Vec::new(),
            contracts: HashMap::new(),
        };
        this.implements::<T>(|object| object)
    }

    /// Declares a constructor. Declaration order breaks ties between viable
    /// constructors of the same arity.
    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Declares that `T` satisfies the contract of `K`, with `upcast`
    /// converting a constructed `T` to a `K`. For trait objects this is
    /// simply `|object| object`.
    pub fn implements<K>(mut self, upcast: impl Fn(Arc<T>) -> Arc<K> + Send + Sync + 'static) -> Self
    where
        K: KeyType + ?Sized,
    {
        let upcast = Upcast::<K>::new(move |object| match object.downcast::<T>() {
            Ok(object) => upcast(object),
            Err(_) => unreachable!("the object should be constructed by the descriptor of `T`"),
        });
        self.contracts
            .insert(TypeKey::of::<K>(), Contract::Upcast(Box::new(upcast)));
        self
    }
}

impl<T> Debug for ComponentDescriptor<T>
where
    T: Managed,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ComponentDescriptor<T>")
            .field("constructors", &self.constructors)
            .field("contracts", &self.contracts.keys())
            .finish()
    }
}

/// Everything a container needs to know about an implementation type: its
/// identity, whether it can be instantiated, which keys it is assignable to,
/// and its constructor signatures.
pub struct TypeDescriptor {
    key: TypeKey,
    is_abstract: bool,
    constructors: Vec<ErasedConstructor>,
    contracts: HashMap<TypeKey, Contract>,
}

impl TypeDescriptor {
    /// Describes a concrete [`Component`].
    pub fn of<T>() -> Self
    where
        T: Component,
    {
        T::describe().into()
    }

    /// Describes an abstract type, typically a trait object. An abstract type
    /// satisfies its own contract but can never be registered as an
    /// implementation.
    pub fn abstract_type<K>() -> Self
    where
        K: ?Sized + 'static,
    {
        let key = TypeKey::of::<K>();
        Self {
            key,
            is_abstract: true,
            constructors: Vec::new(),
            contracts: HashMap::from([(key, Contract::Declared)]),
        }
    }

    /// Records that this type also satisfies the contract of `K`, e.g. a
    /// trait with `K` as its supertrait.
    ///
    /// Such a fact carries no upcast, so it only matters for abstract types.
    /// Concrete types declare their contracts through
    /// [`ComponentDescriptor::implements`].
    pub fn extends<K>(mut self) -> Self
    where
        K: ?Sized + 'static,
    {
        self.contracts
            .entry(TypeKey::of::<K>())
            .or_insert(Contract::Declared);
        self
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_assignable_to(&self, key: TypeKey) -> bool {
        self.contracts.contains_key(&key)
    }

    /// Parameter lists of the declared constructors, in declaration order.
    pub fn constructor_signatures(&self) -> impl Iterator<Item = &[TypeKey]> + '_ {
        self.constructors.iter().map(ErasedConstructor::parameters)
    }

    /// Removes and returns the upcast to `K`, if this type declared one.
    pub(crate) fn take_upcast<K>(&mut self) -> Option<Upcast<K>>
    where
        K: KeyType + ?Sized,
    {
        match self.contracts.remove(&TypeKey::of::<K>()) {
            Some(Contract::Upcast(upcast)) => upcast.downcast::<Upcast<K>>().ok().map(|b| *b),
            Some(Contract::Declared) | None => None,
        }
    }

    pub(crate) fn into_constructors(self) -> Vec<ErasedConstructor> {
        self.constructors
    }
}

impl<T> From<ComponentDescriptor<T>> for TypeDescriptor
where
    T: Managed,
{
    fn from(descriptor: ComponentDescriptor<T>) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            is_abstract: false,
            constructors: descriptor
                .constructors
                .into_iter()
                .map(Constructor::erase)
                .collect(),
            contracts: descriptor.contracts,
        }
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TypeDescriptor")
            .field("key", &self.key)
            .field("is_abstract", &self.is_abstract)
            .field("constructors", &self.constructors)
            .field("contracts", &self.contracts.keys())
            .finish()
    }
}

/// An assignability fact of an implementation type.
enum Contract {
    Declared,
    /// Holds an [`Upcast<K>`] for the contract's key `K`.
    Upcast(Box<dyn Any + Send + Sync>),
}

/// Converts a type-erased `Arc<T>` produced by a descriptor's constructor to
/// `Arc<K>`.
pub(crate) struct Upcast<K>
where
    K: KeyType + ?Sized,
{
    upcast: Box<dyn Fn(Arc<dyn Any + Send + Sync>) -> Arc<K> + Send + Sync>,
}

impl<K> Upcast<K>
where
    K: KeyType + ?Sized,
{
    fn new<F>(upcast: F) -> Self
    where
        F: Fn(Arc<dyn Any + Send + Sync>) -> Arc<K> + Send + Sync + 'static,
    {
        Self {
            upcast: Box::new(upcast),
        }
    }

    pub fn apply(&self, object: Arc<dyn Any + Send + Sync>) -> Arc<K> {
        (self.upcast)(object)
    }
}

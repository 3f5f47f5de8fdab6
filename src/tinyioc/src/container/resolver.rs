use std::error::Error;
use std::sync::Arc;

use snafu::prelude::*;

use crate::container::Managed;
use crate::key::{KeyType, TypeKey};
use crate::provider::CallContext;
use crate::util::any::Downcast;

/// The read side of a container.
///
/// Every object returned by [`Resolver::dyn_resolve`] for a key `K` is a
/// type-erased `Arc<K>`. Prefer [`TypedResolver::resolve`], which restores the
/// static type.
#[cfg_attr(test, mockall::automock)]
pub trait Resolver: Send + Sync {
    /// Resolves a top-level request for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not registered, or if constructing the
    /// object or any of its transitive dependencies fails.
    fn dyn_resolve(&self, key: TypeKey) -> Result<Box<dyn Managed>, ResolveError>;

    /// Resolves `key` as a dependency of the object being constructed in
    /// `context`.
    ///
    /// # Errors
    ///
    /// Same as [`Resolver::dyn_resolve`]. Additionally fails with
    /// [`ResolveError::CyclicDependency`] if `key` is already being
    /// constructed further up in `context`.
    fn dyn_resolve_dependency<'a>(
        &self,
        key: TypeKey,
        context: &'a CallContext<'a>,
    ) -> Result<Box<dyn Managed>, ResolveError>;

    /// Returns true if `key` currently has a registration.
    fn contains(&self, key: TypeKey) -> bool;
}

pub trait TypedResolver: Resolver {
    /// Resolves an object registered under `K`.
    ///
    /// # Errors
    ///
    /// See [`Resolver::dyn_resolve`].
    fn resolve<K>(&self) -> Result<Arc<K>, ResolveError>
    where
        K: KeyType + ?Sized,
    {
        let boxed = self.dyn_resolve(TypeKey::of::<K>())?;
        match boxed.downcast::<Arc<K>>() {
            Ok(object) => Ok(*object),
            Err(_) => unreachable!("the object's type should be `Arc<K>`"),
        }
    }
}

impl<T> TypedResolver for T where T: Resolver {}

impl TypedResolver for dyn Resolver + '_ {}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum ResolveError {
    #[snafu(display("could not resolve {key}, because it has not been registered yet"))]
    #[non_exhaustive]
    NotRegistered { key: TypeKey },
    #[snafu(display(
        "could not construct {key}, because none of its constructors has all its argument types registered"
    ))]
    #[non_exhaustive]
    NoViableConstructor { key: TypeKey },
    #[snafu(display("could not construct {key} which depends on itself somehow"))]
    #[non_exhaustive]
    CyclicDependency { key: TypeKey },
    #[snafu(display(
        "could not construct {key}, because argument {position} was read as {expected} but is {found}"
    ))]
    #[non_exhaustive]
    ArgumentMismatch {
        key: TypeKey,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[snafu(display("could not construct {key}"))]
    #[non_exhaustive]
    ObjectConstruction {
        key: TypeKey,
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl ResolveError {
    /// Returns the key of the type whose resolution or construction failed.
    pub fn key(&self) -> TypeKey {
        match self {
            Self::NotRegistered { key }
            | Self::NoViableConstructor { key }
            | Self::CyclicDependency { key }
            | Self::ArgumentMismatch { key, .. }
            | Self::ObjectConstruction { key, .. } => *key,
        }
    }
}

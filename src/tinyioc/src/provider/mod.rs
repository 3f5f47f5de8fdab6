pub mod component;
pub mod instance;

mod context;

use std::fmt::Debug;

use crate::container::{Managed, ResolveError, Resolver};
use crate::lifetime::Lifetime;

pub use context::{CallContext, InjectionTrace};

/// A factory which hands out objects registered under one key.
///
/// Every object returned by a [`Provider`] registered under a key `K` must be
/// a type-erased `Arc<K>`. Dependencies of the object, if any, are retrieved
/// from the [`Resolver`], passing `context` along so that the resolver can
/// keep track of the objects under construction.
pub trait Provider: Debug + Send + Sync + 'static {
    /// Provides a type-erased object.
    ///
    /// # Errors
    ///
    /// Returns an error if any dependency can't be resolved or the object
    /// construction fails.
    fn dyn_provide(
        &self,
        resolver: &dyn Resolver,
        context: &CallContext<'_>,
    ) -> Result<Box<dyn Managed>, ResolveError>;

    /// Returns whether each request receives a new object.
    fn lifetime(&self) -> Lifetime;
}

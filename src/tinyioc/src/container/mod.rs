mod core;
mod registry;
mod resolver;

use crate::util::any::AsAny;

pub use self::core::Container;
pub use registry::RegistryError;
pub(crate) use registry::ProviderMap;
pub use resolver::{ResolveError, Resolver, TypedResolver};

#[cfg(test)]
pub(crate) use resolver::MockResolver;

/// A type-erasable object which can be handed out by a container.
pub trait Managed: AsAny + Send + Sync + 'static {}

impl<T> Managed for T where T: AsAny + Send + Sync + 'static {}

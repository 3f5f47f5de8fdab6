use std::fmt::{Debug, Formatter, Result as FmtResult};

use tracing::{debug, trace};

use crate::container::{Managed, ResolveError, Resolver};
use crate::descriptor::{Arguments, ErasedConstructor, Upcast};
use crate::key::{KeyType, TypeKey};
use crate::lifetime::Lifetime;
use crate::provider::{CallContext, Provider};

/// A transient factory which constructs a new implementation object on every
/// request and hands it out as a `K`.
///
/// The constructor is selected on every request, so registrations added after
/// this provider was created are taken into account.
pub struct ComponentProvider<K>
where
    K: KeyType + ?Sized,
{
    implementation: TypeKey,
    constructors: Vec<ErasedConstructor>,
    upcast: Upcast<K>,
}

impl<K> ComponentProvider<K>
where
    K: KeyType + ?Sized,
{
    pub(crate) fn new(
        implementation: TypeKey,
        constructors: Vec<ErasedConstructor>,
        upcast: Upcast<K>,
    ) -> Self {
        Self {
            implementation,
            constructors,
            upcast,
        }
    }

    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    /// Picks the viable constructor with the most parameters. Among several
    /// of them, the first declared one wins.
    fn select_constructor(
        &self,
        resolver: &dyn Resolver,
    ) -> Result<&ErasedConstructor, ResolveError> {
        self.constructors
            .iter()
            .filter(|constructor| {
                constructor
                    .parameters()
                    .iter()
                    .all(|parameter| resolver.contains(*parameter))
            })
            .reduce(|best, constructor| {
                if constructor.arity() > best.arity() {
                    constructor
                } else {
                    best
                }
            })
            .ok_or(ResolveError::NoViableConstructor {
                key: self.implementation,
            })
    }

    fn resolve_arguments(
        &self,
        constructor: &ErasedConstructor,
        resolver: &dyn Resolver,
        context: &CallContext<'_>,
    ) -> Result<Arguments, ResolveError> {
        let values = constructor
            .parameters()
            .iter()
            .map(|parameter| resolver.dyn_resolve_dependency(*parameter, context))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Arguments::new(self.implementation, values))
    }
}

impl<K> Debug for ComponentProvider<K>
where
    K: KeyType + ?Sized,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ComponentProvider<K>")
            .field("implementation", &self.implementation)
            .field("constructors", &self.constructors)
            .finish_non_exhaustive()
    }
}

impl<K> Provider for ComponentProvider<K>
where
    K: KeyType + ?Sized,
{
    fn dyn_provide(
        &self,
        resolver: &dyn Resolver,
        context: &CallContext<'_>,
    ) -> Result<Box<dyn Managed>, ResolveError> {
        let constructor = self.select_constructor(resolver)?;
        debug!(
            key = %context.key(),
            implementation = %self.implementation,
            arity = constructor.arity(),
            "selected constructor"
        );

        let arguments = self.resolve_arguments(constructor, resolver, context)?;
        let object = constructor.invoke(arguments)?;
        trace!(implementation = %self.implementation, "constructed object");
        Ok(Box::new(self.upcast.apply(object)))
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Transient
    }
}

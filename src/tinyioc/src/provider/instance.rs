use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::container::{Managed, ResolveError, Resolver};
use crate::key::KeyType;
use crate::lifetime::Lifetime;
use crate::provider::{CallContext, Provider};

/// A factory which always hands out the same object.
pub struct InstanceProvider<K>
where
    K: KeyType + ?Sized,
{
    instance: Arc<K>,
}

impl<K> InstanceProvider<K>
where
    K: KeyType + ?Sized,
{
    pub fn new(instance: Arc<K>) -> Self {
        Self { instance }
    }
}

impl<K> Debug for InstanceProvider<K>
where
    K: KeyType + ?Sized,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InstanceProvider<K>")
            .finish_non_exhaustive()
    }
}

impl<K> Provider for InstanceProvider<K>
where
    K: KeyType + ?Sized,
{
    fn dyn_provide(
        &self,
        _resolver: &dyn Resolver,
        _context: &CallContext<'_>,
    ) -> Result<Box<dyn Managed>, ResolveError> {
        Ok(Box::new(Arc::clone(&self.instance)))
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Singleton
    }
}

use std::any::{self, Any};
use std::error::Error;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::vec::IntoIter;

use crate::container::{Managed, ResolveError};
use crate::key::{KeyType, TypeKey};
use crate::util::any::Downcast;

type BuildFn<T> = dyn Fn(&mut Arguments) -> Result<T, ResolveError> + Send + Sync;

/// A declared way of constructing a `T` from registered dependencies.
///
/// The parameter list drives viability checks and dependency resolution,
/// while the build function reads the resolved dependencies back from
/// [`Arguments`] in the same order.
///
/// ```rust
/// # use std::sync::Arc;
/// # use tinyioc::descriptor::Constructor;
/// # use tinyioc::key::TypeKey;
/// trait Logger: Send + Sync {}
///
/// struct Service {
///     logger: Arc<dyn Logger>,
/// }
///
/// let constructor = Constructor::new(vec![TypeKey::of::<dyn Logger>()], |arguments| {
///     Ok(Service {
///         logger: arguments.next::<dyn Logger>()?,
///     })
/// });
/// assert_eq!(constructor.arity(), 1);
/// ```
pub struct Constructor<T> {
    parameters: Vec<TypeKey>,
    build: Box<BuildFn<T>>,
}

impl<T> Constructor<T>
where
    T: Managed,
{
    pub fn new<F>(parameters: Vec<TypeKey>, build: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T, ResolveError> + Send + Sync + 'static,
    {
        Self {
            parameters,
            build: Box::new(build),
        }
    }

    pub fn parameters(&self) -> &[TypeKey] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub(crate) fn erase(self) -> ErasedConstructor {
        let build = self.build;
        ErasedConstructor {
            parameters: self.parameters,
            build: Box::new(move |arguments: &mut Arguments| {
                build(arguments).map(|object| -> Arc<dyn Any + Send + Sync> { Arc::new(object) })
            }),
        }
    }
}

impl<T> Debug for Constructor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Constructor<T>")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// A [`Constructor`] whose output is erased to `Arc<dyn Any>`.
pub(crate) struct ErasedConstructor {
    parameters: Vec<TypeKey>,
    build: Box<BuildFn<Arc<dyn Any + Send + Sync>>>,
}

impl ErasedConstructor {
    pub fn parameters(&self) -> &[TypeKey] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn invoke(
        &self,
        mut arguments: Arguments,
    ) -> Result<Arc<dyn Any + Send + Sync>, ResolveError> {
        (self.build)(&mut arguments)
    }
}

impl Debug for ErasedConstructor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ErasedConstructor")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Resolved dependencies handed to a constructor, in parameter order.
pub struct Arguments {
    target: TypeKey,
    values: IntoIter<Box<dyn Managed>>,
    position: usize,
}

impl Arguments {
    pub(crate) fn new(target: TypeKey, values: Vec<Box<dyn Managed>>) -> Self {
        Self {
            target,
            values: values.into_iter(),
            position: 0,
        }
    }

    /// The type being constructed.
    pub fn target(&self) -> TypeKey {
        self.target
    }

    /// Takes the next argument, which should have been declared as `K`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ArgumentMismatch`] if the arguments are
    /// exhausted or the next one was resolved for a different key.
    pub fn next<K>(&mut self) -> Result<Arc<K>, ResolveError>
    where
        K: KeyType + ?Sized,
    {
        let position = self.position;
        self.position += 1;

        let Some(value) = self.values.next() else {
            return Err(self.mismatch::<K>(position, "nothing"));
        };
        match value.downcast::<Arc<K>>() {
            Ok(object) => Ok(*object),
            Err(value) => Err(self.mismatch::<K>(position, (*value).type_name())),
        }
    }

    /// Wraps an error returned by a fallible constructor.
    pub fn fail<E>(&self, err: E) -> ResolveError
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        ResolveError::ObjectConstruction {
            key: self.target,
            source: Arc::from(err.into()),
        }
    }

    fn mismatch<K>(&self, position: usize, found: &'static str) -> ResolveError
    where
        K: KeyType + ?Sized,
    {
        ResolveError::ArgumentMismatch {
            key: self.target,
            position,
            expected: any::type_name::<Arc<K>>(),
            found,
        }
    }
}

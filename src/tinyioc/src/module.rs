use crate::container::{Container, RegistryError};

/// A unit of wiring which registers a group of related objects.
///
/// Closures taking a `&mut Container` are modules as well.
pub trait Module: 'static {
    /// Registers objects into `container`.
    ///
    /// # Errors
    ///
    /// Returns the first registration error.
    fn configure(&self, container: &mut Container) -> Result<(), RegistryError>;
}

impl<F> Module for F
where
    F: Fn(&mut Container) -> Result<(), RegistryError> + 'static,
{
    fn configure(&self, container: &mut Container) -> Result<(), RegistryError> {
        self(container)
    }
}

/// An ordered composition of [`Module`]s.
#[derive(Default)]
pub struct Configuration {
    modules: Vec<Box<dyn Module>>,
}

impl Configuration {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with<M: Module>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn compose(mut self, mut other: Configuration) -> Self {
        self.modules.append(&mut other.modules);
        self
    }
}

impl Module for Configuration {
    fn configure(&self, container: &mut Container) -> Result<(), RegistryError> {
        self.modules
            .iter()
            .try_for_each(|module| module.configure(container))
    }
}

use std::collections::HashMap;

use snafu::prelude::*;

use crate::key::TypeKey;
use crate::provider::Provider;

#[derive(Debug, Default)]
pub struct ProviderMap {
    providers: HashMap<TypeKey, Box<dyn Provider>>,
}

impl ProviderMap {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Inserts a provider unless `key` is already taken, in which case the
    /// rejected provider is handed back.
    pub fn insert(
        &mut self,
        key: TypeKey,
        provider: Box<dyn Provider>,
    ) -> Result<(), Box<dyn Provider>> {
        if self.providers.contains_key(&key) {
            Err(provider)
        } else {
            self.providers.insert(key, provider);
            Ok(())
        }
    }

    pub fn get(&self, key: TypeKey) -> Option<&dyn Provider> {
        self.providers.get(&key).map(AsRef::as_ref)
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.providers.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.providers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum RegistryError {
    #[snafu(display(
        "could not register {implementation} as {key}, because {key} has already been registered"
    ))]
    #[non_exhaustive]
    AlreadyRegistered {
        key: TypeKey,
        implementation: TypeKey,
    },
    #[snafu(display(
        "could not register {implementation} as {key}, because {implementation} is abstract and cannot be constructed"
    ))]
    #[non_exhaustive]
    NotConstructible {
        key: TypeKey,
        implementation: TypeKey,
    },
    #[snafu(display(
        "could not register {implementation} as {key}, because {implementation} is not assignable to {key}"
    ))]
    #[non_exhaustive]
    NotAssignable {
        key: TypeKey,
        implementation: TypeKey,
    },
}

#![allow(clippy::new_without_default)]

pub mod container;
pub mod descriptor;
pub mod key;
pub mod lifetime;
pub mod module;
pub mod provider;
mod util;

pub use tinyioc_derive::component;

pub mod prelude {
    pub use crate::component;
    pub use crate::container::{Container, RegistryError, ResolveError, TypedResolver};
    pub use crate::descriptor::{Component, ComponentDescriptor, Constructor, TypeDescriptor};
    pub use crate::key::TypeKey;
    pub use crate::module::{Configuration, Module};
}

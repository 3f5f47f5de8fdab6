use std::sync::Arc;

use tinyioc::prelude::*;

pub trait Source: Send + Sync {}

pub trait Sink: Send + Sync {}

pub struct Pipe {
    _source: Option<Arc<dyn Source>>,
    _sink: Option<Arc<dyn Sink>>,
}

impl Source for Pipe {}

impl Sink for Pipe {}

#[component(dyn Source, dyn Sink)]
impl Pipe {
    #[inject]
    pub fn new() -> Self {
        Self {
            _source: None,
            _sink: None,
        }
    }

    #[inject]
    pub fn with_source(source: Arc<dyn Source>) -> Self {
        Self {
            _source: Some(source),
            _sink: None,
        }
    }

    #[inject]
    pub fn with_both(source: std::sync::Arc<dyn Source>, sink: Arc<dyn Sink>) -> Self {
        Self {
            _source: Some(source),
            _sink: Some(sink),
        }
    }
}

fn main() {
    let descriptor = TypeDescriptor::of::<Pipe>();
    assert_eq!(descriptor.constructor_signatures().count(), 3);
    assert!(descriptor.is_assignable_to(TypeKey::of::<dyn Source>()));
    assert!(descriptor.is_assignable_to(TypeKey::of::<dyn Sink>()));
}

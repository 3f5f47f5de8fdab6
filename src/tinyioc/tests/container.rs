use std::error::Error;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tinyioc::container::Resolver;
use tinyioc::prelude::*;

trait Base: Send + Sync {
    fn id(&self) -> u32;
}

trait Simple: Base {
    fn name(&self) -> &str;
}

struct SimpleObject;

impl Base for SimpleObject {
    fn id(&self) -> u32 {
        1
    }
}

impl Simple for SimpleObject {
    fn name(&self) -> &str {
        "simple"
    }
}

#[component(dyn Simple, dyn Base)]
impl SimpleObject {
    #[inject]
    fn new() -> Self {
        Self
    }
}

struct CompositeObject {
    simple: Arc<dyn Simple>,
}

#[component]
impl CompositeObject {
    #[inject]
    fn new(simple: Arc<dyn Simple>) -> Self {
        Self { simple }
    }
}

struct MultiConstructorObject {
    simple: Option<Arc<dyn Simple>>,
    composite: Option<Arc<CompositeObject>>,
}

#[component]
impl MultiConstructorObject {
    #[inject]
    fn new() -> Self {
        Self {
            simple: None,
            composite: None,
        }
    }

    #[inject]
    fn with_simple(simple: Arc<dyn Simple>) -> Self {
        Self {
            simple: Some(simple),
            composite: None,
        }
    }

    #[inject]
    fn with_all(simple: Arc<dyn Simple>, composite: Arc<CompositeObject>) -> Self {
        Self {
            simple: Some(simple),
            composite: Some(composite),
        }
    }
}

struct Chicken {
    egg: Arc<Egg>,
}

#[component]
impl Chicken {
    #[inject]
    fn new(egg: Arc<Egg>) -> Self {
        Self { egg }
    }
}

struct Egg {
    mother: Option<Arc<Chicken>>,
}

#[component]
impl Egg {
    #[inject]
    fn new() -> Self {
        Self { mother: None }
    }

    #[inject]
    fn laid_by(mother: Arc<Chicken>) -> Self {
        Self {
            mother: Some(mother),
        }
    }
}

struct Disk;

#[component]
impl Disk {
    #[inject]
    fn mount() -> Result<Self, io::Error> {
        Err(io::Error::other("disk is gone"))
    }
}

static COUNTED: Mutex<usize> = Mutex::new(0);

struct Counted;

#[component]
impl Counted {
    #[inject]
    fn new() -> Self {
        *COUNTED.lock() += 1;
        Self
    }
}

#[test]
fn container_resolves_object_under_every_declared_contract() {
    let mut container = Container::new();
    container.register_component::<dyn Simple, SimpleObject>().unwrap();
    container.register_component::<dyn Base, SimpleObject>().unwrap();
    container.register_component::<SimpleObject, SimpleObject>().unwrap();

    assert_eq!(container.resolve::<dyn Simple>().unwrap().name(), "simple");
    assert_eq!(container.resolve::<dyn Base>().unwrap().id(), 1);
    assert!(container.resolve::<SimpleObject>().is_ok());
    assert_eq!(container.len(), 3);
}

#[test]
fn container_resolves_dependencies_registered_later() {
    let mut container = Container::new();
    container.register_component::<CompositeObject, CompositeObject>().unwrap();
    container.register_component::<dyn Simple, SimpleObject>().unwrap();

    let composite = container.resolve::<CompositeObject>().unwrap();
    assert_eq!(composite.simple.name(), "simple");
}

#[test]
fn container_selects_richest_viable_constructor() {
    let mut container = Container::new();
    container
        .register_component::<MultiConstructorObject, MultiConstructorObject>()
        .unwrap();

    let object = container.resolve::<MultiConstructorObject>().unwrap();
    assert!(object.simple.is_none());
    assert!(object.composite.is_none());

    container.register_component::<dyn Simple, SimpleObject>().unwrap();
    let object = container.resolve::<MultiConstructorObject>().unwrap();
    assert!(object.simple.is_some());
    assert!(object.composite.is_none());

    container.register_component::<CompositeObject, CompositeObject>().unwrap();
    let object = container.resolve::<MultiConstructorObject>().unwrap();
    assert!(object.simple.is_some());
    assert_eq!(object.composite.as_ref().unwrap().simple.id(), 1);
}

#[test]
fn container_constructs_new_object_on_every_resolution() {
    let mut container = Container::new();
    container.register_component::<Counted, Counted>().unwrap();
    container.register_component::<dyn Simple, SimpleObject>().unwrap();

    let first = container.resolve::<Counted>().unwrap();
    let second = container.resolve::<Counted>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(*COUNTED.lock(), 2);

    let first = container.resolve::<dyn Simple>().unwrap();
    let second = container.resolve::<dyn Simple>().unwrap();
    assert!(!std::ptr::addr_eq(Arc::as_ptr(&first), Arc::as_ptr(&second)));
}

#[test]
fn container_hands_out_registered_instance() {
    let mut container = Container::new();
    let instance = Arc::new(SimpleObject);
    container
        .register_instance::<dyn Simple, _>(Arc::clone(&instance))
        .unwrap();
    container.register_component::<CompositeObject, CompositeObject>().unwrap();

    let resolved = container.resolve::<dyn Simple>().unwrap();
    assert!(std::ptr::addr_eq(Arc::as_ptr(&resolved), Arc::as_ptr(&instance)));

    let composite = container.resolve::<CompositeObject>().unwrap();
    assert!(std::ptr::addr_eq(
        Arc::as_ptr(&composite.simple),
        Arc::as_ptr(&instance)
    ));
}

#[test]
fn container_hands_out_shared_foreign_and_abstract_objects() {
    let mut container = Container::new();
    let simple: Arc<dyn Simple> = Arc::new(SimpleObject);
    container.register_shared(Arc::new(String::from("cfg"))).unwrap();
    container.register_shared(Arc::new(42i32)).unwrap();
    container.register_shared(Arc::clone(&simple)).unwrap();
    container.register_component::<CompositeObject, CompositeObject>().unwrap();

    assert_eq!(*container.resolve::<String>().unwrap(), "cfg");
    assert_eq!(*container.resolve::<i32>().unwrap(), 42);

    let composite = container.resolve::<CompositeObject>().unwrap();
    assert!(Arc::ptr_eq(&composite.simple, &simple));

    let err = container.register_shared(Arc::new(7i32)).unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyRegistered { .. }));
    assert_eq!(*container.resolve::<i32>().unwrap(), 42);
}

#[test]
fn container_keeps_first_registration_when_key_is_duplicated() {
    let mut container = Container::new();
    let instance = Arc::new(SimpleObject);
    container
        .register_instance::<dyn Simple, _>(Arc::clone(&instance))
        .unwrap();

    let err = container
        .register_component::<dyn Simple, SimpleObject>()
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::AlreadyRegistered { key, implementation, .. }
            if key == TypeKey::of::<dyn Simple>() && implementation == TypeKey::of::<SimpleObject>()
    ));

    let resolved = container.resolve::<dyn Simple>().unwrap();
    assert!(std::ptr::addr_eq(Arc::as_ptr(&resolved), Arc::as_ptr(&instance)));
}

#[test]
fn container_rejects_abstract_implementation() {
    let mut container = Container::new();

    let err = container
        .register::<dyn Base>(TypeDescriptor::abstract_type::<dyn Simple>().extends::<dyn Base>())
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotConstructible { key, implementation, .. }
            if key == TypeKey::of::<dyn Base>() && implementation == TypeKey::of::<dyn Simple>()
    ));
    assert!(container.is_empty());
}

#[test]
fn container_rejects_unassignable_implementation() {
    let mut container = Container::new();

    let err = container
        .register_component::<dyn Simple, CompositeObject>()
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotAssignable { .. }));
    assert!(!container.is_registered::<dyn Simple>());

    let err = container
        .register_instance::<CompositeObject, _>(Arc::new(SimpleObject))
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotAssignable { .. }));
    assert!(container.is_empty());
}

#[test]
fn container_fails_when_key_is_not_registered() {
    let container = Container::new();

    let err = container.resolve::<dyn Simple>().err().unwrap();
    assert!(matches!(
        err,
        ResolveError::NotRegistered { key, .. } if key == TypeKey::of::<dyn Simple>()
    ));
}

#[test]
fn container_fails_when_no_constructor_is_viable() {
    let mut container = Container::new();
    container.register_component::<CompositeObject, CompositeObject>().unwrap();

    let err = container.resolve::<CompositeObject>().err().unwrap();
    assert!(matches!(
        err,
        ResolveError::NoViableConstructor { key, .. } if key == TypeKey::of::<CompositeObject>()
    ));
}

#[test]
fn container_resolves_once_missing_dependency_is_registered() {
    let mut container = Container::new();
    container.register_component::<CompositeObject, CompositeObject>().unwrap();

    let err = container.resolve::<CompositeObject>().err().unwrap();
    assert!(matches!(
        err,
        ResolveError::NoViableConstructor { key, .. } if key == TypeKey::of::<CompositeObject>()
    ));

    container.register_component::<dyn Simple, SimpleObject>().unwrap();
    let composite = container.resolve::<CompositeObject>().unwrap();
    assert_eq!(composite.simple.name(), "simple");
}

#[test]
fn container_fails_when_dependencies_are_cyclic() {
    let mut container = Container::new();
    container.register_component::<Chicken, Chicken>().unwrap();
    container.register_component::<Egg, Egg>().unwrap();

    let err = container.resolve::<Chicken>().err().unwrap();
    assert!(matches!(
        err,
        ResolveError::CyclicDependency { key, .. } if key == TypeKey::of::<Chicken>()
    ));
}

#[test]
fn container_registered_instance_breaks_cycle() {
    let mut container = Container::new();
    let chicken = Arc::new(Chicken {
        egg: Arc::new(Egg { mother: None }),
    });
    container
        .register_instance::<Chicken, _>(Arc::clone(&chicken))
        .unwrap();
    container.register_component::<Egg, Egg>().unwrap();

    let egg = container.resolve::<Egg>().unwrap();
    let mother = egg.mother.as_ref().unwrap();
    assert!(Arc::ptr_eq(mother, &chicken));
    assert!(mother.egg.mother.is_none());
}

#[test]
fn container_fails_when_constructor_fails() {
    let mut container = Container::new();
    container.register_component::<Disk, Disk>().unwrap();

    let err = container.resolve::<Disk>().err().unwrap();
    assert_eq!(err.key(), TypeKey::of::<Disk>());
    assert!(matches!(err, ResolveError::ObjectConstruction { .. }));
    assert_eq!(err.source().unwrap().to_string(), "disk is gone");
}

#[test]
fn container_resolves_through_dyn_resolver() {
    let mut container = Container::new();
    container.register_component::<dyn Simple, SimpleObject>().unwrap();

    let resolver: &dyn Resolver = &container;
    assert!(resolver.contains(TypeKey::of::<dyn Simple>()));
    assert_eq!(resolver.resolve::<dyn Simple>().unwrap().id(), 1);
}

#[test]
fn container_init_applies_configuration() {
    let configuration = Configuration::new()
        .with(|container: &mut Container| -> Result<(), RegistryError> {
            container.register_component::<dyn Simple, SimpleObject>()
        })
        .with(|container: &mut Container| -> Result<(), RegistryError> {
            container.register_component::<CompositeObject, CompositeObject>()
        });

    let container = Container::init(configuration).unwrap();
    assert_eq!(container.len(), 2);
    assert_eq!(
        container.resolve::<CompositeObject>().unwrap().simple.name(),
        "simple"
    );
}

#[test]
fn container_init_fails_with_first_registration_error() {
    let module = |container: &mut Container| -> Result<(), RegistryError> {
        container.register_component::<dyn Simple, SimpleObject>()?;
        container.register_component::<dyn Simple, SimpleObject>()?;
        container.register_component::<CompositeObject, CompositeObject>()
    };

    let err = Container::init(module).unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyRegistered { .. }));
}

//! Module loading and unloading, idempotent registration and the process-wide registry.

use prism::{
    prelude::*,
    reflect::{ModuleId, StaticModule},
    register_static_module,
};
use std::sync::Arc;

#[derive(Default)]
struct Turret {
    range: f32,
}

#[derive(Default)]
struct Mine;

reflect_class!(Turret);
reflect_class!(Mine);

fn turret_class() -> ClassDescriptor {
    ClassBuilder::<Turret>::new("Turret")
        .constructor(Turret::default)
        .property("Range", |t: &Turret| t.range, |t: &mut Turret, v| t.range = v)
        .build()
}

struct Defenses;

impl Module for Defenses {
    fn name(&self) -> &str {
        "defenses"
    }

    fn register(&self, registrar: &mut ModuleRegistrar) {
        registrar.register_class(turret_class());
        registrar.register_class(ClassBuilder::<Mine>::new("Mine").build());
    }
}

fn register_traps(registrar: &mut ModuleRegistrar) {
    registrar.register_class(ClassBuilder::<Mine>::new("Trap").build());
}

register_static_module!("traps", register_traps);

#[test]
fn should_keep_first_writer() {
    let registry = TypeRegistry::new();
    let first: Arc<ClassDescriptor> = turret_class().into();

    assert!(registry.register_class_type("Turret", first.clone()));
    assert!(!registry.register_class_type("Turret", turret_class().into()));
    assert!(Arc::ptr_eq(&registry.get_class_type("Turret").unwrap(), &first));
}

#[test]
fn should_unload_exactly_one_module() {
    let registry = TypeRegistry::with_builtins();
    let builtins = registry.len();

    let defenses = registry.load_module(&Defenses);
    let traps = registry.load_module(&StaticModule::new("traps", register_traps));
    assert_ne!(defenses, traps);
    assert_eq!(registry.len(), builtins + 3);
    assert_eq!(registry.module_of("Turret"), Some(defenses));

    let live = registry.get_class_type("Turret").unwrap();
    assert_eq!(registry.unload_module(defenses), 2);
    assert!(registry.get_class_type("Turret").is_none());
    assert!(registry.get_class_type("Mine").is_none());
    assert!(registry.get_class_type("Trap").is_some());
    assert_eq!(registry.module_of("i32"), Some(ModuleId::CORE));

    let mut turret = live.create_dynamic(ArgList::new()).unwrap();
    live.set_property_str(turret.as_mut(), "Range", "12.5").unwrap();
    assert_eq!(live.get_property_str(turret.as_ref(), "Range").unwrap(), "12.5");

    let reloaded = registry.load_module(&Defenses);
    assert_eq!(registry.module_of("Turret"), Some(reloaded));
}

#[test]
fn should_load_static_modules() {
    let registry = TypeRegistry::new();
    let loaded = registry.load_static_modules();
    assert!(!loaded.is_empty());

    let trap = registry.get_class_type("Trap").unwrap();
    assert_eq!(trap.type_descriptor().name(), "Mine");
}

#[test]
fn should_manage_global_registry() {
    TypeRegistry::shutdown();
    assert!(!TypeRegistry::has_instance());

    let registry = TypeRegistry::instance();
    assert!(TypeRegistry::has_instance());
    assert!(registry.get_primitive_type("bool").is_some());
    registry.register_class_type("Turret", turret_class().into());
    assert!(Arc::ptr_eq(&registry, &TypeRegistry::instance()));

    assert!(TypeRegistry::shutdown());
    assert!(!TypeRegistry::has_instance());
    assert!(registry.get_class_type("Turret").is_some());
    assert!(TypeRegistry::instance().get_class_type("Turret").is_none());
    assert!(TypeRegistry::shutdown());
    assert!(!TypeRegistry::shutdown());
}

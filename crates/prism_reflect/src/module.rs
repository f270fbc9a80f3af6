//! Modules: units that register a group of types and can be unloaded together.

use crate::{ClassDescriptor, TypeDescriptor, TypeRegistry, Typed};
use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

/// Identifies the module a registry entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u64);

impl ModuleId {
    /// The module of the built-in primitives and of entries registered outside any module.
    pub const CORE: Self = Self(0);

    /// Returns an identifier that has not been handed out before in this process.
    pub fn unique() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A group of types registered and unregistered as a unit.
///
/// Plugins implement this trait and are loaded with [`TypeRegistry::load_module`], which gives
/// them a fresh [`ModuleId`]. [`TypeRegistry::unload_module`] later removes exactly the entries
/// the module registered.
///
/// ```
/// use prism_reflect::{ClassBuilder, Module, ModuleRegistrar, TypeRegistry, reflect_class};
///
/// #[derive(Default)]
/// struct Enemy;
///
/// reflect_class!(Enemy);
///
/// struct EnemyPlugin;
///
/// impl Module for EnemyPlugin {
///     fn name(&self) -> &str {
///         "enemies"
///     }
///
///     fn register(&self, registrar: &mut ModuleRegistrar) {
///         registrar.register_class(ClassBuilder::<Enemy>::new("Enemy").build());
///     }
/// }
///
/// let registry = TypeRegistry::new();
/// let id = registry.load_module(&EnemyPlugin);
/// assert!(registry.get_class_type("Enemy").is_some());
///
/// assert_eq!(registry.unload_module(id), 1);
/// assert!(registry.get_class_type("Enemy").is_none());
/// ```
pub trait Module: Send + Sync {
    /// A human readable name, used in logs and to order static modules.
    fn name(&self) -> &str;

    /// Registers the module's types.
    fn register(&self, registrar: &mut ModuleRegistrar);
}

/// Registers types into a [`TypeRegistry`] on behalf of one module.
pub struct ModuleRegistrar<'r> {
    registry: &'r TypeRegistry,
    module: ModuleId,
    classes: usize,
    primitives: usize,
}

impl<'r> ModuleRegistrar<'r> {
    pub(crate) fn new(registry: &'r TypeRegistry, module: ModuleId) -> Self {
        Self {
            registry,
            module,
            classes: 0,
            primitives: 0,
        }
    }

    /// The module being registered.
    pub fn module_id(&self) -> ModuleId {
        self.module
    }

    /// The registry being populated.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Registers a class under its own name.
    ///
    /// Returns `false` if a class of that name was already registered.
    pub fn register_class(&mut self, class: impl Into<Arc<ClassDescriptor>>) -> bool {
        let class = class.into();
        let name = class.name().to_owned();
        self.register_class_type(name, class)
    }

    /// Registers a class under `name`.
    pub fn register_class_type(
        &mut self,
        name: impl Into<String>,
        class: Arc<ClassDescriptor>,
    ) -> bool {
        let inserted = self.registry.insert_class(self.module, name.into(), class);
        self.classes += usize::from(inserted);
        inserted
    }

    /// Registers the descriptor of `T` as a primitive under its own name.
    pub fn register_primitive<T: Typed>(&mut self) -> bool {
        let ty = T::type_descriptor();
        self.register_primitive_type(ty.name(), ty)
    }

    /// Registers a primitive type descriptor under `name`.
    pub fn register_primitive_type(
        &mut self,
        name: impl Into<String>,
        ty: &'static TypeDescriptor,
    ) -> bool {
        let inserted = self.registry.insert_primitive(self.module, name.into(), ty);
        self.primitives += usize::from(inserted);
        inserted
    }

    /// The number of classes and primitives this registrar inserted.
    pub fn counts(&self) -> (usize, usize) {
        (self.classes, self.primitives)
    }
}

/// A module declared with [`register_static_module!`](crate::register_static_module), loaded by
/// [`TypeRegistry::load_static_modules`].
#[derive(Debug, Clone, Copy)]
pub struct StaticModule {
    name: &'static str,
    register: fn(&mut ModuleRegistrar),
}

impl StaticModule {
    /// Declares a module named `name` registered by `register`.
    pub const fn new(name: &'static str, register: fn(&mut ModuleRegistrar)) -> Self {
        Self { name, register }
    }
}

impl Module for StaticModule {
    fn name(&self) -> &str {
        self.name
    }

    fn register(&self, registrar: &mut ModuleRegistrar) {
        (self.register)(registrar);
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(StaticModule);

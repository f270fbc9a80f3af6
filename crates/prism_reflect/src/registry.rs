use crate::{
    ClassDescriptor, Module, ModuleId, ModuleRegistrar, Reflect, TypeDescriptor,
    text::builtin_primitives,
};
use alloc::sync::Arc;
use core::any::TypeId;
use hashbrown::HashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

struct Entry<T> {
    value: T,
    module: ModuleId,
}

#[derive(Default)]
struct Tables {
    classes: IndexMap<String, Entry<Arc<ClassDescriptor>>>,
    primitives: IndexMap<String, Entry<&'static TypeDescriptor>>,
    class_ids: HashMap<TypeId, String>,
}

/// A registry of class and primitive type descriptors, looked up by name.
///
/// Registration is idempotent: the first descriptor registered under a name is kept and later
/// registrations under the same name are ignored. Lookups return [`None`] for unknown names,
/// since a missing type, such as one from a plugin that is not loaded, is expected.
///
/// Every entry is tagged with the [`ModuleId`] of the module that registered it, so a module can
/// be [unloaded](Self::unload_module) without touching the entries of other modules. Class
/// descriptors are shared through [`Arc`], so descriptors still held elsewhere stay valid after
/// their module is unloaded.
///
/// The registry is internally synchronized and can be shared between threads. A process-wide
/// instance is available through [`TypeRegistry::instance`].
///
/// ```
/// use prism_reflect::TypeRegistry;
///
/// let registry = TypeRegistry::with_builtins();
/// let ty = registry.get_primitive_type("f32").unwrap();
/// assert_eq!(ty.format(ty.parse("0.15").unwrap().as_reflect()).unwrap(), "0.15");
/// assert!(registry.get_class_type("Bogus").is_none());
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    tables: RwLock<Tables>,
}

static INSTANCE: RwLock<Option<Arc<TypeRegistry>>> = RwLock::new(None);

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in primitive types.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_builtin_primitives();
        registry
    }

    /// Returns the process-wide registry, creating it with the built-in primitives on first use.
    pub fn instance() -> Arc<TypeRegistry> {
        if let Some(instance) = INSTANCE.read().as_ref() {
            return Arc::clone(instance);
        }
        let mut instance = INSTANCE.write();
        Arc::clone(instance.get_or_insert_with(|| {
            debug!("creating the global type registry");
            Arc::new(Self::with_builtins())
        }))
    }

    /// Returns `true` if the process-wide registry exists, without creating it.
    pub fn has_instance() -> bool {
        INSTANCE.read().is_some()
    }

    /// Tears down the process-wide registry.
    ///
    /// Handles returned by [`instance`](Self::instance) stay usable. A later call to `instance`
    /// creates a fresh registry. Returns `false` if there was no registry to tear down.
    pub fn shutdown() -> bool {
        let torn_down = INSTANCE.write().take().is_some();
        if torn_down {
            debug!("shut down the global type registry");
        }
        torn_down
    }

    /// Registers the built-in primitive types under [`ModuleId::CORE`].
    pub fn register_builtin_primitives(&self) {
        for ty in builtin_primitives() {
            self.insert_primitive(ModuleId::CORE, ty.name().into(), ty);
        }
    }

    /// Registers a class under `name`, as part of [`ModuleId::CORE`].
    ///
    /// Returns `false`, keeping the existing entry, if a class of that name is already
    /// registered.
    pub fn register_class_type(&self, name: impl Into<String>, class: Arc<ClassDescriptor>) -> bool {
        self.insert_class(ModuleId::CORE, name.into(), class)
    }

    /// Registers a primitive type under `name`, as part of [`ModuleId::CORE`].
    ///
    /// Returns `false`, keeping the existing entry, if a primitive of that name is already
    /// registered.
    pub fn register_primitive_type(
        &self,
        name: impl Into<String>,
        ty: &'static TypeDescriptor,
    ) -> bool {
        self.insert_primitive(ModuleId::CORE, name.into(), ty)
    }

    pub(crate) fn insert_class(
        &self,
        module: ModuleId,
        name: String,
        class: Arc<ClassDescriptor>,
    ) -> bool {
        let mut tables = self.tables.write();
        if tables.classes.contains_key(&name) {
            debug!("class `{name}` is already registered, ignoring the new descriptor");
            return false;
        }
        let type_id = class.type_descriptor().type_id();
        tables.class_ids.entry(type_id).or_insert_with(|| name.clone());
        tables.classes.insert(name, Entry { value: class, module });
        true
    }

    pub(crate) fn insert_primitive(
        &self,
        module: ModuleId,
        name: String,
        ty: &'static TypeDescriptor,
    ) -> bool {
        let mut tables = self.tables.write();
        if tables.primitives.contains_key(&name) {
            debug!("primitive `{name}` is already registered, ignoring the new descriptor");
            return false;
        }
        tables.primitives.insert(name, Entry { value: ty, module });
        true
    }

    /// Looks up a class by name.
    pub fn get_class_type(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        let tables = self.tables.read();
        tables.classes.get(name).map(|entry| Arc::clone(&entry.value))
    }

    /// Looks up the class describing the Rust type `type_id`.
    pub fn get_class_type_by_id(&self, type_id: TypeId) -> Option<Arc<ClassDescriptor>> {
        let tables = self.tables.read();
        let name = tables.class_ids.get(&type_id)?;
        tables.classes.get(name).map(|entry| Arc::clone(&entry.value))
    }

    /// Looks up the class of `object`.
    pub fn get_class_for(&self, object: &dyn Reflect) -> Option<Arc<ClassDescriptor>> {
        self.get_class_type_by_id(object.reflect_type().type_id())
    }

    /// Looks up a primitive type by name.
    pub fn get_primitive_type(&self, name: &str) -> Option<&'static TypeDescriptor> {
        let tables = self.tables.read();
        tables.primitives.get(name).map(|entry| entry.value)
    }

    /// Looks up a type by name, primitive types first.
    pub fn get_type(&self, name: &str) -> Option<&'static TypeDescriptor> {
        let tables = self.tables.read();
        tables
            .primitives
            .get(name)
            .map(|entry| entry.value)
            .or_else(|| {
                tables
                    .classes
                    .get(name)
                    .map(|entry| entry.value.type_descriptor())
            })
    }

    /// The names of every registered class, in registration order.
    pub fn class_names(&self) -> Vec<String> {
        self.tables.read().classes.keys().cloned().collect()
    }

    /// The names of every registered primitive type, in registration order.
    pub fn primitive_names(&self) -> Vec<String> {
        self.tables.read().primitives.keys().cloned().collect()
    }

    /// Every registered class that derives from the class `name`, excluding that class itself.
    pub fn derived_classes(&self, name: &str) -> Vec<Arc<ClassDescriptor>> {
        let tables = self.tables.read();
        let Some(base) = tables.classes.get(name) else {
            return Vec::new();
        };
        tables
            .classes
            .values()
            .filter(|entry| {
                !Arc::ptr_eq(&entry.value, &base.value) && entry.value.is_derived_from(&base.value)
            })
            .map(|entry| Arc::clone(&entry.value))
            .collect()
    }

    /// The module that registered the class or primitive type `name`.
    pub fn module_of(&self, name: &str) -> Option<ModuleId> {
        let tables = self.tables.read();
        tables
            .classes
            .get(name)
            .map(|entry| entry.module)
            .or_else(|| tables.primitives.get(name).map(|entry| entry.module))
    }

    /// The number of registered classes and primitive types.
    pub fn len(&self) -> usize {
        let tables = self.tables.read();
        tables.classes.len() + tables.primitives.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lets `module` register its types under a new [`ModuleId`], which is returned.
    pub fn load_module(&self, module: &dyn Module) -> ModuleId {
        let id = ModuleId::unique();
        let mut registrar = ModuleRegistrar::new(self, id);
        module.register(&mut registrar);
        let (classes, primitives) = registrar.counts();
        debug!(
            "loaded module `{}` as {id:?}: {classes} classes, {primitives} primitives",
            module.name()
        );
        id
    }

    /// Removes every class and primitive type registered by `module`.
    ///
    /// Returns the number of entries removed.
    pub fn unload_module(&self, module: ModuleId) -> usize {
        let mut guard = self.tables.write();
        let tables = &mut *guard;
        let before = tables.classes.len() + tables.primitives.len();

        tables.classes.retain(|_, entry| entry.module != module);
        tables.primitives.retain(|_, entry| entry.module != module);
        let Tables {
            classes, class_ids, ..
        } = &mut *tables;
        class_ids.retain(|_, name| classes.contains_key(name));
        for (name, entry) in classes.iter() {
            let type_id = entry.value.type_descriptor().type_id();
            class_ids.entry(type_id).or_insert_with(|| name.clone());
        }

        let removed = before - tables.classes.len() - tables.primitives.len();
        debug!("unloaded {module:?}: {removed} entries removed");
        removed
    }

    /// Loads every module declared with
    /// [`register_static_module!`](crate::register_static_module), in order of their names.
    #[cfg(feature = "auto_register")]
    pub fn load_static_modules(&self) -> Vec<ModuleId> {
        let mut modules = inventory::iter::<crate::StaticModule>
            .into_iter()
            .collect::<Vec<_>>();
        modules.sort_by(|a, b| a.name().cmp(b.name()));
        modules
            .into_iter()
            .map(|module| self.load_module(module))
            .collect()
    }
}

use crate::{
    BaseClass, ClassConstructor, ClassDescriptor, ClassField, ClassMethod, ClassProperty,
    ClassSignal, Signal, Typed,
    class::field::TypedAccess,
    func::{DynamicFunction, IntoFunction},
};
use alloc::{borrow::Cow, sync::Arc};
use core::marker::PhantomData;
use tracing::warn;

/// Builds the [`ClassDescriptor`] of `C`.
///
/// Members are added one at a time. Mistakes in a declaration, such as two members with the
/// same name or a default value of the wrong type, are logged as warnings and the offending
/// declaration is dropped, so a faulty module still registers the rest of its classes. The
/// first declaration of a name wins.
///
/// # Example
///
/// ```
/// use prism_reflect::{ClassBuilder, class_field, reflect_class};
///
/// #[derive(Default)]
/// struct Camera {
///     fov: f32,
///     zoom: f32,
/// }
///
/// impl Camera {
///     fn reset(&mut self) {
///         self.zoom = 1.0;
///     }
/// }
///
/// reflect_class!(Camera);
///
/// let class = ClassBuilder::<Camera>::new("Camera")
///     .constructor(Camera::default)
///     .field(class_field!(Camera, zoom: f32))
///     .property("Fov", |c: &Camera| c.fov, |c: &mut Camera, v: f32| c.fov = v)
///     .default_value("Fov", 60.0_f32)
///     .method("Reset", Camera::reset)
///     .build();
///
/// let mut camera = Camera::default();
/// class.restore_defaults(&mut camera).unwrap();
/// class.invoke(&mut camera, "Reset", Default::default()).unwrap();
/// assert_eq!((camera.fov, camera.zoom), (60.0, 1.0));
/// ```
pub struct ClassBuilder<C> {
    class: ClassDescriptor,
    marker: PhantomData<fn() -> C>,
}

impl<C: Typed> ClassBuilder<C> {
    /// Starts describing `C` under `name`.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            class: ClassDescriptor::new(name.into(), C::type_descriptor()),
            marker: PhantomData,
        }
    }

    /// Sets the base class. `upcast` and `upcast_mut` project a `C` onto its embedded `B`.
    pub fn base<B: Typed>(
        mut self,
        base: Arc<ClassDescriptor>,
        upcast: fn(&C) -> &B,
        upcast_mut: fn(&mut C) -> &mut B,
    ) -> Self {
        if base.type_descriptor() != B::type_descriptor() {
            warn!(
                "`{}` declares base class `{}`, which does not describe `{}`",
                self.class.name,
                base.name(),
                B::type_descriptor().name(),
            );
            return self;
        }
        if base.is_derived_from(&self.class) {
            warn!(
                "`{}` cannot derive from `{}`, which already derives from it",
                self.class.name,
                base.name(),
            );
            return self;
        }
        let access = TypedAccess {
            get: upcast,
            get_mut: upcast_mut,
        };
        self.class.base = Some(BaseClass::new(base, Arc::new(access)));
        self
    }

    /// Adds a field.
    pub fn field(mut self, field: ClassField) -> Self {
        if self.class.fields.contains_key(field.name()) {
            self.warn_duplicate("field", field.name());
            return self;
        }
        self.class
            .fields
            .insert(Cow::Owned(field.name().into()), field);
        self
    }

    /// Adds a readable and writable property.
    pub fn property<T, G, S>(
        self,
        name: impl Into<Cow<'static, str>>,
        getter: G,
        setter: S,
    ) -> Self
    where
        T: Typed,
        G: Fn(&C) -> T + Send + Sync + 'static,
        S: Fn(&mut C, T) + Send + Sync + 'static,
    {
        self.add_property(ClassProperty::new(name, getter, setter))
    }

    /// Adds a property that can only be read.
    pub fn read_only_property<T, G>(self, name: impl Into<Cow<'static, str>>, getter: G) -> Self
    where
        T: Typed,
        G: Fn(&C) -> T + Send + Sync + 'static,
    {
        self.add_property(ClassProperty::read_only(name, getter))
    }

    /// Adds a property described elsewhere.
    pub fn add_property(mut self, property: ClassProperty) -> Self {
        if property.class_type() != self.class.ty {
            warn!(
                "property `{}` belongs to `{}`, not to `{}`",
                property.name(),
                property.class_type().name(),
                self.class.name,
            );
            return self;
        }
        if self.class.properties.contains_key(property.name()) {
            self.warn_duplicate("property", property.name());
            return self;
        }
        self.class
            .properties
            .insert(Cow::Owned(property.name().into()), property);
        self
    }

    /// Attaches a default value to the property `name` declared earlier.
    pub fn default_value<T: Typed + Clone>(mut self, name: &str, value: T) -> Self {
        let Some(property) = self.class.properties.get_mut(name) else {
            warn!(
                "`{}` has no property `{name}` to attach a default value to",
                self.class.name
            );
            return self;
        };
        if property.value_type() != T::type_descriptor() {
            warn!(
                "default value of `{}::{name}` is a `{}`, expected a `{}`",
                self.class.name,
                T::type_descriptor().name(),
                property.value_type().name(),
            );
            return self;
        }
        *property = property.clone().with_default(value);
        self
    }

    /// Adds a method. Instance methods take `&C` or `&mut C` as their first parameter.
    pub fn method<Marker>(
        self,
        name: impl Into<Cow<'static, str>>,
        f: impl IntoFunction<Marker>,
    ) -> Self {
        self.add_method(ClassMethod::new(name, f))
    }

    /// Adds a method from an already erased function.
    pub fn dynamic_method(
        self,
        name: impl Into<Cow<'static, str>>,
        function: DynamicFunction,
    ) -> Self {
        self.add_method(ClassMethod::from_function(name, function))
    }

    fn add_method(mut self, method: ClassMethod) -> Self {
        if let Some(receiver) = method.info().receiver_type()
            && receiver != self.class.ty
        {
            warn!(
                "method `{}::{}` takes a `{}` receiver",
                self.class.name,
                method.name(),
                receiver.name(),
            );
            return self;
        }
        if self.class.methods.contains_key(method.name()) {
            self.warn_duplicate("method", method.name());
            return self;
        }
        self.class
            .methods
            .insert(Cow::Owned(method.name().into()), method);
        self
    }

    /// Adds a constructor: a free function returning `C`.
    pub fn constructor<Marker>(self, f: impl IntoFunction<Marker>) -> Self {
        self.add_constructor(ClassConstructor::new::<C, Marker>(f))
    }

    /// Adds a constructor from an already erased function.
    pub fn dynamic_constructor(self, function: DynamicFunction) -> Self {
        self.add_constructor(ClassConstructor::from_function::<C>(function))
    }

    fn add_constructor(mut self, constructor: ClassConstructor) -> Self {
        if !constructor.returns_class() || !constructor.info().is_static() {
            warn!(
                "constructor `{:?}` of `{}` must be a free function returning `{}`",
                constructor.function(),
                self.class.name,
                self.class.ty.name(),
            );
            return self;
        }
        if self.class.constructors.contains(&constructor) {
            self.warn_duplicate("constructor", &format!("{:?}", constructor.function()));
            return self;
        }
        self.class.constructors.push(constructor);
        self
    }

    /// Adds the signal `Signal<T>` reached through `get` and `get_mut`.
    pub fn signal<T: Typed + Clone>(
        mut self,
        name: impl Into<Cow<'static, str>>,
        get: fn(&C) -> &Signal<T>,
        get_mut: fn(&mut C) -> &mut Signal<T>,
    ) -> Self {
        let signal = ClassSignal::new(name, get, get_mut);
        if self.class.signals.contains_key(signal.name()) {
            self.warn_duplicate("signal", signal.name());
            return self;
        }
        self.class
            .signals
            .insert(Cow::Owned(signal.name().into()), signal);
        self
    }

    fn warn_duplicate(&self, kind: &str, name: &str) {
        warn!(
            "`{}` declares {kind} `{name}` more than once, keeping the first",
            self.class.name
        );
    }

    /// Finishes the descriptor.
    pub fn build(self) -> ClassDescriptor {
        self.class
    }
}

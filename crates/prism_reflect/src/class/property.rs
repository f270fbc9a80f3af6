use crate::{
    Reflect, TypeDescriptor, Typed, Variant,
    func::{ArgList, CallError, DynamicFunction},
};
use alloc::{borrow::Cow, sync::Arc};
use core::fmt::{self, Debug, Formatter};
use tracing::warn;

type DefaultFactory = Arc<dyn Fn() -> Variant + Send + Sync>;

/// Describes a named property of a class, backed by a getter and an optional setter.
///
/// Both accessors are [`DynamicFunction`]s taking the object as their first argument, so a
/// property can be driven with type-erased [`ArgList`]s, with text, or through its exact Rust
/// types. A property may carry a default value, which
/// [`restore_default_value`](Self::restore_default_value) writes back through the setter.
///
/// # Example
///
/// ```
/// use prism_reflect::{ClassProperty, reflect_class};
///
/// #[derive(Default)]
/// struct Slider {
///     value: f32,
/// }
///
/// reflect_class!(Slider);
///
/// let property = ClassProperty::new(
///     "Value",
///     |s: &Slider| s.value,
///     |s: &mut Slider, v: f32| s.value = v.clamp(0.0, 1.0),
/// )
/// .with_default(0.5_f32);
///
/// let mut slider = Slider::default();
/// property.set_from_str(&mut slider, "4").unwrap();
/// assert_eq!(slider.value, 1.0);
///
/// property.restore_default_value(&mut slider).unwrap();
/// assert_eq!(property.get_as_string(&slider).unwrap(), "0.5");
/// ```
#[derive(Clone)]
pub struct ClassProperty {
    name: Cow<'static, str>,
    class: &'static TypeDescriptor,
    value_type: &'static TypeDescriptor,
    getter: DynamicFunction,
    setter: Option<DynamicFunction>,
    default: Option<DefaultFactory>,
}

impl ClassProperty {
    /// Describes a readable and writable property of `C` holding a `T`.
    pub fn new<C, T, G, S>(name: impl Into<Cow<'static, str>>, getter: G, setter: S) -> Self
    where
        C: Typed,
        T: Typed,
        G: Fn(&C) -> T + Send + Sync + 'static,
        S: Fn(&mut C, T) + Send + Sync + 'static,
    {
        let name = name.into();
        let setter = DynamicFunction::from_reflect_fn::<_, fn(&mut C, T)>(setter)
            .with_name(format!("set_{name}"))
            .with_arg_names(&["value"]);
        let mut property = Self::read_only(name, getter);
        property.setter = Some(setter);
        property
    }

    /// Describes a property of `C` that can only be read.
    pub fn read_only<C, T, G>(name: impl Into<Cow<'static, str>>, getter: G) -> Self
    where
        C: Typed,
        T: Typed,
        G: Fn(&C) -> T + Send + Sync + 'static,
    {
        let name = name.into();
        let getter = DynamicFunction::from_reflect_fn::<_, fn(&C) -> T>(getter)
            .with_name(format!("get_{name}"));
        Self {
            name,
            class: C::type_descriptor(),
            value_type: T::type_descriptor(),
            getter,
            setter: None,
            default: None,
        }
    }

    /// Attaches a default value.
    ///
    /// A value of the wrong type could never be passed to the setter, so it is logged and
    /// ignored, keeping any earlier default.
    pub fn with_default<T: Typed + Clone>(mut self, value: T) -> Self {
        if T::type_descriptor() != self.value_type {
            warn!(
                "default value of property `{}` is a `{}`, expected a `{}`",
                self.name,
                T::type_descriptor().name(),
                self.value_type.name(),
            );
            return self;
        }
        self.default = Some(Arc::new(move || Variant::new(value.clone())));
        self
    }

    /// The name of the property.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The descriptor of the class that declares the property.
    pub fn class_type(&self) -> &'static TypeDescriptor {
        self.class
    }

    /// The descriptor of the property's value type.
    pub fn value_type(&self) -> &'static TypeDescriptor {
        self.value_type
    }

    /// The getter, taking the object by reference.
    pub fn getter(&self) -> &DynamicFunction {
        &self.getter
    }

    /// The setter, taking the object by mutable reference and the new value.
    pub fn setter(&self) -> Option<&DynamicFunction> {
        self.setter.as_ref()
    }

    /// Returns `true` if the property has no setter.
    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }

    /// Returns `true` if a default value is attached.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// A fresh copy of the default value, if one is attached.
    pub fn default_value(&self) -> Option<Variant> {
        self.default.as_deref().map(|default| default())
    }

    /// Calls the setter with `args`: the object followed by the new value.
    pub fn set(&self, args: ArgList) -> Result<(), CallError> {
        let setter = self.setter.as_ref().ok_or_else(|| CallError::ReadOnly {
            property: self.name.to_string(),
        })?;
        setter.call(args).map(drop)
    }

    /// Calls the getter with `args`: the object.
    pub fn get(&self, args: ArgList) -> Result<Variant, CallError> {
        self.getter.call(args)
    }

    /// Writes `value` into `object`.
    pub fn set_value(&self, object: &mut dyn Reflect, value: Variant) -> Result<(), CallError> {
        self.set(ArgList::new().with_mut(object).with_variant(value))
    }

    /// Reads the value out of `object`.
    pub fn get_value(&self, object: &dyn Reflect) -> Result<Variant, CallError> {
        self.get(ArgList::new().with_ref(object))
    }

    /// Parses `text` as the value type and writes it into `object`.
    pub fn set_from_str(&self, object: &mut dyn Reflect, text: &str) -> Result<(), CallError> {
        self.set(ArgList::new().with_mut(object).with_str(text))
    }

    /// Reads the value out of `object` and formats it as text.
    pub fn get_as_string(&self, object: &dyn Reflect) -> Result<String, CallError> {
        Ok(self.get_value(object)?.to_text()?)
    }

    /// Writes `value` into `object` without going through [`Variant`]s.
    ///
    /// `C` and `T` must be exactly the class and value type of the property.
    pub fn set_direct<C: Typed, T: Typed>(&self, object: &mut C, value: T) -> Result<(), CallError> {
        let setter = self.setter.as_ref().ok_or_else(|| CallError::ReadOnly {
            property: self.name.to_string(),
        })?;
        setter.call_direct_mut::<C, (T,), ()>(object, (value,))
    }

    /// Reads the value out of `object` without going through [`Variant`]s.
    pub fn get_direct<C: Typed, T: Typed>(&self, object: &C) -> Result<T, CallError> {
        self.getter.call_direct_ref::<C, (), T>(object, ())
    }

    /// Writes the default value into `object`.
    ///
    /// Does nothing if no default value is attached.
    pub fn restore_default_value(&self, object: &mut dyn Reflect) -> Result<(), CallError> {
        match self.default_value() {
            Some(value) => self.set_value(object, value),
            None => Ok(()),
        }
    }
}

impl Debug for ClassProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassProperty")
            .field("name", &self.name)
            .field("value_type", &self.value_type.name())
            .field("read_only", &self.is_read_only())
            .field("default", &self.default_value())
            .finish()
    }
}

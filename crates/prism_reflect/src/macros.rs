/// Implements [`Typed`](crate::Typed) for a primitive value type.
///
/// The type must implement [`TextValue`](crate::TextValue), [`Clone`] and [`PartialEq`]. The
/// registered name defaults to the type as written.
///
/// ```
/// use prism_reflect::{ParseError, TextValue, Typed, reflect_primitive};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Meters(f32);
///
/// impl TextValue for Meters {
///     fn parse_text(text: &str) -> Result<Self, ParseError> {
///         let value = text.trim().trim_end_matches('m');
///         f32::parse_text(value).map(Meters)
///     }
///
///     fn format_text(&self) -> String {
///         format!("{}m", self.0)
///     }
/// }
///
/// reflect_primitive!(Meters);
///
/// let value = Meters::type_descriptor().parse("2.5m").unwrap();
/// assert_eq!(value.downcast_ref::<Meters>(), Some(&Meters(2.5)));
/// ```
#[macro_export]
macro_rules! reflect_primitive {
    ($ty:ty) => {
        $crate::reflect_primitive!($ty, stringify!($ty));
    };
    ($ty:ty, $name:expr) => {
        impl $crate::Typed for $ty {
            fn type_descriptor() -> &'static $crate::TypeDescriptor {
                static CELL: $crate::utility::TypeDescriptorCell =
                    $crate::utility::TypeDescriptorCell::non_generic();
                CELL.get_or_insert::<Self, _>(|| $crate::TypeDescriptor::primitive::<Self>($name))
            }
        }
    };
}

/// Implements [`Typed`](crate::Typed) for a class type.
///
/// The registered name defaults to the type as written. Trailing idents name the value
/// operations to enable on the descriptor: `with_clone`, `with_eq` and `with_text`.
///
/// ```
/// use prism_reflect::{Typed, reflect_class};
///
/// #[derive(Clone, PartialEq)]
/// struct Rect {
///     w: f32,
///     h: f32,
/// }
///
/// reflect_class!(Rect, "Rect", with_clone, with_eq);
///
/// assert_eq!(Rect::type_descriptor().name(), "Rect");
/// assert!(Rect::type_descriptor().is_cloneable());
/// ```
#[macro_export]
macro_rules! reflect_class {
    ($ty:ty) => {
        $crate::reflect_class!($ty, stringify!($ty));
    };
    ($ty:ty, $name:expr $(, $op:ident)*) => {
        impl $crate::Typed for $ty {
            fn type_descriptor() -> &'static $crate::TypeDescriptor {
                static CELL: $crate::utility::TypeDescriptorCell =
                    $crate::utility::TypeDescriptorCell::non_generic();
                CELL.get_or_insert::<Self, _>(|| {
                    $crate::TypeDescriptor::class::<Self>($name)$(.$op::<Self>())*
                })
            }
        }
    };
}

/// Implements [`Typed`](crate::Typed), [`TextValue`](crate::TextValue) and
/// [`ReflectEnum`](crate::ReflectEnum) for a fieldless enum.
///
/// The enum must be [`Copy`] and [`PartialEq`], and every variant must be listed. Values are
/// written as their variant names.
///
/// ```
/// use prism_reflect::{TextValue, reflect_enum};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Anchor {
///     Left,
///     Center,
///     Right,
/// }
///
/// reflect_enum!(Anchor { Left, Center, Right });
///
/// assert_eq!(Anchor::parse_text("Center").unwrap(), Anchor::Center);
/// assert_eq!(Anchor::Right.format_text(), "Right");
/// ```
#[macro_export]
macro_rules! reflect_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::ReflectEnum for $ty {
            fn enum_info() -> $crate::EnumInfo {
                $crate::EnumInfo::new([$((stringify!($variant), $ty::$variant as i64)),+])
            }

            fn to_value(&self) -> i64 {
                *self as i64
            }

            fn from_value(value: i64) -> Option<Self> {
                $(
                    if value == $ty::$variant as i64 {
                        return Some($ty::$variant);
                    }
                )+
                None
            }
        }

        $crate::__impl_enum_text!($ty);
    };
}

/// Implements [`Typed`](crate::Typed), [`TextValue`](crate::TextValue) and
/// [`ReflectEnum`](crate::ReflectEnum) for a `bitflags` type.
///
/// The type must provide `bits()` and `from_bits_retain`, as types generated by the `bitflags`
/// crate do. Values are written as flag names joined by `|`.
#[macro_export]
macro_rules! reflect_flags {
    ($ty:ident { $($flag:ident),+ $(,)? }) => {
        impl $crate::ReflectEnum for $ty {
            fn enum_info() -> $crate::EnumInfo {
                $crate::EnumInfo::flags([$((stringify!($flag), $ty::$flag.bits() as i64)),+])
            }

            fn to_value(&self) -> i64 {
                self.bits() as i64
            }

            fn from_value(value: i64) -> Option<Self> {
                let bits = ::core::convert::TryInto::try_into(value).ok()?;
                Some(Self::from_bits_retain(bits))
            }
        }

        $crate::__impl_enum_text!($ty);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_enum_text {
    ($ty:ident) => {
        impl $crate::TextValue for $ty {
            fn parse_text(text: &str) -> Result<Self, $crate::ParseError> {
                $crate::__macro_exports::parse_enum::<Self>(text)
            }

            fn format_text(&self) -> String {
                $crate::__macro_exports::format_enum(self)
            }
        }

        impl $crate::Typed for $ty {
            fn type_descriptor() -> &'static $crate::TypeDescriptor {
                static CELL: $crate::utility::TypeDescriptorCell =
                    $crate::utility::TypeDescriptorCell::non_generic();
                CELL.get_or_insert::<Self, _>(|| {
                    $crate::TypeDescriptor::enumeration::<Self>(stringify!($ty))
                })
            }
        }
    };
}

/// Creates a [`ClassField`](crate::ClassField) for a named field of a class.
///
/// ```
/// use prism_reflect::{class_field, reflect_class};
///
/// struct Widget {
///     id: u32,
///     width: i32,
/// }
///
/// reflect_class!(Widget);
///
/// let field = class_field!(Widget, width: i32);
/// assert_eq!(field.name(), "width");
/// assert_eq!(field.offset(), core::mem::offset_of!(Widget, width));
/// ```
#[macro_export]
macro_rules! class_field {
    ($class:ty, $field:ident : $field_ty:ty) => {
        $crate::class_field!($class, $field: $field_ty, stringify!($field))
    };
    ($class:ty, $field:ident : $field_ty:ty, $name:expr) => {{
        fn get(owner: &$class) -> &$field_ty {
            &owner.$field
        }
        fn get_mut(owner: &mut $class) -> &mut $field_ty {
            &mut owner.$field
        }
        $crate::ClassField::new::<$class, $field_ty>(
            $name,
            ::core::mem::offset_of!($class, $field),
            get,
            get_mut,
        )
    }};
}

/// Submits a module to be loaded by
/// [`TypeRegistry::load_static_modules`](crate::TypeRegistry::load_static_modules).
///
/// ```
/// use prism_reflect::{ModuleRegistrar, register_static_module};
///
/// fn register_ui(registrar: &mut ModuleRegistrar) {
///     // registrar.register_class(...);
/// }
///
/// register_static_module!("ui", register_ui);
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! register_static_module {
    ($name:expr, $register:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::StaticModule::new($name, $register)
        }
    };
}

use crate::{EnumInfo, ParseError, ReflectEnum, TextValue, Variant};
use core::{
    any::{TypeId, type_name},
    fmt::{self, Debug, Formatter},
};
use downcast_rs::{DowncastSync, impl_downcast};
use prism_cell::ValueCell;

/// A static accessor to compile-time type information.
///
/// This trait is usually implemented through [`reflect_class!`], [`reflect_enum!`],
/// [`reflect_flags!`] or [`reflect_primitive!`]. A manual implementation must return the same
/// `&'static` descriptor on every call, which [`TypeDescriptorCell`] takes care of.
///
/// [`reflect_class!`]: crate::reflect_class
/// [`reflect_enum!`]: crate::reflect_enum
/// [`reflect_flags!`]: crate::reflect_flags
/// [`reflect_primitive!`]: crate::reflect_primitive
/// [`TypeDescriptorCell`]: crate::utility::TypeDescriptorCell
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Typed`",
    note = "consider invoking `reflect_class!({Self})` or implementing `Typed` manually"
)]
pub trait Typed: Send + Sync + 'static {
    /// Returns the descriptor of the underlying type.
    fn type_descriptor() -> &'static TypeDescriptor;
}

/// Object-safe access to the descriptor of a type-erased value.
///
/// Every [`Typed`] type implements this trait. `dyn Reflect` is how objects are passed around
/// by reference in dynamic calls, and it supports downcasting back to the concrete type.
pub trait Reflect: DowncastSync {
    /// Returns the descriptor of the value's concrete type.
    fn reflect_type(&self) -> &'static TypeDescriptor;
}

impl_downcast!(sync Reflect);

impl<T: Typed> Reflect for T {
    fn reflect_type(&self) -> &'static TypeDescriptor {
        T::type_descriptor()
    }
}

impl Debug for dyn Reflect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ty = self.reflect_type();
        match ty.format(self) {
            Ok(text) => write!(f, "{}({text:?})", ty.name()),
            Err(_) => write!(f, "{}(..)", ty.name()),
        }
    }
}

/// The broad category a [`TypeDescriptor`] belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// A scalar value such as `i32`, `f64`, `bool` or `String`.
    Primitive,
    /// A fieldless enum or a set of bit flags.
    Enum(EnumInfo),
    /// A type described by a [`ClassDescriptor`](crate::ClassDescriptor).
    Class,
}

#[derive(Clone, Copy)]
struct ValueOps {
    as_reflect: for<'a> fn(&'a ValueCell) -> Option<&'a dyn Reflect>,
    clone: Option<fn(&dyn Reflect) -> Option<Variant>>,
    eq: Option<fn(&dyn Reflect, &dyn Reflect) -> Option<bool>>,
    parse: Option<fn(&str) -> Result<Variant, ParseError>>,
    format: Option<fn(&dyn Reflect) -> Option<String>>,
}

/// Runtime identity and value operations for one Rust type.
///
/// Descriptors are created once per type and handed out as `&'static` references by
/// [`Typed::type_descriptor`]. Two descriptors are equal when they describe the same type.
///
/// Besides naming the type, a descriptor knows how to clone, compare, parse and format values
/// of its type when those operations were enabled for it. Primitives and enums enable all four.
/// Classes start with none and opt in through [`with_clone`](Self::with_clone),
/// [`with_eq`](Self::with_eq) and [`with_text`](Self::with_text).
pub struct TypeDescriptor {
    name: &'static str,
    type_path: &'static str,
    type_id: TypeId,
    size: usize,
    kind: TypeKind,
    ops: ValueOps,
}

impl TypeDescriptor {
    fn new<T: Typed>(name: &'static str, kind: TypeKind) -> Self {
        Self {
            name,
            type_path: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            size: size_of::<T>(),
            kind,
            ops: ValueOps {
                as_reflect: as_reflect::<T>,
                clone: None,
                eq: None,
                parse: None,
                format: None,
            },
        }
    }

    /// Describes a primitive value type.
    pub fn primitive<T: Typed + TextValue + Clone + PartialEq>(name: &'static str) -> Self {
        Self::new::<T>(name, TypeKind::Primitive)
            .with_clone::<T>()
            .with_eq::<T>()
            .with_text::<T>()
    }

    /// Describes an enum or flag set.
    pub fn enumeration<T: ReflectEnum + TextValue + Clone + PartialEq>(name: &'static str) -> Self {
        Self::new::<T>(name, TypeKind::Enum(T::enum_info()))
            .with_clone::<T>()
            .with_eq::<T>()
            .with_text::<T>()
    }

    /// Describes a class.
    pub fn class<T: Typed>(name: &'static str) -> Self {
        Self::new::<T>(name, TypeKind::Class)
    }

    /// Enables [`clone_value`](Self::clone_value).
    pub fn with_clone<T: Typed + Clone>(mut self) -> Self {
        debug_assert_eq!(self.type_id, TypeId::of::<T>());
        self.ops.clone = Some(clone_value::<T>);
        self
    }

    /// Enables [`equals`](Self::equals).
    pub fn with_eq<T: Typed + PartialEq>(mut self) -> Self {
        debug_assert_eq!(self.type_id, TypeId::of::<T>());
        self.ops.eq = Some(eq_value::<T>);
        self
    }

    /// Enables [`parse`](Self::parse) and [`format`](Self::format).
    pub fn with_text<T: Typed + TextValue>(mut self) -> Self {
        debug_assert_eq!(self.type_id, TypeId::of::<T>());
        self.ops.parse = Some(parse_value::<T>);
        self.ops.format = Some(format_value::<T>);
        self
    }

    /// The registered name of the type, such as `"i32"` or `"Widget"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The fully qualified Rust path of the type.
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The [`TypeId`] of the type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The size of the type in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The category of the type.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Returns `true` if this descriptor belongs to `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns `true` for primitive types.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive)
    }

    /// Returns `true` for class types.
    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class)
    }

    /// The variants of an enum or flag set.
    pub fn enum_info(&self) -> Option<&EnumInfo> {
        match &self.kind {
            TypeKind::Enum(info) => Some(info),
            _ => None,
        }
    }

    /// Returns `true` if values of this type can be parsed from and formatted to text.
    pub fn is_textual(&self) -> bool {
        self.ops.parse.is_some()
    }

    /// Returns `true` if values of this type can be cloned through the descriptor.
    pub fn is_cloneable(&self) -> bool {
        self.ops.clone.is_some()
    }

    /// Parses `text` into a value of this type.
    pub fn parse(&self, text: &str) -> Result<Variant, ParseError> {
        let parse = self.ops.parse.ok_or(ParseError::NotTextual {
            type_name: self.name,
        })?;
        parse(text)
    }

    /// Formats `value` as text.
    pub fn format(&self, value: &dyn Reflect) -> Result<String, ParseError> {
        let format = self.ops.format.ok_or(ParseError::NotTextual {
            type_name: self.name,
        })?;
        format(value).ok_or_else(|| self.mismatch(value))
    }

    /// Compares two values of this type.
    ///
    /// Returns [`None`] if the type does not support comparison or either value has a
    /// different type.
    pub fn equals(&self, a: &dyn Reflect, b: &dyn Reflect) -> Option<bool> {
        self.ops.eq.and_then(|eq| eq(a, b))
    }

    /// Clones a value of this type into a new [`Variant`].
    pub fn clone_value(&self, value: &dyn Reflect) -> Option<Variant> {
        self.ops.clone.and_then(|clone| clone(value))
    }

    pub(crate) fn cell_as_reflect<'a>(&self, cell: &'a ValueCell) -> Option<&'a dyn Reflect> {
        (self.ops.as_reflect)(cell)
    }

    fn mismatch(&self, value: &dyn Reflect) -> ParseError {
        ParseError::TypeMismatch {
            expected: self.name,
            received: value.reflect_type().name(),
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other) || self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("type_path", &self.type_path)
            .field("kind", &self.kind)
            .finish()
    }
}

fn as_reflect<T: Typed>(cell: &ValueCell) -> Option<&dyn Reflect> {
    cell.get_ref::<T>().map(|value| value as &dyn Reflect)
}

fn clone_value<T: Typed + Clone>(value: &dyn Reflect) -> Option<Variant> {
    value.downcast_ref::<T>().cloned().map(Variant::new)
}

fn eq_value<T: Typed + PartialEq>(a: &dyn Reflect, b: &dyn Reflect) -> Option<bool> {
    Some(a.downcast_ref::<T>()? == b.downcast_ref::<T>()?)
}

fn parse_value<T: Typed + TextValue>(text: &str) -> Result<Variant, ParseError> {
    T::parse_text(text).map(Variant::new)
}

fn format_value<T: Typed + TextValue>(value: &dyn Reflect) -> Option<String> {
    value.downcast_ref::<T>().map(T::format_text)
}

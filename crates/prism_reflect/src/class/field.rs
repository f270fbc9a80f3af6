use crate::{ParseError, Reflect, TypeDescriptor, Typed, Variant};
use alloc::{borrow::Cow, sync::Arc};
use core::fmt::{self, Debug, Formatter};

/// Type-erased access from an object to one of its parts.
///
/// Implemented for plain accessor functions, so a single implementation serves fields and
/// base-class projections.
pub(crate) trait MemberAccess: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect>;
    fn get_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect>;
}

pub(crate) struct TypedAccess<C, T> {
    pub(crate) get: fn(&C) -> &T,
    pub(crate) get_mut: fn(&mut C) -> &mut T,
}

impl<C: Typed, T: Typed> MemberAccess for TypedAccess<C, T> {
    fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        let owner = owner.downcast_ref::<C>()?;
        Some((self.get)(owner))
    }

    fn get_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        let owner = owner.downcast_mut::<C>()?;
        Some((self.get_mut)(owner))
    }
}

/// Describes a data member of a class.
///
/// A field records its name, its byte offset within the class and its value type, and it can
/// borrow the field out of a type-erased object. Fields are usually created with
/// [`class_field!`](crate::class_field).
///
/// Two fields are equal when both their names and their offsets are equal.
#[derive(Clone)]
pub struct ClassField {
    name: Cow<'static, str>,
    offset: usize,
    value_type: &'static TypeDescriptor,
    access: Arc<dyn MemberAccess>,
}

impl ClassField {
    /// Describes a field of `C` holding a `T`.
    pub fn new<C: Typed, T: Typed>(
        name: impl Into<Cow<'static, str>>,
        offset: usize,
        get: fn(&C) -> &T,
        get_mut: fn(&mut C) -> &mut T,
    ) -> Self {
        Self {
            name: name.into(),
            offset,
            value_type: T::type_descriptor(),
            access: Arc::new(TypedAccess { get, get_mut }),
        }
    }

    /// The name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The byte offset of the field within its class.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The descriptor of the field's type.
    pub fn value_type(&self) -> &'static TypeDescriptor {
        self.value_type
    }

    /// Borrows the field out of `object`.
    ///
    /// Returns [`None`] if `object` is not of the field's class.
    pub fn get<'a>(&self, object: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        self.access.get(object)
    }

    /// Mutably borrows the field out of `object`.
    pub fn get_mut<'a>(&self, object: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        self.access.get_mut(object)
    }

    /// Copies the field's value out of `object`, if the value type is cloneable.
    pub fn read(&self, object: &dyn Reflect) -> Option<Variant> {
        self.value_type.clone_value(self.get(object)?)
    }

    /// Formats the field's value as text.
    pub fn to_text(&self, object: &dyn Reflect) -> Result<String, ParseError> {
        let value = self.get(object).ok_or(ParseError::TypeMismatch {
            expected: self.value_type.name(),
            received: object.reflect_type().name(),
        })?;
        self.value_type.format(value)
    }
}

impl PartialEq for ClassField {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.offset == other.offset
    }
}

impl Debug for ClassField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassField")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("value_type", &self.value_type.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{class_field, reflect_class};
    use core::mem::offset_of;

    #[derive(Default)]
    struct Widget {
        id: u32,
        width: i32,
        title: String,
    }

    reflect_class!(Widget);

    #[test]
    fn should_record_offsets() {
        let width = class_field!(Widget, width: i32);
        assert_eq!(width.name(), "width");
        assert_eq!(width.offset(), offset_of!(Widget, width));
        assert_eq!(width.value_type().name(), "i32");

        let title = class_field!(Widget, title: String, "Title");
        assert_eq!(title.name(), "Title");
        assert_eq!(title.offset(), offset_of!(Widget, title));
    }

    #[test]
    fn should_compare_by_name_and_offset() {
        let a = class_field!(Widget, width: i32);
        let b = class_field!(Widget, width: i32);
        let renamed = class_field!(Widget, width: i32, "w");
        let other = class_field!(Widget, id: u32, "width");
        assert_eq!(a, b);
        assert_ne!(a, renamed);
        assert_ne!(a, other);
    }

    #[test]
    fn should_access_fields_dynamically() {
        let width = class_field!(Widget, width: i32);
        let mut widget = Widget {
            width: 4,
            ..Default::default()
        };

        *width
            .get_mut(&mut widget)
            .unwrap()
            .downcast_mut::<i32>()
            .unwrap() = 12;
        assert_eq!(widget.width, 12);
        assert_eq!(width.to_text(&widget).unwrap(), "12");
        assert_eq!(width.read(&widget).unwrap().take::<i32>().unwrap(), 12);
        assert!(width.get(&5_u8).is_none());
    }
}

use crate::{ParseError, Reflect, TypeDescriptor, Typed};
use core::fmt::{self, Debug, Formatter};
use prism_cell::ValueCell;

/// An owned, type-erased value that remembers its [`TypeDescriptor`].
///
/// `Variant` is what dynamic calls return and what owned arguments carry. Small values are
/// stored inline, so passing an `i32` or an `f64` around does not allocate.
///
/// ```
/// use prism_reflect::Variant;
///
/// let value = Variant::new(7_i32);
/// assert_eq!(value.type_name(), "i32");
/// assert_eq!(value.downcast_ref::<i32>(), Some(&7));
/// assert_eq!(value.to_text().unwrap(), "7");
/// assert_eq!(value.take::<i32>().unwrap(), 7);
/// ```
pub struct Variant {
    cell: ValueCell,
    ty: &'static TypeDescriptor,
}

impl Variant {
    /// Wraps `value`.
    pub fn new<T: Typed>(value: T) -> Self {
        Self {
            cell: ValueCell::with_value(value),
            ty: T::type_descriptor(),
        }
    }

    /// The unit value, returned by functions without a result.
    pub fn unit() -> Self {
        Self::new(())
    }

    /// The descriptor of the contained value.
    pub fn type_descriptor(&self) -> &'static TypeDescriptor {
        self.ty
    }

    /// The registered name of the contained value's type.
    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    /// Returns `true` if the value is a `T`.
    pub fn is<T: Typed>(&self) -> bool {
        self.cell.is::<T>()
    }

    /// Returns `true` if the value is `()`.
    pub fn is_unit(&self) -> bool {
        self.is::<()>()
    }

    /// Returns `true` if the value is stored without a heap allocation.
    pub fn is_inline(&self) -> bool {
        self.cell.is_inline()
    }

    /// Borrows the value as a `T`.
    pub fn downcast_ref<T: Typed>(&self) -> Option<&T> {
        self.cell.get_ref::<T>()
    }

    /// Mutably borrows the value as a `T`.
    pub fn downcast_mut<T: Typed>(&mut self) -> Option<&mut T> {
        self.cell.get_mut::<T>()
    }

    /// Returns a copy of the value as a `T`.
    pub fn get<T: Typed + Clone>(&self) -> Option<T> {
        self.cell.get::<T>()
    }

    /// Moves the value out as a `T`, handing the variant back on a type mismatch.
    pub fn take<T: Typed>(mut self) -> Result<T, Self> {
        match self.cell.take::<T>() {
            Some(value) => Ok(value),
            None => Err(self),
        }
    }

    /// Borrows the value as a [`Reflect`] object.
    pub fn as_reflect(&self) -> &dyn Reflect {
        self.ty
            .cell_as_reflect(&self.cell)
            .unwrap_or_else(|| unreachable!("a variant always holds a value of its own type"))
    }

    /// Clones the value if its type supports cloning.
    pub fn try_clone(&self) -> Option<Self> {
        self.ty.clone_value(self.as_reflect())
    }

    /// Formats the value as text.
    pub fn to_text(&self) -> Result<String, ParseError> {
        self.ty.format(self.as_reflect())
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && self
                .ty
                .equals(self.as_reflect(), other.as_reflect())
                .unwrap_or(false)
    }
}

impl Debug for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(text) => write!(f, "Variant({}: {text:?})", self.type_name()),
            Err(_) => write!(f, "Variant({})", self.type_name()),
        }
    }
}

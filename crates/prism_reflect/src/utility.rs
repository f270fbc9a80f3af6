//! Helpers for implementing [`Typed`](crate::Typed).

use crate::TypeDescriptor;
use core::any::{Any, TypeId};
use hashbrown::HashMap;
use once_cell::race::OnceBox;
use parking_lot::RwLock;

/// A container for a [`TypeDescriptor`], allowing it to be stored statically.
///
/// Every call to [`Typed::type_descriptor`] must hand back the same `&'static` descriptor, since
/// descriptors are compared by identity in hot paths. Declaring the cell as a `static` inside the
/// implementation provides that.
///
/// ## Non-Generic
///
/// ```
/// use prism_reflect::{TypeDescriptor, Typed, utility::TypeDescriptorCell};
///
/// struct Foo;
///
/// impl Typed for Foo {
///     fn type_descriptor() -> &'static TypeDescriptor {
///         static CELL: TypeDescriptorCell = TypeDescriptorCell::non_generic();
///         CELL.get_or_insert::<Self, _>(|| TypeDescriptor::class::<Self>("Foo"))
///     }
/// }
///
/// assert!(core::ptr::eq(Foo::type_descriptor(), Foo::type_descriptor()));
/// ```
///
/// ## Generic
///
/// A generic type shares one `static` between all of its instantiations, so the cell keeps one
/// descriptor per [`TypeId`].
///
/// ```
/// # use core::marker::PhantomData;
/// use prism_reflect::{TypeDescriptor, Typed, utility::TypeDescriptorCell};
///
/// struct Handle<T>(PhantomData<fn() -> T>);
///
/// impl<T: Typed> Typed for Handle<T> {
///     fn type_descriptor() -> &'static TypeDescriptor {
///         static CELL: TypeDescriptorCell = TypeDescriptorCell::generic();
///         CELL.get_or_insert::<Self, _>(|| TypeDescriptor::class::<Self>("Handle"))
///     }
/// }
///
/// assert_ne!(Handle::<i32>::type_descriptor(), Handle::<f32>::type_descriptor());
/// ```
///
/// [`Typed::type_descriptor`]: crate::Typed::type_descriptor
pub struct TypeDescriptorCell(TypeDescriptorCellType);

impl TypeDescriptorCell {
    /// Initialize a [`TypeDescriptorCell`] for non-generic types.
    pub const fn non_generic() -> Self {
        Self(TypeDescriptorCellType::NonGeneric(OnceBox::new()))
    }

    /// Initialize a [`TypeDescriptorCell`] for generic types.
    pub const fn generic() -> Self {
        Self(TypeDescriptorCellType::Generic(OnceBox::new()))
    }

    /// Returns the descriptor stored for `T`, generating it with `f` the first time.
    pub fn get_or_insert<T, F>(&self, f: F) -> &TypeDescriptor
    where
        T: Any + ?Sized,
        F: FnOnce() -> TypeDescriptor,
    {
        match &self.0 {
            TypeDescriptorCellType::NonGeneric(once) => once.get_or_init(|| Box::new(f())),
            TypeDescriptorCellType::Generic(once) => {
                let type_id = TypeId::of::<T>();
                let mapping = once.get_or_init(|| Box::new(RwLock::default()));
                if let Some(descriptor) = mapping.read().get(&type_id) {
                    return *descriptor;
                }

                // Leaked to obtain a `&'static` reference that outlives the lock guard.
                *mapping
                    .write()
                    .entry(type_id)
                    .or_insert_with(|| Box::leak(Box::new(f())))
            }
        }
    }
}

enum TypeDescriptorCellType {
    NonGeneric(OnceBox<TypeDescriptor>),
    Generic(OnceBox<RwLock<HashMap<TypeId, &'static TypeDescriptor>>>),
}

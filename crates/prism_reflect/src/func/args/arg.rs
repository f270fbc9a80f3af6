use crate::{
    Reflect, TypeDescriptor, Typed, Variant,
    func::args::{ArgError, Ownership},
};

/// An argument that can be passed to a [`DynamicFunction`].
///
/// [`DynamicFunction`]: crate::func::DynamicFunction
#[derive(Debug)]
pub struct Arg<'a> {
    index: usize,
    value: ArgValue<'a>,
}

impl<'a> Arg<'a> {
    /// Create a new [`Arg`] with the given index and value.
    pub fn new(index: usize, value: ArgValue<'a>) -> Self {
        Self { index, value }
    }

    /// The index of the argument.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The value of the argument.
    pub fn value(&self) -> &ArgValue<'a> {
        &self.value
    }

    /// Take the value of the argument.
    pub fn take_value(self) -> ArgValue<'a> {
        self.value
    }

    /// Returns `true` if the argument holds a `T`, regardless of ownership.
    pub fn is<T: Typed>(&self) -> bool {
        self.value.type_descriptor().is::<T>()
    }

    /// Takes the argument as an owned `T`.
    pub fn take_owned<T: Typed>(self) -> Result<T, ArgError> {
        let index = self.index;
        match self.value {
            ArgValue::Owned(value) => value.take::<T>().map_err(|value| ArgError::UnexpectedType {
                index,
                expected: T::type_descriptor().name(),
                received: value.type_name(),
            }),
            value => Err(ArgError::InvalidOwnership {
                index,
                expected: Ownership::Owned,
                received: value.ownership(),
            }),
        }
    }

    /// Takes the argument as a `&T`.
    ///
    /// Mutable references are accepted as well.
    pub fn take_ref<T: Typed>(self) -> Result<&'a T, ArgError> {
        let index = self.index;
        match self.value {
            ArgValue::Ref(value) => {
                downcast::<T, _>(index, value.reflect_type(), value.downcast_ref::<T>())
            }
            ArgValue::Mut(value) => {
                let value: &'a dyn Reflect = value;
                downcast::<T, _>(index, value.reflect_type(), value.downcast_ref::<T>())
            }
            ArgValue::Owned(_) => Err(ArgError::InvalidOwnership {
                index,
                expected: Ownership::Ref,
                received: Ownership::Owned,
            }),
        }
    }

    /// Takes the argument as a `&mut T`.
    pub fn take_mut<T: Typed>(self) -> Result<&'a mut T, ArgError> {
        let index = self.index;
        match self.value {
            ArgValue::Mut(value) => {
                let received = value.reflect_type();
                downcast::<T, _>(index, received, value.downcast_mut::<T>())
            }
            value => Err(ArgError::InvalidOwnership {
                index,
                expected: Ownership::Mut,
                received: value.ownership(),
            }),
        }
    }
}

fn downcast<T: Typed, R>(
    index: usize,
    received: &'static TypeDescriptor,
    value: Option<R>,
) -> Result<R, ArgError> {
    value.ok_or(ArgError::UnexpectedType {
        index,
        expected: T::type_descriptor().name(),
        received: received.name(),
    })
}

/// Represents an argument that can be passed to a [`DynamicFunction`].
///
/// [`DynamicFunction`]: crate::func::DynamicFunction
#[derive(Debug)]
pub enum ArgValue<'a> {
    /// An owned argument.
    Owned(Variant),
    /// An argument passed by shared reference.
    Ref(&'a dyn Reflect),
    /// An argument passed by mutable reference.
    Mut(&'a mut dyn Reflect),
}

impl<'a> ArgValue<'a> {
    /// The ownership of the argument.
    pub fn ownership(&self) -> Ownership {
        match self {
            Self::Owned(_) => Ownership::Owned,
            Self::Ref(_) => Ownership::Ref,
            Self::Mut(_) => Ownership::Mut,
        }
    }

    /// The descriptor of the argument's type.
    pub fn type_descriptor(&self) -> &'static TypeDescriptor {
        match self {
            Self::Owned(value) => value.type_descriptor(),
            Self::Ref(value) => value.reflect_type(),
            Self::Mut(value) => value.reflect_type(),
        }
    }

    /// Borrows the argument as a [`Reflect`] object.
    pub fn as_reflect(&self) -> &dyn Reflect {
        match self {
            Self::Owned(value) => value.as_reflect(),
            Self::Ref(value) => *value,
            Self::Mut(value) => &**value,
        }
    }
}

use crate::{TypeDescriptor, Typed, func::args::Ownership};

/// Type information for an argument.
///
/// Receivers of methods are described as the argument at index `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgInfo {
    index: usize,
    name: Option<&'static str>,
    ty: &'static TypeDescriptor,
    ownership: Ownership,
}

impl ArgInfo {
    /// Describes an owned argument of type `T` at the given index.
    pub fn new<T: Typed>(index: usize) -> Self {
        Self::with_ownership::<T>(index, Ownership::Owned)
    }

    /// Describes an argument of type `T` passed with the given ownership.
    pub fn with_ownership<T: Typed>(index: usize, ownership: Ownership) -> Self {
        Self {
            index,
            name: None,
            ty: T::type_descriptor(),
            ownership,
        }
    }

    /// Sets the name of the argument.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// The index of the argument within its function.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The name of the argument, if one was given.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// The descriptor of the argument's type.
    pub fn type_descriptor(&self) -> &'static TypeDescriptor {
        self.ty
    }

    /// The ownership of the argument.
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }
}

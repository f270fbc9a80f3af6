use crate::{ParseError, func::args::ArgError};
use thiserror::Error;

/// An error that occurs when calling a [`DynamicFunction`] or driving a class member through
/// its descriptor.
///
/// [`DynamicFunction`]: crate::func::DynamicFunction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CallError {
    /// The number of arguments does not match the function's signature.
    #[error("expected {expected} arguments but received {received}")]
    ArgCountMismatch {
        /// The number of arguments the function declares.
        expected: usize,
        /// The number of arguments that were passed.
        received: usize,
    },
    /// An argument could not be converted.
    #[error(transparent)]
    Arg(#[from] ArgError),
    /// A textual argument could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A direct call was made with a signature the function does not have.
    #[error("the function cannot be called directly as `{requested}`")]
    DirectSignatureMismatch {
        /// The requested signature.
        requested: &'static str,
    },
    /// The property has no setter.
    #[error("property `{property}` is read-only")]
    ReadOnly {
        /// The name of the property.
        property: String,
    },
    /// No member of the requested name exists on the class or its bases.
    #[error("`{class}` has no member named `{member}`")]
    MemberNotFound {
        /// The class that was searched.
        class: String,
        /// The missing member.
        member: String,
    },
    /// An object was passed to a class it does not belong to.
    #[error("`{received}` is not `{expected}` and does not derive from it")]
    NotDerived {
        /// The class that was expected.
        expected: String,
        /// The object's type.
        received: String,
    },
    /// No constructor accepts the given arguments.
    #[error("no constructor of `{class}` accepts the given arguments")]
    NoMatchingConstructor {
        /// The class being created.
        class: String,
    },
    /// A function returned a value of an unexpected type.
    #[error("expected a `{expected}` to be returned but received `{received}`")]
    UnexpectedReturn {
        /// The expected type name.
        expected: &'static str,
        /// The received type name.
        received: &'static str,
    },
}

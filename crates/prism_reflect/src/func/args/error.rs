use thiserror::Error;

use crate::func::args::Ownership;

/// An error that occurs when converting an [argument].
///
/// [argument]: crate::func::args::Arg
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArgError {
    /// The argument is not the expected type.
    #[error("expected `{expected}` but received `{received}` (@ argument index {index})")]
    UnexpectedType {
        /// The index of the argument.
        index: usize,
        /// The expected type name.
        expected: &'static str,
        /// The received type name.
        received: &'static str,
    },
    /// The argument has the wrong ownership.
    #[error("expected {expected} value but received {received} value (@ argument index {index})")]
    InvalidOwnership {
        /// The index of the argument.
        index: usize,
        /// The expected ownership.
        expected: Ownership,
        /// The received ownership.
        received: Ownership,
    },
    /// An argument was requested from an exhausted list.
    #[error("expected an argument at index {index} but the list is empty")]
    EmptyArgList {
        /// The index of the missing argument.
        index: usize,
    },
}

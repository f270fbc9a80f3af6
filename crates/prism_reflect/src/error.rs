use crate::Typed;
use thiserror::Error;

/// An error produced while converting a value to or from text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The text does not describe a value of the target type.
    #[error("cannot parse `{text}` as `{type_name}`: {reason}")]
    Malformed {
        /// The type that was being parsed.
        type_name: &'static str,
        /// The offending text.
        text: String,
        /// Why parsing failed.
        reason: String,
    },
    /// The type has no textual representation.
    #[error("`{type_name}` cannot be converted to or from text")]
    NotTextual {
        /// The type in question.
        type_name: &'static str,
    },
    /// A value was given to a descriptor of a different type.
    #[error("expected a value of type `{expected}` but received `{received}`")]
    TypeMismatch {
        /// The descriptor's type.
        expected: &'static str,
        /// The value's type.
        received: &'static str,
    },
}

impl ParseError {
    /// Creates a [`ParseError::Malformed`] for the type `T`.
    pub fn malformed<T: Typed>(text: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            type_name: T::type_descriptor().name(),
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }
}

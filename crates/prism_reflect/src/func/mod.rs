//! Reflection-based dynamic functions.
//!
//! This module provides a way to pass around and call functions dynamically
//! using the [`DynamicFunction`] type.
//!
//! Many simple functions and closures can be automatically converted to [`DynamicFunction`]
//! using the [`IntoFunction`] trait. Methods are functions whose first parameter is `&C` or
//! `&mut C`; the receiver is then passed as the first argument.
//!
//! Once the [`DynamicFunction`] is created, it can be called with a set of arguments provided
//! via an [`ArgList`], or directly with its exact Rust signature.
//!
//! # Example
//!
//! ```
//! # use prism_reflect::func::{ArgList, DynamicFunction, IntoFunction};
//! fn add(a: i32, b: i32) -> i32 {
//!   a + b
//! }
//!
//! let func: DynamicFunction = add.into_function();
//! let args: ArgList = ArgList::default()
//!   // Pushing a known type with owned ownership
//!   .with_owned(25_i32)
//!   // Pushing text, parsed into the declared `i32`
//!   .with_str("75");
//! let value = func.call(args).unwrap();
//! assert_eq!(value.downcast_ref::<i32>(), Some(&100));
//! ```

pub use direct::*;
pub use error::*;
pub use function::*;
pub use info::*;
pub use into_function::*;
pub use reflect_fn::*;

pub use args::{Arg, ArgError, ArgList};

pub mod args;
mod direct;
mod error;
mod function;
mod info;
mod into_function;
pub(crate) mod macros;
mod reflect_fn;

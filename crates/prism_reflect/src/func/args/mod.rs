//! Argument types and utilities for working with [`DynamicFunction`].
//!
//! [`DynamicFunction`]: crate::func::DynamicFunction

pub use arg::*;
pub use error::*;
pub use info::*;
pub use list::*;
pub use ownership::*;

mod arg;
mod error;
mod info;
mod list;
mod ownership;

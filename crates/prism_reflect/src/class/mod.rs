//! Class descriptors and the members they are made of.
//!
//! A [`ClassDescriptor`] lists the [fields], [properties], [methods], [signals] and
//! [constructors] of one Rust type, and links to the descriptor of its base class. Descriptors
//! are assembled with a [`ClassBuilder`].
//!
//! [fields]: ClassField
//! [properties]: ClassProperty
//! [methods]: ClassMethod
//! [signals]: ClassSignal
//! [constructors]: ClassConstructor

pub use builder::*;
pub use constructor::*;
pub use descriptor::*;
pub use field::ClassField;
pub use method::*;
pub use property::*;
pub use signal::*;

mod builder;
mod constructor;
mod descriptor;
pub(crate) mod field;
mod method;
mod property;
mod signal;

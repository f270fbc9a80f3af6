#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! # Overview
//!
//! Every reflected type has exactly one [`TypeDescriptor`], reached statically through
//! [`Typed::type_descriptor`] or dynamically through [`Reflect::reflect_type`]. Descriptors of
//! primitives and enums know how to parse and format values as text. Class types additionally
//! get a [`ClassDescriptor`], assembled with a [`ClassBuilder`], that lists their fields,
//! properties, methods, signals, constructors and base class.
//!
//! Owned values cross the dynamic boundary as [`Variant`]s. Arguments are collected in an
//! [`ArgList`](func::ArgList) and checked against the signature of the called
//! [`DynamicFunction`](func::DynamicFunction) before it runs, so a call with wrong arguments
//! reports an error instead of misbehaving.
//!
//! Descriptors are published in a [`TypeRegistry`], either directly or through a [`Module`]
//! that can later be unloaded as a unit. A [`PropertySheet`] stores an object's properties as
//! text, for configuration and scene files.

extern crate alloc;

mod class;
mod enums;
mod error;
pub mod func;
mod macros;
mod module;
mod registry;
mod sheet;
mod signal;
mod text;
mod type_info;
pub mod utility;
mod variant;

/// The reflection prelude.
///
/// This includes the most common types in this crate, re-exported for your convenience.
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        ClassBuilder, ClassDescriptor, Module, ModuleRegistrar, PropertySheet, Reflect, Signal,
        TextValue, TypeRegistry, Typed, Variant, class_field, reflect_class, reflect_enum,
        reflect_flags, reflect_primitive,
    };

    #[doc(hidden)]
    pub use crate::func::{ArgList, DynamicFunction, IntoFunction};
}

pub use class::*;
pub use enums::{EnumInfo, EnumVariant, ReflectEnum};
pub use error::*;
pub use module::*;
pub use registry::*;
pub use sheet::*;
pub use signal::{ConnectionId, Signal};
pub use text::TextValue;
pub use type_info::*;
pub use variant::*;

#[doc(hidden)]
pub mod __macro_exports {
    pub use crate::enums::{format_enum, parse_enum};

    #[cfg(feature = "auto_register")]
    pub use inventory;
}

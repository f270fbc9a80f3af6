#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]

//! Runtime reflection for plain Rust types.
//!
//! Types are described by class descriptors listing their fields, properties, methods,
//! signals and constructors. Descriptors are published in a type registry, where tools can
//! look them up by name and create, inspect and drive objects without compile-time knowledge
//! of their types.
//!
//! ```
//! use prism::prelude::*;
//!
//! #[derive(Default)]
//! struct Door {
//!     open: bool,
//! }
//!
//! impl Door {
//!     fn toggle(&mut self) {
//!         self.open = !self.open;
//!     }
//! }
//!
//! reflect_class!(Door);
//!
//! let registry = TypeRegistry::with_builtins();
//! registry.register_class_type(
//!     "Door",
//!     ClassBuilder::<Door>::new("Door")
//!         .constructor(Door::default)
//!         .read_only_property("Open", |d: &Door| d.open)
//!         .method("Toggle", Door::toggle)
//!         .build()
//!         .into(),
//! );
//!
//! let class = registry.get_class_type("Door").unwrap();
//! let mut door = class.create_dynamic(ArgList::new()).unwrap();
//! class.invoke(door.as_mut(), "Toggle", ArgList::new()).unwrap();
//! assert_eq!(class.get_property_str(door.as_ref(), "Open").unwrap(), "true");
//! ```

/// `use prism::prelude::*;` to import the common reflection types and macros.
pub mod prelude {
    #[doc(hidden)]
    pub use prism_reflect::prelude::*;
}

/// Type-erased storage for a single value.
pub mod cell {
    pub use prism_cell::*;
}

/// Type descriptors, class descriptors, dynamic invocation and the type registry.
pub mod reflect {
    pub use prism_reflect::*;
}

pub use prism_reflect::{
    class_field, reflect_class, reflect_enum, reflect_flags, reflect_primitive,
};

#[cfg(feature = "auto_register")]
pub use prism_reflect::register_static_module;

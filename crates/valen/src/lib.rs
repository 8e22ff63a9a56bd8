//! Valen: integer-valued enums and bit-flag sets in native memory.
//!
//! This is the top-level facade crate that re-exports the public API from the
//! Valen sub-crates. For most users, adding `valen` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use valen::prelude::*;
//!
//! valued_enum! {
//!     pub enum Fruit {
//!         Apple = 1,
//!         Pear = 2,
//!         Orange = 4,
//!         Banana = 8,
//!     }
//! }
//!
//! // An exact constant wins over any decomposition.
//! let banana = Fruit::from_value(8).unwrap();
//! assert_eq!(banana.to_string(), "Banana");
//!
//! // Other values decompose greedily, in declaration order.
//! let mixed = Fruit::from_value(3).unwrap();
//! assert_eq!(mixed.names(), ["Apple", "Pear"]);
//! assert_eq!(mixed.to_string(), "Apple|Pear");
//!
//! // Unreachable values fail, but keep the raw integer.
//! assert_eq!(Fruit::from_value(16).unwrap_err().value(), 16);
//!
//! // Store an enum in native memory and read it back.
//! let owned = pointer_to(banana).unwrap();
//! let ptr = owned.pointer();
//! assert_eq!(ptr.get_enum().unwrap(), Fruit::Banana);
//! ptr.set_enum(Fruit::Orange).unwrap();
//! assert_eq!(ptr.get_enum().unwrap(), Fruit::Orange);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`codec`] | `valen-core` | Enum domains, registry, value codec, valued handles |
//! | [`mem`] | `valen-mem` | Element types, typed pointers, native blocks |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Enum domains, the domain registry, the value codec and valued handles
/// (`valen-core`).
///
/// Declare domains with [`codec::EnumDomain::builder`] or the
/// [`valued_enum!`] macro, and decode raw integers with [`codec::decode`].
pub use valen_core as codec;

/// Typed pointers into native memory (`valen-mem`).
///
/// [`mem::TypedPointer`] reads and writes exactly one element width;
/// [`mem::NativeBlock`] provides owned, bounds-checked memory to point into.
pub use valen_mem as mem;

pub use valen_core::valued_enum;

/// Common imports for typical Valen usage.
///
/// ```rust
/// use valen::prelude::*;
/// ```
pub mod prelude {
    // Domains and configuration
    pub use valen_core::{DomainConfig, EnumConstant, EnumDomain, ZeroPolicy};

    // Codec and handles
    pub use valen_core::{decode, encode, Decomposition, ValuedEnum, ValuedHandle};

    // Errors
    pub use valen_core::{DecodeError, DomainError};
    pub use valen_mem::PointerError;

    // Memory
    pub use valen_mem::{
        pointer_to, ElementType, NativeBlock, NativeValue, OwnedPointer, PrimitiveType,
        TypedPointer,
    };

    pub use crate::valued_enum;
}

//! Typed pointers into native memory.
//!
//! A [`TypedPointer`] is an address bound to an [`ElementType`]. `get` reads
//! exactly `size_of(element)` bytes in host byte order; `set` writes exactly
//! that many. For enum element types the raw integer goes through the
//! value codec in `valen-core`. This crate is one of two that may contain
//! `unsafe` code (along with `valen-ffi`); all raw memory access lives in
//! `raw.rs`.
//!
//! # Architecture
//!
//! ```text
//! NativeBlock (owned, zeroed, 8-byte aligned)
//! └── TypedPointer<'mem> (address + ElementType + optional bounds)
//!     ├── get/set        → NativeValue
//!     ├── get_enum/set_enum → ValuedHandle (decode / raw write)
//!     └── offset/get_at/set_at (n * size_of(element) strides)
//! ```
//!
//! Pointers never own memory. Pointers derived from a [`NativeBlock`]
//! borrow it and carry its bounds; pointers made with
//! [`TypedPointer::from_raw`] are unbounded and rely on the caller's
//! safety contract.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod block;
pub mod element;
pub mod error;
pub mod pointer;
mod raw;

pub use block::{pointer_to, NativeBlock, OwnedPointer};
pub use element::{ElementType, NativeValue, PrimitiveType};
pub use error::PointerError;
pub use pointer::TypedPointer;

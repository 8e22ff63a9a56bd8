//! Core types for valued enums crossing the native boundary.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! [`EnumDomain`] (an ordered table of named integer constants), the value
//! codec that decides which constant or combination of constants a raw
//! integer represents, and the [`ValuedHandle`] returned by a decode.
//!
//! ```text
//! raw i64 ──decode──▶ ValuedHandle { raw, Arc<EnumDomain>, Decomposition }
//!    ▲                      │
//!    └──────encode──────────┘   (identity on the stored integer)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod id;
pub mod registry;
pub mod typed;
pub mod valued;

pub use codec::{decode, decompose, encode, Decomposition};
pub use config::{DomainConfig, ZeroPolicy};
pub use domain::{EnumConstant, EnumDomain, EnumDomainBuilder};
pub use error::{DecodeError, DomainError};
pub use id::DomainId;
pub use registry::DomainRegistry;
pub use typed::ValuedEnum;
pub use valued::{ConstantIter, ValuedHandle};

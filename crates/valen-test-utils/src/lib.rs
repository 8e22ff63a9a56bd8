//! Test utilities for Valen development.
//!
//! [`fixtures`] declares the enum types the test suites share (`MyEnum`,
//! `Fruit`) and builders for synthetic domains. [`native`] is a mock native
//! library exposing the C call shapes a foreign caller would use to pass
//! enums by value and by pointer.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod native;

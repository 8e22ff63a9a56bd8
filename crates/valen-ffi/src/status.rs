//! C-compatible status codes.
//!
//! [`ValenStatus`] is a `repr(i32)` enum covering every failure the C ABI
//! can report. Conversions from the Rust error types (`DecodeError`,
//! `DomainError`, `PointerError`) are provided.

use valen_core::{DecodeError, DomainError};
use valen_mem::PointerError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValenStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// An argument is null, out of range, or otherwise invalid.
    InvalidArgument = -2,
    /// Caller-provided buffer is too small.
    BufferTooSmall = -3,
    /// The value is not representable by the domain's constants.
    DecodeFailed = -4,
    /// Value and element type disagree.
    TypeMismatch = -5,
    /// Value does not fit the storage width.
    ValueOutOfRange = -6,
    /// Access outside a bounded block.
    OutOfBounds = -7,
    /// Two constants in one domain share a name.
    DuplicateConstant = -8,
    /// A constant name is not declared in the domain.
    UnknownConstant = -9,
    /// Allocation failed.
    AllocationFailed = -10,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -11,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&DecodeError> for ValenStatus {
    fn from(_e: &DecodeError) -> Self {
        ValenStatus::DecodeFailed
    }
}

impl From<&DomainError> for ValenStatus {
    fn from(e: &DomainError) -> Self {
        match e {
            DomainError::EmptyName => ValenStatus::InvalidArgument,
            DomainError::DuplicateConstant { .. } => ValenStatus::DuplicateConstant,
            DomainError::UnknownConstant { .. } => ValenStatus::UnknownConstant,
            DomainError::AlreadyRegistered { .. } => ValenStatus::InvalidArgument,
            DomainError::DomainMismatch { .. } => ValenStatus::TypeMismatch,
        }
    }
}

impl From<&PointerError> for ValenStatus {
    fn from(e: &PointerError) -> Self {
        match e {
            PointerError::TypeMismatch { .. } => ValenStatus::TypeMismatch,
            PointerError::Decode(inner) => ValenStatus::from(inner),
            PointerError::OutOfBounds { .. } => ValenStatus::OutOfBounds,
            PointerError::InvalidAddress { .. } => ValenStatus::InvalidArgument,
            PointerError::ValueOutOfRange { .. } => ValenStatus::ValueOutOfRange,
            PointerError::AllocationFailed { .. } => ValenStatus::AllocationFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valen_mem::PrimitiveType;
    use valen_test_utils::fixtures::fruit_domain;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(ValenStatus::Ok as i32, 0);
        assert_eq!(ValenStatus::InvalidHandle as i32, -1);
        assert_eq!(ValenStatus::InvalidArgument as i32, -2);
        assert_eq!(ValenStatus::BufferTooSmall as i32, -3);
        assert_eq!(ValenStatus::DecodeFailed as i32, -4);
        assert_eq!(ValenStatus::TypeMismatch as i32, -5);
        assert_eq!(ValenStatus::ValueOutOfRange as i32, -6);
        assert_eq!(ValenStatus::OutOfBounds as i32, -7);
        assert_eq!(ValenStatus::DuplicateConstant as i32, -8);
        assert_eq!(ValenStatus::UnknownConstant as i32, -9);
        assert_eq!(ValenStatus::AllocationFailed as i32, -10);
        assert_eq!(ValenStatus::InternalError as i32, -11);
        assert_eq!(ValenStatus::Panicked as i32, -128);
    }

    #[test]
    fn decode_error_to_status() {
        let err = valen_core::decode(16, &fruit_domain()).unwrap_err();
        assert_eq!(ValenStatus::from(&err), ValenStatus::DecodeFailed);
        assert_eq!(
            ValenStatus::from(&PointerError::Decode(err)),
            ValenStatus::DecodeFailed
        );
    }

    #[test]
    fn domain_error_to_status() {
        assert_eq!(
            ValenStatus::from(&DomainError::DuplicateConstant {
                domain: "D".into(),
                name: "A".into()
            }),
            ValenStatus::DuplicateConstant
        );
        assert_eq!(
            ValenStatus::from(&DomainError::EmptyName),
            ValenStatus::InvalidArgument
        );
    }

    #[test]
    fn pointer_error_to_status() {
        assert_eq!(
            ValenStatus::from(&PointerError::ValueOutOfRange {
                value: 1 << 40,
                repr: PrimitiveType::I32
            }),
            ValenStatus::ValueOutOfRange
        );
        assert_eq!(
            ValenStatus::from(&PointerError::OutOfBounds {
                offset: 4,
                size: 4,
                available: 0
            }),
            ValenStatus::OutOfBounds
        );
        assert_eq!(
            ValenStatus::from(&PointerError::TypeMismatch {
                expected: "i32".into(),
                found: "u8".into()
            }),
            ValenStatus::TypeMismatch
        );
    }
}

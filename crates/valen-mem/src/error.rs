//! Pointer access errors.

use std::error::Error;
use std::fmt;

use valen_core::DecodeError;

use crate::element::PrimitiveType;

/// Errors from typed pointer access and native block allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerError {
    /// The value's type does not match the pointer's element type
    /// (including an enum handle from a different domain).
    TypeMismatch {
        /// The pointer's element type.
        expected: String,
        /// The type of the value supplied.
        found: String,
    },
    /// The stored integer is not representable in the pointer's enum domain.
    /// The raw value is available via [`DecodeError::value`].
    Decode(DecodeError),
    /// The access or offset leaves the bounds of the backing block.
    OutOfBounds {
        /// Byte offset relative to the pointer (the block start for
        /// [`NativeBlock::write_at`](crate::NativeBlock::write_at)).
        offset: isize,
        /// Bytes the access needs at `offset`; `0` for pointer arithmetic.
        size: usize,
        /// Bytes available in that direction.
        available: usize,
    },
    /// Address arithmetic overflowed or produced a null address.
    InvalidAddress {
        /// The base address the arithmetic started from.
        address: usize,
    },
    /// The raw integer does not fit the declared storage width.
    ValueOutOfRange {
        /// The value that was being written.
        value: i64,
        /// The storage type it did not fit.
        repr: PrimitiveType,
    },
    /// The allocator could not provide a block of this size.
    AllocationFailed {
        /// Requested size in bytes.
        bytes: usize,
    },
}

impl fmt::Display for PointerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: pointer to {expected}, value of type {found}")
            }
            Self::Decode(e) => write!(f, "decode failed: {e}"),
            Self::OutOfBounds {
                offset,
                size: 0,
                available,
            } => write!(f, "offset {offset} out of bounds ({available} bytes available)"),
            Self::OutOfBounds {
                offset,
                size,
                available,
            } => write!(
                f,
                "{size}-byte access at offset {offset} out of bounds ({available} bytes available)"
            ),
            Self::InvalidAddress { address } => {
                write!(f, "address arithmetic from {address:#x} is invalid")
            }
            Self::ValueOutOfRange { value, repr } => {
                write!(f, "value {value} does not fit in {repr}")
            }
            Self::AllocationFailed { bytes } => {
                write!(f, "failed to allocate {bytes} bytes")
            }
        }
    }
}

impl Error for PointerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for PointerError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

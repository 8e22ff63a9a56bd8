//! C-compatible enums for storage widths and zero handling.

use valen_core::ZeroPolicy;
use valen_mem::PrimitiveType;

/// Storage width and signedness of an enum in native memory.
///
/// Passed to the C ABI as `i32`; C enums default to [`ValenRepr::I32`].
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValenRepr {
    /// `int8_t`.
    I8 = 0,
    /// `uint8_t`.
    U8 = 1,
    /// `int16_t`.
    I16 = 2,
    /// `uint16_t`.
    U16 = 3,
    /// `int32_t`.
    I32 = 4,
    /// `uint32_t`.
    U32 = 5,
    /// `int64_t`.
    I64 = 6,
    /// `uint64_t`.
    U64 = 7,
}

/// How a domain without a zero-valued constant decodes `0`.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValenZeroPolicy {
    /// `0` decodes to the empty set.
    EmptySet = 0,
    /// `0` is a decode failure.
    Reject = 1,
}

/// Parse a raw `repr` argument.
pub(crate) fn parse_repr(repr: i32) -> Option<PrimitiveType> {
    let p = match repr {
        x if x == ValenRepr::I8 as i32 => PrimitiveType::I8,
        x if x == ValenRepr::U8 as i32 => PrimitiveType::U8,
        x if x == ValenRepr::I16 as i32 => PrimitiveType::I16,
        x if x == ValenRepr::U16 as i32 => PrimitiveType::U16,
        x if x == ValenRepr::I32 as i32 => PrimitiveType::I32,
        x if x == ValenRepr::U32 as i32 => PrimitiveType::U32,
        x if x == ValenRepr::I64 as i32 => PrimitiveType::I64,
        x if x == ValenRepr::U64 as i32 => PrimitiveType::U64,
        _ => return None,
    };
    Some(p)
}

/// Parse a raw zero-policy argument.
pub(crate) fn parse_zero_policy(policy: i32) -> Option<ZeroPolicy> {
    match policy {
        x if x == ValenZeroPolicy::EmptySet as i32 => Some(ZeroPolicy::EmptySet),
        x if x == ValenZeroPolicy::Reject as i32 => Some(ZeroPolicy::Reject),
        _ => None,
    }
}

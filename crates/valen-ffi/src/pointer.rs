//! Enum memory access FFI.
//!
//! Reads and writes an enum of a given domain at a caller-owned address,
//! using exactly the storage width named by `repr`.

use std::ffi::c_void;
use std::ptr::NonNull;

use valen_core::ValuedHandle;
use valen_mem::{ElementType, TypedPointer};

use crate::domain::get_domain;
use crate::status::ValenStatus;
use crate::types::parse_repr;

/// Resolve the domain and build an unbounded pointer at `addr`.
///
/// # Safety
///
/// `addr` must be valid for reads and writes of the width named by `repr`
/// for the lifetime of the returned pointer.
#[allow(unsafe_code)]
unsafe fn enum_pointer(
    domain: u64,
    addr: *mut c_void,
    repr: i32,
) -> Result<TypedPointer<'static>, ValenStatus> {
    let addr = NonNull::new(addr.cast::<u8>()).ok_or(ValenStatus::InvalidArgument)?;
    let repr = parse_repr(repr).ok_or(ValenStatus::InvalidArgument)?;
    let domain = get_domain(domain).ok_or(ValenStatus::InvalidHandle)?;
    // SAFETY: forwarded from the caller contract.
    Ok(unsafe { TypedPointer::from_raw(addr, ElementType::Enum { domain, repr }) })
}

/// Read the enum stored at `addr` and write its raw value to `out`.
///
/// Returns `DecodeFailed` if the stored integer is not representable in the
/// domain; `out` is not written in that case.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_enum_get(
    domain: u64,
    addr: *const c_void,
    repr: i32,
    out: *mut i64,
) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return ValenStatus::InvalidArgument as i32;
        }
        // SAFETY: addr is readable for the width of `repr` per caller
        // contract; the pointer is only read from.
        let ptr = match unsafe { enum_pointer(domain, addr.cast_mut(), repr) } {
            Ok(p) => p,
            Err(status) => return status as i32,
        };
        let handle = match ptr.get_enum() {
            Ok(h) => h,
            Err(e) => return ValenStatus::from(&e) as i32,
        };
        // SAFETY: out is valid per caller contract.
        unsafe { *out = handle.value() };
        ValenStatus::Ok as i32
    })
}

/// Store `value` as an enum of the domain at `addr`.
///
/// The value is written as-is at the width of `repr`; it is not required to
/// decode. Returns `ValueOutOfRange` if it does not fit that width.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_enum_set(domain: u64, addr: *mut c_void, repr: i32, value: i64) -> i32 {
    ffi_guard!({
        // SAFETY: addr is writable for the width of `repr` per caller
        // contract.
        let ptr = match unsafe { enum_pointer(domain, addr, repr) } {
            Ok(p) => p,
            Err(status) => return status as i32,
        };
        let Some(domain) = ptr.element_type().domain().cloned() else {
            return ValenStatus::InternalError as i32;
        };
        match ptr.set_enum(ValuedHandle::from_raw(value, domain)) {
            Ok(()) => ValenStatus::Ok as i32,
            Err(e) => ValenStatus::from(&e) as i32,
        }
    })
}

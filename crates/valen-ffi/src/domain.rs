//! Domain lifecycle FFI: create, destroy, inspect.
//!
//! Domains live in a global handle table as `Arc<EnumDomain>`. The table lock
//! is held only for lookup; codec and pointer calls work on a cloned `Arc`.

use std::ffi::{c_char, CStr};
use std::sync::{Arc, Mutex};

use valen_core::{DomainConfig, EnumDomain};

use crate::handle::HandleTable;
use crate::status::ValenStatus;
use crate::types::parse_zero_policy;
use crate::ValenZeroPolicy;

static DOMAINS: Mutex<HandleTable<Arc<EnumDomain>>> = Mutex::new(HandleTable::new());

/// Clone the domain behind a handle, briefly locking the global table.
///
/// Returns `None` if the handle is invalid or the mutex is poisoned.
pub(crate) fn get_domain(handle: u64) -> Option<Arc<EnumDomain>> {
    DOMAINS.lock().ok()?.get(handle).cloned()
}

/// Read a NUL-terminated UTF-8 string.
///
/// # Safety
///
/// `s` must be null or a valid NUL-terminated C string.
#[allow(unsafe_code)]
unsafe fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    // SAFETY: non-null, and NUL-terminated per the caller contract.
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// Create a domain from `n` constants.
///
/// `names` is an array of `n` C strings and `values` an array of `n`
/// integers, in declaration order. Equivalent to
/// [`valen_domain_create_ex`] with the default zero policy.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_domain_create(
    name: *const c_char,
    names: *const *const c_char,
    values: *const i64,
    n: usize,
    out: *mut u64,
) -> i32 {
    valen_domain_create_ex(name, names, values, n, ValenZeroPolicy::EmptySet as i32, out)
}

/// Create a domain with an explicit zero policy.
///
/// `zero_policy`: 0=EmptySet, 1=Reject. On success writes the handle to
/// `out`. Duplicate constant names fail with `DuplicateConstant`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_domain_create_ex(
    name: *const c_char,
    names: *const *const c_char,
    values: *const i64,
    n: usize,
    zero_policy: i32,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        if out.is_null() || (n > 0 && (names.is_null() || values.is_null())) {
            return ValenStatus::InvalidArgument as i32;
        }
        let zero = match parse_zero_policy(zero_policy) {
            Some(z) => z,
            None => return ValenStatus::InvalidArgument as i32,
        };
        // SAFETY: caller guarantees `name` is a valid C string.
        let domain_name = match unsafe { read_str(name) } {
            Some(s) => s,
            None => return ValenStatus::InvalidArgument as i32,
        };

        let mut builder =
            EnumDomain::builder(domain_name).config(DomainConfig::new().with_zero_policy(zero));
        if n > 0 {
            // SAFETY: both arrays hold `n` elements per caller contract.
            let (names, values) = unsafe {
                (
                    std::slice::from_raw_parts(names, n),
                    std::slice::from_raw_parts(values, n),
                )
            };
            for (&constant, &value) in names.iter().zip(values) {
                // SAFETY: each entry is a valid C string per caller contract.
                let constant = match unsafe { read_str(constant) } {
                    Some(s) => s,
                    None => return ValenStatus::InvalidArgument as i32,
                };
                builder = builder.constant(constant, value);
            }
        }

        let domain = match builder.build() {
            Ok(d) => d,
            Err(e) => return ValenStatus::from(&e) as i32,
        };
        let handle = ffi_lock!(DOMAINS).insert(Arc::new(domain));
        // SAFETY: out is valid per caller contract.
        unsafe { *out = handle };
        ValenStatus::Ok as i32
    })
}

/// Destroy a domain handle.
///
/// Handles already returned by decoding keep the domain alive on the Rust
/// side; only the C handle is released.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_domain_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(DOMAINS).remove(handle) {
            Some(_) => ValenStatus::Ok as i32,
            None => ValenStatus::InvalidHandle as i32,
        }
    })
}

/// Number of constants declared in the domain.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_domain_len(handle: u64, out: *mut usize) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return ValenStatus::InvalidArgument as i32;
        }
        let domain = match get_domain(handle) {
            Some(d) => d,
            None => return ValenStatus::InvalidHandle as i32,
        };
        // SAFETY: out is valid per caller contract.
        unsafe { *out = domain.len() };
        ValenStatus::Ok as i32
    })
}

/// Value of the constant at declaration `index`.
///
/// Returns `InvalidArgument` if `index >= len`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_domain_constant_value(handle: u64, index: usize, out: *mut i64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return ValenStatus::InvalidArgument as i32;
        }
        let domain = match get_domain(handle) {
            Some(d) => d,
            None => return ValenStatus::InvalidHandle as i32,
        };
        let value = match domain.constant(index) {
            Some(c) => c.value,
            None => return ValenStatus::InvalidArgument as i32,
        };
        // SAFETY: out is valid per caller contract.
        unsafe { *out = value };
        ValenStatus::Ok as i32
    })
}

//! Mock native library.
//!
//! Four C functions over `MyEnum`, one per call shape: enum returned by
//! value, enum passed by value, enum passed by pointer, and a pointer to an
//! enum returned. C passes enums as `int`, so every enum here is an `i32`.

#![allow(unsafe_code)]

use std::cell::Cell;

thread_local! {
    static RETURN_SLOT: Cell<i32> = const { Cell::new(0) };
}

/// `MyEnum int_to_my_enum(int value)`.
#[no_mangle]
pub extern "C" fn int_to_my_enum(value: i32) -> i32 {
    value
}

/// `int my_enum_to_int(MyEnum value)`.
#[no_mangle]
pub extern "C" fn my_enum_to_int(value: i32) -> i32 {
    value
}

/// `int p_my_enum_to_int(const MyEnum *value)`. Returns `-1` for null.
///
/// # Safety
///
/// `value` must be null or valid for a read of 4 bytes.
#[no_mangle]
pub unsafe extern "C" fn p_my_enum_to_int(value: *const i32) -> i32 {
    if value.is_null() {
        return -1;
    }
    // SAFETY: non-null and readable per the caller contract; no alignment
    // is assumed.
    unsafe { value.read_unaligned() }
}

/// `MyEnum *int_to_p_my_enum(int value)`.
///
/// The pointer addresses thread-local storage, valid until the calling
/// thread exits or calls this function again.
#[no_mangle]
pub extern "C" fn int_to_p_my_enum(value: i32) -> *mut i32 {
    RETURN_SLOT.with(|slot| {
        slot.set(value);
        slot.as_ptr()
    })
}

//! Codec FFI: decode raw integers to constant indices, format them as text.

use std::ffi::c_char;

use valen_core::{decode, ValuedHandle};

use crate::domain::get_domain;
use crate::status::ValenStatus;

/// Decode `value` against a domain into declaration indices.
///
/// An exact match yields one index; a combination yields its contributing
/// constants in declaration order; `0` without a zero constant may yield
/// none (per the domain's zero policy). Unrepresentable values return
/// `DecodeFailed`.
///
/// Pass a null `indices_out` with `cap == 0` to query the count only.
/// If `cap` is smaller than the count, returns `BufferTooSmall` and writes
/// nothing.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_decode(
    domain: u64,
    value: i64,
    indices_out: *mut usize,
    cap: usize,
    count_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if count_out.is_null() || (indices_out.is_null() && cap != 0) {
            return ValenStatus::InvalidArgument as i32;
        }
        let domain = match get_domain(domain) {
            Some(d) => d,
            None => return ValenStatus::InvalidHandle as i32,
        };
        let handle = match decode(value, &domain) {
            Ok(h) => h,
            Err(e) => return ValenStatus::from(&e) as i32,
        };
        let indices = handle.decomposition().indices();

        if !indices_out.is_null() {
            if cap < indices.len() {
                return ValenStatus::BufferTooSmall as i32;
            }
            // SAFETY: indices_out holds `cap >= indices.len()` elements per
            // caller contract.
            unsafe {
                std::ptr::copy_nonoverlapping(indices.as_ptr(), indices_out, indices.len());
            }
        }
        // SAFETY: count_out is valid per caller contract.
        unsafe { *count_out = indices.len() };
        ValenStatus::Ok as i32
    })
}

/// Format `value` as text: a constant name, names joined by the domain's
/// separator (`"Apple|Pear"`), or `Domain(raw)` when nothing decodes.
///
/// Never fails on the value itself. Writes a NUL-terminated string to `buf`
/// and its length (excluding the terminator) to `len_out`. Pass a null
/// `buf` with `buf_len == 0` to query the length. Returns `BufferTooSmall`
/// if `buf_len <= len`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_format(
    domain: u64,
    value: i64,
    buf: *mut c_char,
    buf_len: usize,
    len_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if len_out.is_null() || (buf.is_null() && buf_len != 0) {
            return ValenStatus::InvalidArgument as i32;
        }
        let domain = match get_domain(domain) {
            Some(d) => d,
            None => return ValenStatus::InvalidHandle as i32,
        };
        let text = ValuedHandle::from_raw(value, domain).to_string();
        let bytes = text.as_bytes();

        if !buf.is_null() {
            if buf_len <= bytes.len() {
                return ValenStatus::BufferTooSmall as i32;
            }
            // SAFETY: buf is valid for `buf_len > bytes.len()` bytes per
            // caller contract.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), bytes.len());
                *buf.add(bytes.len()) = 0;
            }
        }
        // SAFETY: len_out is valid per caller contract.
        unsafe { *len_out = bytes.len() };
        ValenStatus::Ok as i32
    })
}

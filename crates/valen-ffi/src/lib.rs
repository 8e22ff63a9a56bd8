//! C ABI for Valen.
//!
//! Exposes enum domains, the value codec and typed enum memory access to C
//! callers. This crate is one of two that may contain `unsafe` code (along
//! with `valen-mem`); each entry point opts in with `#[allow(unsafe_code)]`.
//!
//! Conventions shared by every `valen_*` function:
//! - the return value is a [`ValenStatus`] as `i32`, `0` on success;
//! - results are written through out-pointers, and never on error;
//! - domains are `u64` handles from a generation-checked table, so stale or
//!   double-destroyed handles report `InvalidHandle`;
//! - panics are caught at the boundary and reported as `Panicked`, with the
//!   message available from [`valen_last_panic_message`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::cell::RefCell;
use std::ffi::c_char;
use std::panic;

/// Run `$body` under `catch_unwind`, returning `Panicked` if it unwinds.
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard_or!($crate::status::ValenStatus::Panicked as i32, $body)
    };
}

/// Like `ffi_guard!`, but returns `$default` if the body unwinds.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $default
            }
        }
    };
}

/// Lock a mutex, returning `InternalError` from the guarded body if it is
/// poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::ValenStatus::InternalError as i32,
        }
    };
}

pub mod codec;
pub mod domain;
mod handle;
pub mod pointer;
pub mod status;
pub mod types;

pub use status::ValenStatus;
pub use types::{ValenRepr, ValenZeroPolicy};

thread_local! {
    /// Message of the most recent panic caught on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Store a caught panic's message for [`valen_last_panic_message`].
pub(crate) fn record_panic(payload: &(dyn std::any::Any + Send)) {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    };
    tracing::warn!(message = %message, "panic caught at the C boundary");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = message);
}

/// Copy the last caught panic message on this thread into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator), or
/// `0` if no panic has been caught. At most `buf_len - 1` bytes are copied,
/// always NUL-terminated. Pass a null `buf` to query the length.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn valen_last_panic_message(buf: *mut c_char, buf_len: usize) -> i32 {
    let copied = panic::catch_unwind(|| {
        LAST_PANIC.with(|cell| {
            let message = cell.borrow();
            let bytes = message.as_bytes();
            if !buf.is_null() && buf_len > 0 {
                let n = bytes.len().min(buf_len - 1);
                // SAFETY: caller guarantees `buf` is valid for `buf_len`
                // bytes; `n + 1 <= buf_len`.
                unsafe {
                    std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                    *buf.add(n) = 0;
                }
            }
            i32::try_from(bytes.len()).unwrap_or(i32::MAX)
        })
    });
    copied.unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_passes_through_normal_results() {
        let status = ffi_guard!({ ValenStatus::Ok as i32 });
        assert_eq!(status, 0);
        let value = ffi_guard_or!(7u8, { 3u8 });
        assert_eq!(value, 3);
    }

    #[test]
    fn guard_catches_panic_and_stores_message() {
        LAST_PANIC.with(|cell| cell.borrow_mut().clear());
        assert_eq!(valen_last_panic_message(std::ptr::null_mut(), 0), 0);

        let status = ffi_guard!({
            panic!("deliberate panic at the boundary");
        });
        assert_eq!(status, ValenStatus::Panicked as i32);

        let len = valen_last_panic_message(std::ptr::null_mut(), 0);
        assert!(len > 0);
        let mut buf = vec![0u8; len as usize + 1];
        let len2 = valen_last_panic_message(buf.as_mut_ptr().cast(), buf.len());
        assert_eq!(len, len2);
        let msg = std::str::from_utf8(&buf[..len as usize]).unwrap();
        assert!(msg.contains("deliberate panic at the boundary"), "{msg:?}");
        assert_eq!(buf[len as usize], 0);
    }

    #[test]
    fn panic_message_truncates_to_buffer() {
        let _ = ffi_guard_or!(0, {
            panic!("{}", "x".repeat(64));
        });
        let mut buf = [0xFFu8; 8];
        let len = valen_last_panic_message(buf.as_mut_ptr().cast(), buf.len());
        assert_eq!(len, 64);
        assert_eq!(&buf[..7], b"xxxxxxx");
        assert_eq!(buf[7], 0);
    }

    #[test]
    fn poisoned_lock_reports_internal_error() {
        let m = std::sync::Arc::new(std::sync::Mutex::new(0u8));
        let m2 = std::sync::Arc::clone(&m);
        let _ = std::thread::spawn(move || {
            let _g = m2.lock().unwrap();
            panic!("poison");
        })
        .join();
        let status = ffi_guard!({
            let _g = ffi_lock!(m);
            ValenStatus::Ok as i32
        });
        assert_eq!(status, ValenStatus::InternalError as i32);
    }
}

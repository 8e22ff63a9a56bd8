//! Low-level primitives for native memory operations.
//!
//! The only module in this crate with `unsafe` bodies. Four functions, each
//! with a `// SAFETY:` comment; callers uphold the documented contracts.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

/// Alignment of every [`NativeBlock`](crate::NativeBlock): enough for any
/// [`PrimitiveType`](crate::PrimitiveType).
pub(crate) const BLOCK_ALIGN: usize = 8;

/// Copy `out.len()` bytes starting at `addr` into `out`.
///
/// # Safety
///
/// `addr` must be valid for reads of `out.len()` bytes. No alignment is
/// required.
pub(crate) unsafe fn read_bytes(addr: NonNull<u8>, out: &mut [u8]) {
    // SAFETY: caller guarantees `addr..addr+len` is readable; `out` is a
    // distinct Rust allocation so the ranges cannot overlap.
    unsafe { ptr::copy_nonoverlapping(addr.as_ptr(), out.as_mut_ptr(), out.len()) }
}

/// Copy `bytes` to memory starting at `addr`. Bytes outside
/// `addr..addr+bytes.len()` are never touched.
///
/// # Safety
///
/// `addr` must be valid for writes of `bytes.len()` bytes. No alignment is
/// required.
pub(crate) unsafe fn write_bytes(addr: NonNull<u8>, bytes: &[u8]) {
    // SAFETY: caller guarantees `addr..addr+len` is writable; `bytes` is a
    // distinct Rust allocation so the ranges cannot overlap.
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), addr.as_ptr(), bytes.len()) }
}

/// Allocate `len` zeroed bytes aligned to [`BLOCK_ALIGN`].
///
/// Returns `None` for a zero length, an invalid layout, or allocator failure.
pub(crate) fn alloc_zeroed(len: usize) -> Option<(NonNull<u8>, Layout)> {
    if len == 0 {
        return None;
    }
    let layout = Layout::from_size_align(len, BLOCK_ALIGN).ok()?;
    // SAFETY: `layout` has non-zero size (checked above).
    let ptr = unsafe { alloc::alloc_zeroed(layout) };
    NonNull::new(ptr).map(|p| (p, layout))
}

/// Release memory from [`alloc_zeroed`].
///
/// # Safety
///
/// `ptr` and `layout` must be a pair returned by [`alloc_zeroed`] that has
/// not been released yet.
pub(crate) unsafe fn dealloc(ptr: NonNull<u8>, layout: Layout) {
    // SAFETY: caller guarantees the pair came from `alloc_zeroed` and is
    // released exactly once.
    unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_is_zeroed_and_aligned() {
        let (p, layout) = alloc_zeroed(24).unwrap();
        assert_eq!(p.as_ptr() as usize % BLOCK_ALIGN, 0);
        let mut out = [0xAAu8; 24];
        unsafe {
            read_bytes(p, &mut out);
            dealloc(p, layout);
        }
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_length_alloc_is_none() {
        assert!(alloc_zeroed(0).is_none());
    }

    #[test]
    fn write_then_read_unaligned() {
        let (p, layout) = alloc_zeroed(16).unwrap();
        let mut out = [0u8; 4];
        unsafe {
            let odd = NonNull::new(p.as_ptr().add(3)).unwrap();
            write_bytes(odd, &[1, 2, 3, 4]);
            read_bytes(odd, &mut out);
            dealloc(p, layout);
        }
        assert_eq!(out, [1, 2, 3, 4]);
    }
}

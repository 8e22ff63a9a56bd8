//! Owned native memory blocks.
//!
//! A [`NativeBlock`] stands in for the native allocator: a zero-initialised,
//! 8-byte-aligned run of bytes that typed pointers can address. Pointers
//! borrowed from a block carry its bounds, so out-of-range access is an
//! error instead of undefined behaviour.

use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;

use crate::element::{ElementType, NativeValue};
use crate::error::PointerError;
use crate::pointer::TypedPointer;
use crate::raw;

/// A zeroed, aligned allocation of native memory.
///
/// Freed on drop. Any number of [`TypedPointer`]s may alias it.
pub struct NativeBlock {
    ptr: NonNull<u8>,
    len: usize,
    /// `None` for zero-length blocks, which own no allocation.
    layout: Option<Layout>,
}

impl NativeBlock {
    /// Allocate `len` zeroed bytes.
    pub fn new(len: usize) -> Result<Self, PointerError> {
        if len == 0 {
            return Ok(Self {
                ptr: NonNull::<u64>::dangling().cast(),
                len: 0,
                layout: None,
            });
        }
        let Some((ptr, layout)) = raw::alloc_zeroed(len) else {
            tracing::warn!(bytes = len, "native block allocation failed");
            return Err(PointerError::AllocationFailed { bytes: len });
        };
        tracing::trace!(bytes = len, address = ptr.as_ptr() as usize, "native block allocated");
        Ok(Self {
            ptr,
            len,
            layout: Some(layout),
        })
    }

    /// Allocate room for `count` elements of `elem`.
    pub fn for_elements(elem: &ElementType, count: usize) -> Result<Self, PointerError> {
        let bytes = elem
            .size()
            .checked_mul(count)
            .ok_or(PointerError::AllocationFailed { bytes: usize::MAX })?;
        Self::new(bytes)
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the block has no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Base address of the block.
    pub fn address(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// A pointer to the first element of the block, typed as `elem`.
    ///
    /// Never fails; accessing an element that does not fit returns
    /// [`PointerError::OutOfBounds`].
    pub fn pointer(&self, elem: ElementType) -> TypedPointer<'_> {
        TypedPointer::bounded(self.ptr, elem, self.len)
    }

    /// Copy the block's current contents out.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.len];
        if self.len > 0 {
            self.read_into(&mut out);
        }
        out
    }

    /// Overwrite bytes starting at `offset`.
    #[allow(unsafe_code)]
    pub fn write_at(&self, offset: usize, bytes: &[u8]) -> Result<(), PointerError> {
        let fits = offset
            .checked_add(bytes.len())
            .is_some_and(|end| end <= self.len);
        if !fits {
            return Err(PointerError::OutOfBounds {
                offset: offset as isize,
                size: bytes.len(),
                available: self.len,
            });
        }
        if bytes.is_empty() {
            return Ok(());
        }
        // `wrapping_add` keeps provenance; `offset < self.len` here.
        let start = NonNull::new(self.ptr.as_ptr().wrapping_add(offset)).unwrap_or(self.ptr);
        // SAFETY: `offset + bytes.len() <= self.len`, checked above, and the
        // block owns `self.len` writable bytes.
        unsafe { raw::write_bytes(start, bytes) };
        Ok(())
    }

    #[allow(unsafe_code)]
    fn read_into(&self, out: &mut [u8]) {
        // SAFETY: `out.len() == self.len` and the block owns `self.len`
        // readable bytes.
        unsafe { raw::read_bytes(self.ptr, out) };
    }
}

impl Drop for NativeBlock {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        if let Some(layout) = self.layout.take() {
            // SAFETY: `ptr`/`layout` came from `raw::alloc_zeroed` and the
            // `take()` guarantees a single release.
            unsafe { raw::dealloc(self.ptr, layout) };
        }
    }
}

impl fmt::Debug for NativeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBlock")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("len", &self.len)
            .finish()
    }
}

/// A block holding exactly one element, plus its element type.
///
/// Returned by [`pointer_to`].
#[derive(Debug)]
pub struct OwnedPointer {
    block: NativeBlock,
    elem: ElementType,
}

impl OwnedPointer {
    /// A pointer to the held element.
    pub fn pointer(&self) -> TypedPointer<'_> {
        self.block.pointer(self.elem.clone())
    }

    /// The backing block.
    pub fn block(&self) -> &NativeBlock {
        &self.block
    }

    /// The held element's type.
    pub fn element_type(&self) -> &ElementType {
        &self.elem
    }
}

/// Allocate memory for one value, store it, and return the owner.
///
/// The element type is [`ElementType::of`] the value: enum handles use
/// their domain's [`PrimitiveType::for_domain`](crate::PrimitiveType::for_domain)
/// storage, so a handle whose raw value does not fit it fails with
/// [`PointerError::ValueOutOfRange`].
pub fn pointer_to(value: impl Into<NativeValue>) -> Result<OwnedPointer, PointerError> {
    let value = value.into();
    let elem = ElementType::of(&value);
    let block = NativeBlock::for_elements(&elem, 1)?;
    block.pointer(elem.clone()).set(value)?;
    Ok(OwnedPointer { block, elem })
}

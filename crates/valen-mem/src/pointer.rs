//! Typed pointers.
//!
//! A [`TypedPointer`] pairs an address with the [`ElementType`] stored there.
//! Every access moves exactly `size()` bytes; neighbouring bytes are never
//! read or written. Enum reads go through [`valen_core::decode`], enum
//! writes store [`ValuedHandle::value`] unchanged.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use valen_core::{decode, ValuedHandle};

use crate::block::NativeBlock;
use crate::element::{ElementType, NativeValue};
use crate::error::PointerError;
use crate::raw;

/// Bytes addressable around a block-derived pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Bounds {
    /// Bytes between the start of the block and the pointer.
    before: usize,
    /// Bytes between the pointer and the end of the block.
    after: usize,
}

/// An address in native memory plus the type of the element stored there.
///
/// Obtained from [`NativeBlock::pointer`],
/// [`OwnedPointer::pointer`](crate::OwnedPointer::pointer), or unsafely from
/// a foreign address via [`TypedPointer::from_raw`]. Cloning a pointer
/// aliases the same memory.
#[derive(Clone)]
pub struct TypedPointer<'mem> {
    addr: NonNull<u8>,
    elem: ElementType,
    bounds: Option<Bounds>,
    _mem: PhantomData<&'mem NativeBlock>,
}

impl<'mem> TypedPointer<'mem> {
    /// A pointer at the start of a block of `len` bytes.
    pub(crate) fn bounded(addr: NonNull<u8>, elem: ElementType, len: usize) -> Self {
        Self {
            addr,
            elem,
            bounds: Some(Bounds {
                before: 0,
                after: len,
            }),
            _mem: PhantomData,
        }
    }

    /// Wrap a foreign address. The pointer is unbounded.
    ///
    /// # Safety
    ///
    /// For as long as the pointer, or any pointer derived from it with
    /// [`offset`](Self::offset) or [`next`](Self::next), is used:
    /// - every address accessed must be valid for reads and writes of
    ///   `elem.size()` bytes;
    /// - no Rust reference may alias those bytes;
    /// - the memory must outlive `'mem`.
    ///
    /// No alignment is required.
    #[allow(unsafe_code)]
    pub unsafe fn from_raw(addr: NonNull<u8>, elem: ElementType) -> Self {
        Self {
            addr,
            elem,
            bounds: None,
            _mem: PhantomData,
        }
    }

    /// The address this pointer refers to.
    pub fn address(&self) -> usize {
        self.addr.as_ptr() as usize
    }

    /// The address as a raw pointer, for passing to native code.
    ///
    /// Keeps the provenance of the block or foreign allocation.
    pub fn as_ptr(&self) -> *mut u8 {
        self.addr.as_ptr()
    }

    /// The declared element type.
    pub fn element_type(&self) -> &ElementType {
        &self.elem
    }

    /// Width of one element in bytes.
    pub fn size(&self) -> usize {
        self.elem.size()
    }

    fn check_access(&self) -> Result<(), PointerError> {
        match self.bounds {
            Some(b) if b.after < self.size() => {
                tracing::debug!(
                    address = self.address(),
                    size = self.size(),
                    available = b.after,
                    "access past the end of a native block"
                );
                Err(PointerError::OutOfBounds {
                    offset: 0,
                    size: self.size(),
                    available: b.after,
                })
            }
            _ => Ok(()),
        }
    }

    /// Read the element as a widened integer, without decoding.
    #[allow(unsafe_code)]
    pub fn get_raw(&self) -> Result<i64, PointerError> {
        self.check_access()?;
        let repr = self.elem.repr();
        let mut buf = [0u8; 8];
        // SAFETY: block-derived pointers have at least `size()` bytes after
        // them (checked above); raw pointers carry that guarantee from
        // `from_raw`. `buf` is 8 bytes and `size() <= 8`.
        unsafe { raw::read_bytes(self.addr, &mut buf[..repr.size()]) };
        Ok(repr.from_ne_bytes(&buf))
    }

    /// Write a raw integer at the declared width.
    ///
    /// Fails with [`PointerError::ValueOutOfRange`] before touching memory if
    /// `raw` does not fit. For enum elements the value is not checked
    /// against the domain.
    #[allow(unsafe_code)]
    pub fn set_raw(&self, raw: i64) -> Result<(), PointerError> {
        self.check_access()?;
        let repr = self.elem.repr();
        let buf = repr.to_ne_bytes(raw)?;
        // SAFETY: as in `get_raw`; exactly `size()` bytes are written.
        unsafe { raw::write_bytes(self.addr, &buf[..repr.size()]) };
        Ok(())
    }

    /// Read the element.
    ///
    /// Enum elements are decoded against their domain; an unrepresentable
    /// value is [`PointerError::Decode`], which still carries the raw integer.
    pub fn get(&self) -> Result<NativeValue, PointerError> {
        let raw = self.get_raw()?;
        match &self.elem {
            ElementType::Primitive(p) => Ok(NativeValue::from_primitive(*p, raw)),
            ElementType::Enum { domain, .. } => Ok(NativeValue::Enum(decode(raw, domain)?)),
        }
    }

    /// Write the element.
    ///
    /// The value must match the element type: same primitive, or an enum
    /// handle from the same domain.
    pub fn set(&self, value: impl Into<NativeValue>) -> Result<(), PointerError> {
        let value = value.into();
        if !self.elem.accepts(&value) {
            return Err(PointerError::TypeMismatch {
                expected: self.elem.to_string(),
                found: value.type_name(),
            });
        }
        self.set_raw(value.raw())
    }

    /// Read and decode an enum element.
    pub fn get_enum(&self) -> Result<ValuedHandle, PointerError> {
        let ElementType::Enum { domain, .. } = &self.elem else {
            return Err(self.not_an_enum());
        };
        let raw = self.get_raw()?;
        Ok(decode(raw, domain)?)
    }

    /// Write an enum handle's raw value.
    pub fn set_enum(&self, handle: impl Into<ValuedHandle>) -> Result<(), PointerError> {
        if self.elem.domain().is_none() {
            return Err(self.not_an_enum());
        }
        self.set(NativeValue::Enum(handle.into()))
    }

    fn not_an_enum(&self) -> PointerError {
        PointerError::TypeMismatch {
            expected: "enum".to_string(),
            found: self.elem.to_string(),
        }
    }

    /// The pointer `n` elements away (`n * size()` bytes).
    ///
    /// A block-derived pointer may move anywhere inside its block, including
    /// one past the last element; accessing that position is an error.
    pub fn offset(&self, n: isize) -> Result<Self, PointerError> {
        let invalid = || PointerError::InvalidAddress {
            address: self.address(),
        };
        let delta = isize::try_from(self.size())
            .ok()
            .and_then(|size| size.checked_mul(n))
            .ok_or_else(invalid)?;

        let bounds = match self.bounds {
            None => None,
            Some(b) => {
                let magnitude = delta.unsigned_abs();
                let out_of_bounds = |available| PointerError::OutOfBounds {
                    offset: delta,
                    size: 0,
                    available,
                };
                Some(if delta >= 0 {
                    if magnitude > b.after {
                        return Err(out_of_bounds(b.after));
                    }
                    Bounds {
                        before: b.before + magnitude,
                        after: b.after - magnitude,
                    }
                } else {
                    if magnitude > b.before {
                        return Err(out_of_bounds(b.before));
                    }
                    Bounds {
                        before: b.before - magnitude,
                        after: b.after + magnitude,
                    }
                })
            }
        };

        self.address()
            .checked_add_signed(delta)
            .filter(|&a| a != 0)
            .ok_or_else(invalid)?;
        // `wrapping_offset` keeps the original allocation's provenance.
        let addr = NonNull::new(self.addr.as_ptr().wrapping_offset(delta)).ok_or_else(invalid)?;

        Ok(Self {
            addr,
            elem: self.elem.clone(),
            bounds,
            _mem: PhantomData,
        })
    }

    /// The pointer to the following element.
    pub fn next(&self) -> Result<Self, PointerError> {
        self.offset(1)
    }

    /// Read the element `index` positions away.
    pub fn get_at(&self, index: isize) -> Result<NativeValue, PointerError> {
        self.offset(index)?.get()
    }

    /// Write the element `index` positions away.
    pub fn set_at(&self, index: isize, value: impl Into<NativeValue>) -> Result<(), PointerError> {
        self.offset(index)?.set(value)
    }
}

impl PartialEq for TypedPointer<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr && self.elem == other.elem
    }
}

impl Eq for TypedPointer<'_> {}

impl fmt::Debug for TypedPointer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TypedPointer");
        s.field("address", &format_args!("{:#x}", self.address()))
            .field("element", &format_args!("{}", self.elem));
        if let Some(b) = self.bounds {
            s.field("before", &b.before).field("after", &b.after);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::pointer_to;
    use crate::element::PrimitiveType;
    use proptest::prelude::*;
    use std::sync::Arc;
    use valen_core::EnumDomain;
    use valen_test_utils::fixtures::{fruit_domain, my_enum_domain};

    fn int(p: PrimitiveType) -> ElementType {
        ElementType::Primitive(p)
    }

    #[test]
    fn set_then_get_each_width() {
        let block = NativeBlock::new(8).unwrap();
        let cases: [(PrimitiveType, NativeValue); 8] = [
            (PrimitiveType::I8, NativeValue::I8(-5)),
            (PrimitiveType::U8, NativeValue::U8(250)),
            (PrimitiveType::I16, NativeValue::I16(-30_000)),
            (PrimitiveType::U16, NativeValue::U16(60_000)),
            (PrimitiveType::I32, NativeValue::I32(i32::MIN)),
            (PrimitiveType::U32, NativeValue::U32(u32::MAX)),
            (PrimitiveType::I64, NativeValue::I64(-1)),
            (PrimitiveType::U64, NativeValue::U64(u64::MAX - 7)),
        ];
        for (p, v) in cases {
            let ptr = block.pointer(int(p));
            ptr.set(v.clone()).unwrap();
            assert_eq!(ptr.get().unwrap(), v, "{p}");
        }
    }

    #[test]
    fn enum_round_trip() {
        let block = NativeBlock::new(4).unwrap();
        let p = block.pointer(ElementType::enumeration(fruit_domain()));
        p.set_enum(ValuedHandle::from_raw(8, fruit_domain())).unwrap();
        assert_eq!(p.get_raw().unwrap(), 8);
        let h = p.get_enum().unwrap();
        assert_eq!(h.to_string(), "Banana");

        p.set_enum(ValuedHandle::from_raw(4, fruit_domain())).unwrap();
        assert_eq!(p.get_enum().unwrap().to_string(), "Orange");
        assert_eq!(block.to_vec(), 4i32.to_ne_bytes());
    }

    #[test]
    fn bit_31_flag_round_trips_as_unsigned() {
        let caps = Arc::new(
            EnumDomain::from_pairs("Caps", &[("Low", 1), ("High", 0x8000_0000)]).unwrap(),
        );
        let owned = pointer_to(decode(0x8000_0000, &caps).unwrap()).unwrap();
        assert_eq!(owned.element_type().repr(), PrimitiveType::U32);
        assert_eq!(owned.block().to_vec(), 0x8000_0000u32.to_ne_bytes());

        let p = owned.pointer();
        let high = p.get_enum().unwrap();
        assert_eq!(high.value(), 0x8000_0000);
        assert_eq!(high.names(), ["High"]);

        // Both flags, as native code would store them.
        owned
            .block()
            .write_at(0, &0x8000_0001u32.to_ne_bytes())
            .unwrap();
        let both = p.get_enum().unwrap();
        assert_eq!(both.value(), 0x8000_0001);
        assert_eq!(both.names(), ["Low", "High"]);
    }

    #[test]
    fn get_on_enum_pointer_returns_handle() {
        let block = NativeBlock::new(4).unwrap();
        block.write_at(0, &3i32.to_ne_bytes()).unwrap();
        let p = block.pointer(ElementType::enumeration(fruit_domain()));
        let v = p.get().unwrap();
        assert_eq!(v.as_enum().unwrap().names(), ["Apple", "Pear"]);
    }

    #[test]
    fn primitive_type_mismatch() {
        let block = NativeBlock::new(8).unwrap();
        let p = block.pointer(int(PrimitiveType::I32));
        let err = p.set(5i64).unwrap_err();
        assert_eq!(
            err,
            PointerError::TypeMismatch {
                expected: "i32".into(),
                found: "i64".into()
            }
        );
        assert!(block.to_vec().iter().all(|&b| b == 0));
    }

    #[test]
    fn enum_from_other_domain_is_rejected() {
        let block = NativeBlock::new(4).unwrap();
        let p = block.pointer(ElementType::enumeration(fruit_domain()));
        let err = p
            .set_enum(ValuedHandle::from_raw(1, my_enum_domain()))
            .unwrap_err();
        assert!(matches!(err, PointerError::TypeMismatch { .. }));
        assert_eq!(p.get_raw().unwrap(), 0);
    }

    #[test]
    fn enum_accessors_on_primitive_pointer() {
        let block = NativeBlock::new(4).unwrap();
        let p = block.pointer(int(PrimitiveType::I32));
        assert!(matches!(p.get_enum(), Err(PointerError::TypeMismatch { .. })));
        assert!(matches!(
            p.set_enum(ValuedHandle::from_raw(1, fruit_domain())),
            Err(PointerError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn undecodable_memory_keeps_raw_value() {
        let block = NativeBlock::new(4).unwrap();
        block.write_at(0, &16i32.to_ne_bytes()).unwrap();
        let p = block.pointer(ElementType::enumeration(fruit_domain()));
        match p.get_enum() {
            Err(PointerError::Decode(e)) => assert_eq!(e.value(), 16),
            other => panic!("expected decode failure, got {other:?}"),
        }
        assert_eq!(p.get_raw().unwrap(), 16);
    }

    #[test]
    fn set_raw_range_check_leaves_memory_untouched() {
        let block = NativeBlock::new(2).unwrap();
        let p = block.pointer(int(PrimitiveType::U8));
        p.set_raw(7).unwrap();
        assert!(matches!(
            p.set_raw(300),
            Err(PointerError::ValueOutOfRange { .. })
        ));
        assert_eq!(block.to_vec(), [7, 0]);
    }

    #[test]
    fn offset_strides_by_element_size() {
        let block = NativeBlock::new(12).unwrap();
        let p = block.pointer(int(PrimitiveType::I32));
        for i in 0..3 {
            p.set_at(i, (i as i32 + 1) * 100).unwrap();
        }
        let second = p.next().unwrap();
        assert_eq!(second.address(), p.address() + 4);
        assert_eq!(second.get().unwrap(), NativeValue::I32(200));
        assert_eq!(second.get_at(-1).unwrap(), NativeValue::I32(100));
        assert_eq!(p.get_at(2).unwrap(), NativeValue::I32(300));
    }

    #[test]
    fn offset_respects_block_bounds() {
        let block = NativeBlock::new(8).unwrap();
        let p = block.pointer(int(PrimitiveType::I32));
        let end = p.offset(2).unwrap();
        assert!(matches!(end.get(), Err(PointerError::OutOfBounds { .. })));
        assert_eq!(end.offset(-2).unwrap(), p);
        assert_eq!(
            p.offset(3),
            Err(PointerError::OutOfBounds {
                offset: 12,
                size: 0,
                available: 8
            })
        );
        assert!(matches!(p.offset(-1), Err(PointerError::OutOfBounds { .. })));
        assert!(matches!(
            p.offset(isize::MAX),
            Err(PointerError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn element_straddling_the_end_is_out_of_bounds() {
        let block = NativeBlock::new(6).unwrap();
        let p = block.pointer(int(PrimitiveType::I32)).offset(1).unwrap();
        assert_eq!(
            p.set(1i32),
            Err(PointerError::OutOfBounds {
                offset: 0,
                size: 4,
                available: 2
            })
        );
        assert_eq!(block.to_vec(), [0; 6]);
    }

    #[test]
    fn aliasing_pointers_observe_writes() {
        let block = NativeBlock::new(4).unwrap();
        let a = block.pointer(ElementType::enumeration(fruit_domain()));
        let b = a.clone();
        let c = block.pointer(int(PrimitiveType::I32));
        a.set_enum(ValuedHandle::from_raw(2, fruit_domain())).unwrap();
        assert_eq!(b.get_enum().unwrap().to_string(), "Pear");
        c.set(8i32).unwrap();
        assert_eq!(a.get_enum().unwrap().to_string(), "Banana");
    }

    #[test]
    #[allow(unsafe_code)]
    fn raw_pointer_over_foreign_memory() {
        let mut storage = [0u8; 8];
        let base = NonNull::new(storage.as_mut_ptr()).unwrap();
        // SAFETY: `storage` outlives `p` and is only accessed through it
        // until the final assertion.
        let p = unsafe { TypedPointer::from_raw(base, int(PrimitiveType::U16)) };
        p.set_at(3, 0xBEEFu16).unwrap();
        assert_eq!(p.get_at(3).unwrap(), NativeValue::U16(0xBEEF));
        assert_eq!(&storage[6..], &0xBEEFu16.to_ne_bytes());
    }

    #[test]
    fn debug_shows_element() {
        let block = NativeBlock::new(4).unwrap();
        let p = block.pointer(ElementType::enumeration(fruit_domain()));
        let s = format!("{p:?}");
        assert!(s.contains("enum Fruit (i32)"), "{s}");
    }

    proptest! {
        #[test]
        fn write_touches_only_its_width(
            slot in 0usize..4,
            value in any::<i16>(),
            fill in any::<u8>(),
        ) {
            let block = NativeBlock::new(8).unwrap();
            block.write_at(0, &[fill; 8]).unwrap();
            let p = block.pointer(int(PrimitiveType::I16));
            p.set_at(slot as isize, value).unwrap();

            let bytes = block.to_vec();
            for (i, b) in bytes.iter().enumerate() {
                if i / 2 != slot {
                    prop_assert_eq!(*b, fill);
                }
            }
            prop_assert_eq!(&bytes[slot * 2..slot * 2 + 2], &value.to_ne_bytes());
            prop_assert_eq!(p.get_at(slot as isize).unwrap(), NativeValue::I16(value));
        }

        #[test]
        fn enum_write_is_four_bytes(value in any::<i32>()) {
            let block = NativeBlock::new(8).unwrap();
            block.write_at(0, &[0xAA; 8]).unwrap();
            let p = block.pointer(ElementType::enumeration(fruit_domain()));
            p.set_enum(ValuedHandle::from_raw(i64::from(value), fruit_domain())).unwrap();
            let bytes = block.to_vec();
            prop_assert_eq!(&bytes[..4], &value.to_ne_bytes());
            prop_assert_eq!(&bytes[4..], &[0xAA; 4]);
        }
    }
}

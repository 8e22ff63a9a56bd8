//! Element-type descriptors and the values read from or written to memory.

use std::fmt;
use std::sync::Arc;

use valen_core::{EnumDomain, ValuedHandle};

use crate::error::PointerError;

/// A fixed-width integer type as laid out in native memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `int8_t`.
    I8,
    /// `uint8_t`.
    U8,
    /// `int16_t`.
    I16,
    /// `uint16_t`.
    U16,
    /// `int32_t`; the default storage for C enums.
    I32,
    /// `uint32_t`.
    U32,
    /// `int64_t`.
    I64,
    /// `uint64_t`. Raw values reinterpret the `i64` bit pattern.
    U64,
}

impl PrimitiveType {
    /// Width in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 => 4,
            Self::I64 | Self::U64 => 8,
        }
    }

    /// Whether the type is two's-complement signed.
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Rust spelling of the type (`"i32"`, `"u8"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
        }
    }

    /// The storage a C compiler would pick for an enum over `domain`.
    ///
    /// `i32` when every constant fits a C `int`, `u32` when every constant
    /// is non-negative and fits `unsigned int`, `i64` otherwise.
    pub fn for_domain(domain: &EnumDomain) -> Self {
        let fits = |lo: i64, hi: i64| {
            domain
                .constants()
                .iter()
                .all(|c| (lo..=hi).contains(&c.value))
        };
        if fits(i32::MIN.into(), i32::MAX.into()) {
            Self::I32
        } else if fits(0, u32::MAX.into()) {
            Self::U32
        } else {
            Self::I64
        }
    }

    /// Interpret the first `size()` bytes of `buf` (host byte order) as
    /// this type, widened to `i64`.
    pub(crate) fn from_ne_bytes(self, buf: &[u8; 8]) -> i64 {
        match self {
            Self::I8 => i8::from_ne_bytes(prefix(buf)) as i64,
            Self::U8 => u8::from_ne_bytes(prefix(buf)) as i64,
            Self::I16 => i16::from_ne_bytes(prefix(buf)) as i64,
            Self::U16 => u16::from_ne_bytes(prefix(buf)) as i64,
            Self::I32 => i32::from_ne_bytes(prefix(buf)) as i64,
            Self::U32 => u32::from_ne_bytes(prefix(buf)) as i64,
            Self::I64 => i64::from_ne_bytes(*buf),
            Self::U64 => u64::from_ne_bytes(*buf) as i64,
        }
    }

    /// Encode `raw` into the first `size()` bytes of the returned buffer.
    ///
    /// Fails with [`PointerError::ValueOutOfRange`] if `raw` does not fit.
    pub(crate) fn to_ne_bytes(self, raw: i64) -> Result<[u8; 8], PointerError> {
        let out_of_range = |_| PointerError::ValueOutOfRange {
            value: raw,
            repr: self,
        };
        let mut buf = [0u8; 8];
        match self {
            Self::I8 => put(&mut buf, &i8::try_from(raw).map_err(out_of_range)?.to_ne_bytes()),
            Self::U8 => put(&mut buf, &u8::try_from(raw).map_err(out_of_range)?.to_ne_bytes()),
            Self::I16 => put(&mut buf, &i16::try_from(raw).map_err(out_of_range)?.to_ne_bytes()),
            Self::U16 => put(&mut buf, &u16::try_from(raw).map_err(out_of_range)?.to_ne_bytes()),
            Self::I32 => put(&mut buf, &i32::try_from(raw).map_err(out_of_range)?.to_ne_bytes()),
            Self::U32 => put(&mut buf, &u32::try_from(raw).map_err(out_of_range)?.to_ne_bytes()),
            Self::I64 => put(&mut buf, &raw.to_ne_bytes()),
            Self::U64 => put(&mut buf, &(raw as u64).to_ne_bytes()),
        }
        Ok(buf)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn prefix<const N: usize>(buf: &[u8; 8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[..N]);
    out
}

fn put(buf: &mut [u8; 8], bytes: &[u8]) {
    buf[..bytes.len()].copy_from_slice(bytes);
}

/// What a [`TypedPointer`](crate::TypedPointer) points at.
///
/// Passed explicitly at pointer construction; nothing is recovered from the
/// address at access time.
#[derive(Clone, Debug)]
pub enum ElementType {
    /// A plain integer.
    Primitive(PrimitiveType),
    /// An integer-backed enum over `domain`, stored as `repr`.
    Enum {
        /// The constants the stored integer decodes against.
        domain: Arc<EnumDomain>,
        /// Storage width and signedness.
        repr: PrimitiveType,
    },
}

impl ElementType {
    /// An enum over `domain`, stored as [`PrimitiveType::for_domain`]
    /// picks: a C `int` unless a constant needs more.
    pub fn enumeration(domain: Arc<EnumDomain>) -> Self {
        let repr = PrimitiveType::for_domain(&domain);
        Self::Enum { domain, repr }
    }

    /// The element type a value would naturally be stored as.
    ///
    /// Enum values map to [`ElementType::enumeration`] over their domain.
    pub fn of(value: &NativeValue) -> Self {
        match value {
            NativeValue::Enum(h) => Self::enumeration(Arc::clone(h.domain())),
            other => Self::Primitive(other.primitive().unwrap_or(PrimitiveType::I64)),
        }
    }

    /// Storage width and signedness.
    pub fn repr(&self) -> PrimitiveType {
        match self {
            Self::Primitive(p) => *p,
            Self::Enum { repr, .. } => *repr,
        }
    }

    /// Width in bytes.
    pub fn size(&self) -> usize {
        self.repr().size()
    }

    /// The enum domain, if this is an enum element type.
    pub fn domain(&self) -> Option<&Arc<EnumDomain>> {
        match self {
            Self::Primitive(_) => None,
            Self::Enum { domain, .. } => Some(domain),
        }
    }

    /// Whether `value` may be written through a pointer of this type.
    ///
    /// Primitives must match exactly; enum handles must come from the same
    /// domain (by identity).
    pub fn accepts(&self, value: &NativeValue) -> bool {
        match (self, value) {
            (Self::Enum { domain, .. }, NativeValue::Enum(h)) => h.domain().id() == domain.id(),
            (Self::Primitive(p), v) => v.primitive() == Some(*p),
            _ => false,
        }
    }
}

impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (
                Self::Enum { domain: a, repr: ra },
                Self::Enum { domain: b, repr: rb },
            ) => a.id() == b.id() && ra == rb,
            _ => false,
        }
    }
}

impl Eq for ElementType {}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Enum { domain, repr } => write!(f, "enum {} ({repr})", domain.name()),
        }
    }
}

/// A value read from, or to be written to, native memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeValue {
    /// `int8_t`.
    I8(i8),
    /// `uint8_t`.
    U8(u8),
    /// `int16_t`.
    I16(i16),
    /// `uint16_t`.
    U16(u16),
    /// `int32_t`.
    I32(i32),
    /// `uint32_t`.
    U32(u32),
    /// `int64_t`.
    I64(i64),
    /// `uint64_t`.
    U64(u64),
    /// A decoded enum value.
    Enum(ValuedHandle),
}

impl NativeValue {
    /// Build the primitive variant for `p` from a widened raw integer.
    pub(crate) fn from_primitive(p: PrimitiveType, raw: i64) -> Self {
        match p {
            PrimitiveType::I8 => Self::I8(raw as i8),
            PrimitiveType::U8 => Self::U8(raw as u8),
            PrimitiveType::I16 => Self::I16(raw as i16),
            PrimitiveType::U16 => Self::U16(raw as u16),
            PrimitiveType::I32 => Self::I32(raw as i32),
            PrimitiveType::U32 => Self::U32(raw as u32),
            PrimitiveType::I64 => Self::I64(raw),
            PrimitiveType::U64 => Self::U64(raw as u64),
        }
    }

    /// The integer payload widened to `i64` (`u64` is reinterpreted).
    ///
    /// For enum values this is [`ValuedHandle::value`].
    pub fn raw(&self) -> i64 {
        match self {
            Self::I8(v) => *v as i64,
            Self::U8(v) => *v as i64,
            Self::I16(v) => *v as i64,
            Self::U16(v) => *v as i64,
            Self::I32(v) => *v as i64,
            Self::U32(v) => *v as i64,
            Self::I64(v) => *v,
            Self::U64(v) => *v as i64,
            Self::Enum(h) => h.value(),
        }
    }

    /// The primitive type of a non-enum value.
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            Self::I8(_) => Some(PrimitiveType::I8),
            Self::U8(_) => Some(PrimitiveType::U8),
            Self::I16(_) => Some(PrimitiveType::I16),
            Self::U16(_) => Some(PrimitiveType::U16),
            Self::I32(_) => Some(PrimitiveType::I32),
            Self::U32(_) => Some(PrimitiveType::U32),
            Self::I64(_) => Some(PrimitiveType::I64),
            Self::U64(_) => Some(PrimitiveType::U64),
            Self::Enum(_) => None,
        }
    }

    /// The enum handle, if this is an enum value.
    pub fn as_enum(&self) -> Option<&ValuedHandle> {
        match self {
            Self::Enum(h) => Some(h),
            _ => None,
        }
    }

    /// Short type description for error messages.
    pub fn type_name(&self) -> String {
        match self {
            Self::Enum(h) => format!("enum {}", h.enum_domain_name()),
            other => other
                .primitive()
                .map_or_else(String::new, |p| p.name().to_string()),
        }
    }
}

macro_rules! native_value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for NativeValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )+
    };
}

native_value_from! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    ValuedHandle => Enum,
}

//! Rust enums backed by an [`EnumDomain`].
//!
//! [`valued_enum!`](crate::valued_enum) declares a fieldless Rust enum with
//! explicit integer values and wires it to a lazily built, globally
//! registered domain. The enum's variants are the domain's constants, in
//! the same order.
//!
//! ```
//! use valen_core::{valued_enum, ValuedEnum};
//!
//! valued_enum! {
//!     pub enum Fruit {
//!         Apple = 1,
//!         Pear = 2,
//!         Orange = 4,
//!         Banana = 8,
//!     }
//! }
//!
//! let fruit = Fruit::from_value(8).unwrap();
//! assert_eq!(fruit.to_string(), "Banana");
//! assert_eq!(fruit, Fruit::Banana);
//!
//! let both = Fruit::from_value(3).unwrap();
//! let parts: Vec<Fruit> = both.iter_as::<Fruit>().unwrap().collect();
//! assert_eq!(parts, [Fruit::Apple, Fruit::Pear]);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::codec::decode;
use crate::domain::EnumDomain;
use crate::error::DecodeError;
use crate::valued::ValuedHandle;

/// A Rust enum whose variants are the constants of one [`EnumDomain`].
///
/// Normally implemented by [`valued_enum!`](crate::valued_enum).
/// `index` and `from_index` must agree with the domain's declaration order.
pub trait ValuedEnum: Copy + Eq + fmt::Debug + 'static {
    /// The domain shared by every value of this type.
    fn domain() -> &'static Arc<EnumDomain>;

    /// This constant's declared integer value.
    fn value(self) -> i64;

    /// This constant's declaration index.
    fn index(self) -> usize;

    /// The constant at a declaration index.
    fn from_index(index: usize) -> Option<Self>;

    /// This constant's declared name.
    fn name(self) -> &'static str {
        Self::domain()
            .constant(self.index())
            .map_or("", |c| c.name.as_str())
    }

    /// A handle holding this constant's value.
    fn handle(self) -> ValuedHandle {
        ValuedHandle::from_raw(self.value(), Arc::clone(Self::domain()))
    }

    /// Strictly decode a raw integer against this type's domain.
    fn from_value(raw: i64) -> Result<ValuedHandle, DecodeError> {
        decode(raw, Self::domain())
    }
}

/// Declare a fieldless enum with explicit integer values and implement
/// [`ValuedEnum`] for it.
///
/// Also generates `From<E> for ValuedHandle`, equality in both directions
/// between `E` and [`ValuedHandle`], and `Display` printing the variant name.
/// The domain is registered in the global registry under
/// `module_path!()::TypeName` on first use.
///
/// # Panics
///
/// `domain()` panics if that key already holds a domain with a different
/// name or constant table, since variant indices would not line up with it.
#[macro_export]
macro_rules! valued_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            const VARIANTS: &'static [$name] = &[$($name::$variant),+];
        }

        impl $crate::ValuedEnum for $name {
            fn domain() -> &'static ::std::sync::Arc<$crate::EnumDomain> {
                static DOMAIN: ::std::sync::OnceLock<::std::sync::Arc<$crate::EnumDomain>> =
                    ::std::sync::OnceLock::new();
                DOMAIN.get_or_init(|| {
                    $crate::registry::declare_domain(
                        concat!(module_path!(), "::", stringify!($name)),
                        stringify!($name),
                        &[$((stringify!($variant), $value)),+],
                    )
                    .unwrap_or_else(|e| panic!("cannot declare {}: {e}", stringify!($name)))
                })
            }

            fn value(self) -> i64 {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            fn index(self) -> usize {
                self as usize
            }

            fn from_index(index: usize) -> ::std::option::Option<Self> {
                Self::VARIANTS.get(index).copied()
            }
        }

        impl ::std::convert::From<$name> for $crate::ValuedHandle {
            fn from(v: $name) -> Self {
                $crate::ValuedEnum::handle(v)
            }
        }

        impl ::std::cmp::PartialEq<$name> for $crate::ValuedHandle {
            fn eq(&self, other: &$name) -> bool {
                *self == $crate::ValuedEnum::handle(*other)
            }
        }

        impl ::std::cmp::PartialEq<$crate::ValuedHandle> for $name {
            fn eq(&self, other: &$crate::ValuedHandle) -> bool {
                *other == *self
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::ValuedEnum::name(*self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    crate::valued_enum! {
        enum MyEnum {
            One = 0,
            Two = 1,
            Three = 2,
        }
    }

    crate::valued_enum! {
        /// Flag-style enum.
        enum Fruit {
            Apple = 1,
            Pear = 2,
            Orange = 4,
            Banana = 8,
        }
    }

    mod declared {
        crate::valued_enum! {
            pub enum Clash {
                A = 1,
                B = 2,
            }
        }

        crate::valued_enum! {
            pub enum Twin {
                A = 1,
                B = 2,
            }
        }
    }

    #[test]
    fn conflicting_registration_is_reported() {
        let key = concat!(module_path!(), "::declared::Clash");
        let swapped = EnumDomain::from_pairs("Clash", &[("B", 2), ("A", 1)]).unwrap();
        crate::registry::register_domain(key, swapped).unwrap();

        let panic = std::panic::catch_unwind(|| declared::Clash::domain().len()).unwrap_err();
        let msg = panic.downcast_ref::<String>().cloned().unwrap_or_default();
        assert!(msg.contains("already registered"), "{msg}");
        assert!(msg.contains(key), "{msg}");
    }

    #[test]
    fn identical_registration_is_adopted() {
        let key = concat!(module_path!(), "::declared::Twin");
        let twin = EnumDomain::from_pairs("Twin", &[("A", 1), ("B", 2)]).unwrap();
        let registered = crate::registry::register_domain(key, twin).unwrap();
        assert!(Arc::ptr_eq(declared::Twin::domain(), &registered));
        assert_eq!(declared::Twin::B.index(), 1);
    }

    #[test]
    fn variants_match_domain_order() {
        let d = Fruit::domain();
        assert_eq!(d.name(), "Fruit");
        assert_eq!(d.len(), 4);
        assert_eq!(Fruit::Orange.index(), 2);
        assert_eq!(Fruit::Orange.value(), 4);
        assert_eq!(Fruit::from_index(3), Some(Fruit::Banana));
        assert_eq!(Fruit::from_index(4), None);
        assert_eq!(Fruit::Pear.name(), "Pear");
        assert_eq!(Fruit::Pear.to_string(), "Pear");
    }

    #[test]
    fn domain_is_built_once_and_registered() {
        assert!(Arc::ptr_eq(Fruit::domain(), Fruit::domain()));
        let key = concat!(module_path!(), "::Fruit");
        let registered = crate::registry::lookup_domain(key).unwrap();
        assert_eq!(registered.id(), Fruit::domain().id());
    }

    #[test]
    fn single_value_decodes_to_its_constant() {
        let h = MyEnum::from_value(1).unwrap();
        assert_eq!(h.value(), 1);
        assert_eq!(h.enum_domain_name(), "MyEnum");
        assert_eq!(h, MyEnum::Two);
        assert_eq!(MyEnum::Two, h);
    }

    #[test]
    fn banana_is_exact() {
        let h = Fruit::from_value(8).unwrap();
        assert_eq!(h.to_string(), "Banana");
        assert_eq!(h.value(), 8);
        let mut it = h.iter_as::<Fruit>().unwrap();
        assert_eq!(it.next(), Some(Fruit::Banana));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn combination_iterates_typed_constants() {
        let h = Fruit::from_value(3).unwrap();
        let parts: Vec<Fruit> = h.iter_as::<Fruit>().unwrap().collect();
        assert_eq!(parts, [Fruit::Apple, Fruit::Pear]);
        assert_ne!(h, Fruit::Apple);
    }

    #[test]
    fn unreachable_value_fails_but_keeps_raw() {
        let err = Fruit::from_value(16).unwrap_err();
        assert_eq!(err.value(), 16);
    }

    #[test]
    fn iter_as_rejects_foreign_domain() {
        let h = Fruit::from_value(1).unwrap();
        assert!(matches!(
            h.iter_as::<MyEnum>().map(|it| it.count()),
            Err(DomainError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn same_value_different_types_are_unequal() {
        // MyEnum::Two and Fruit::Apple are both 1.
        assert_ne!(MyEnum::Two.handle(), Fruit::Apple.handle());
    }

    #[test]
    fn into_handle() {
        let h: ValuedHandle = Fruit::Orange.into();
        assert_eq!(h.value(), 4);
        assert_eq!(h.names(), ["Orange"]);
    }
}

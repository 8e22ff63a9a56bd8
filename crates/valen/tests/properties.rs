//! Integration test: value identity through native memory.
//!
//! Whatever integer a handle carries is exactly what lands in memory and
//! exactly what a later read reports, whether or not the domain can
//! decompose it.

use std::sync::Arc;

use proptest::prelude::*;
use valen::prelude::*;
use valen_test_utils::fixtures::{flag_domain, Fruit};

proptest! {
    #[test]
    fn every_u32_flag_set_round_trips(bits in any::<u32>()) {
        let domain = flag_domain(32);
        let raw = i64::from(bits);
        let h = decode(raw, &domain).unwrap();
        prop_assert_eq!(h.len(), bits.count_ones() as usize);

        let owned = pointer_to(h.clone()).unwrap();
        prop_assert_eq!(owned.element_type().repr(), PrimitiveType::U32);
        prop_assert_eq!(owned.block().to_vec(), bits.to_ne_bytes());

        let back = owned.pointer().get_enum().unwrap();
        prop_assert_eq!(encode(&back), raw);
        prop_assert_eq!(back, h);
    }

    #[test]
    fn stored_value_is_reported_unchanged(value in any::<i32>()) {
        let raw = i64::from(value);
        let stored = ValuedHandle::from_raw(raw, Arc::clone(Fruit::domain()));
        let owned = pointer_to(stored).unwrap();
        prop_assert_eq!(owned.pointer().get_raw().unwrap(), raw);

        match owned.pointer().get_enum() {
            Ok(h) => {
                prop_assert!((0..16).contains(&raw));
                prop_assert_eq!(h.value(), raw);
            }
            Err(PointerError::Decode(e)) => {
                prop_assert!(!(0..16).contains(&raw));
                prop_assert_eq!(e.value(), raw);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

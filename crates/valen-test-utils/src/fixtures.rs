//! Shared enum fixtures.
//!
//! - [`MyEnum`]: plain sequential enum, `One = 0`, `Two = 1`, `Three = 2`.
//! - [`Fruit`]: disjoint flag enum, `Apple = 1` .. `Banana = 8`.
//! - [`flag_domain`]: `n` disjoint single-bit flags, for property tests and
//!   benchmarks.

use std::sync::Arc;

use valen_core::{valued_enum, EnumDomain, ValuedEnum};

valued_enum! {
    /// Sequential values; `0` is a declared constant.
    pub enum MyEnum {
        One = 0,
        Two = 1,
        Three = 2,
    }
}

valued_enum! {
    /// Disjoint bit flags; no zero constant.
    pub enum Fruit {
        Apple = 1,
        Pear = 2,
        Orange = 4,
        Banana = 8,
    }
}

pub fn my_enum_domain() -> Arc<EnumDomain> {
    Arc::clone(MyEnum::domain())
}

pub fn fruit_domain() -> Arc<EnumDomain> {
    Arc::clone(Fruit::domain())
}

/// A domain named `Flags{n}` with constants `F0 = 1`, `F1 = 2`, ...
///
/// Not registered. `n` is capped at 63 so every flag is a positive `i64`.
pub fn flag_domain(n: usize) -> Arc<EnumDomain> {
    let n = n.min(63);
    let mut builder = EnumDomain::builder(format!("Flags{n}"));
    for i in 0..n {
        builder = builder.constant(format!("F{i}"), 1i64 << i);
    }
    match builder.build() {
        Ok(domain) => Arc::new(domain),
        Err(e) => panic!("flag domain is well-formed: {e}"),
    }
}

/// A domain whose constants overlap, in declaration order:
/// `Read = 1`, `Write = 2`, `ReadWrite = 3`, `Exec = 4`.
///
/// Exercises exact-match-before-decomposition and greedy ordering.
pub fn overlapping_domain() -> Arc<EnumDomain> {
    match EnumDomain::from_pairs(
        "Access",
        &[("Read", 1), ("Write", 2), ("ReadWrite", 3), ("Exec", 4)],
    ) {
        Ok(domain) => Arc::new(domain),
        Err(e) => panic!("access domain is well-formed: {e}"),
    }
}

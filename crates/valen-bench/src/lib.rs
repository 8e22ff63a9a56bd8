//! Benchmark workloads for Valen.
//!
//! [`workload`] produces a deterministic stream of raw values against a
//! domain, mixing exact constants, multi-constant combinations and values no
//! combination can reach, in proportions set by a [`Mix`].

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use valen_core::EnumDomain;

/// Relative weights of the three kinds of raw value in a workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mix {
    /// A single declared constant.
    pub exact: u32,
    /// OR of two or more declared constants.
    pub combined: u32,
    /// A value with bits outside every constant.
    pub unreachable: u32,
}

impl Mix {
    /// Only exact constants.
    pub const EXACT: Mix = Mix {
        exact: 1,
        combined: 0,
        unreachable: 0,
    };

    /// Mostly valid traffic with a tail of failures.
    pub const TYPICAL: Mix = Mix {
        exact: 6,
        combined: 3,
        unreachable: 1,
    };

    fn total(self) -> u32 {
        self.exact + self.combined + self.unreachable
    }
}

/// `n` raw values against `domain`, reproducible for a given `seed`.
///
/// `domain` must declare at least one non-zero constant; otherwise every
/// value is `0`.
pub fn workload(domain: &EnumDomain, n: usize, mix: Mix, seed: u64) -> Vec<i64> {
    let values: Vec<i64> = domain
        .constants()
        .iter()
        .map(|c| c.value)
        .filter(|&v| v != 0)
        .collect();
    if values.is_empty() || mix.total() == 0 {
        return vec![0; n];
    }
    let covered = values.iter().fold(0i64, |acc, v| acc | v);
    let stray = !covered & i64::MAX;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pick = |len: usize| (rng.next_u64() % len as u64) as usize;

    (0..n)
        .map(|_| {
            let roll = pick(mix.total() as usize) as u32;
            if roll < mix.exact {
                values[pick(values.len())]
            } else if roll < mix.exact + mix.combined {
                let a = values[pick(values.len())];
                let b = values[pick(values.len())];
                a | b
            } else if stray != 0 {
                // Lowest bit no constant covers.
                stray & stray.wrapping_neg()
            } else {
                values[0]
            }
        })
        .collect()
}

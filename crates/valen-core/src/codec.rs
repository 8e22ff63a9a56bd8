//! The value codec: raw integer + domain → contributing constants.
//!
//! Decoding runs in priority order:
//!
//! 1. **Exact match.** If a constant's value equals the raw integer, the
//!    result is that constant alone (first declared wins), even when the
//!    value could also be built from other constants.
//! 2. **Greedy decomposition.** Otherwise constants are scanned in
//!    declaration order; each non-zero constant fully contained in the
//!    remaining bits (`remaining & c == c`) is taken and its bits cleared.
//! 3. **Termination.** A zero remainder is a combination; anything else is
//!    unrepresentable.
//!
//! A raw `0` with no zero-valued constant is an empty combination unless the
//! domain's [`ZeroPolicy`] rejects it. O(n) in the domain size, pure, and
//! deterministic.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::config::ZeroPolicy;
use crate::domain::EnumDomain;
use crate::error::DecodeError;
use crate::valued::ValuedHandle;

/// Which constants a raw integer decodes to.
///
/// Indices are declaration indices into the domain's constant table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decomposition {
    /// A single constant equals the raw value.
    Exact(usize),
    /// The raw value is the OR of these constants, in declaration order.
    /// Empty for a raw `0` under [`ZeroPolicy::EmptySet`].
    Combination(SmallVec<[usize; 4]>),
    /// No exact constant and no exhaustive combination.
    Unrepresentable {
        /// Bits the greedy scan could not account for.
        remainder: i64,
    },
}

impl Decomposition {
    /// Whether the raw value was decoded successfully.
    pub fn is_representable(&self) -> bool {
        !matches!(self, Self::Unrepresentable { .. })
    }

    /// Contributing declaration indices, in order. Empty when unrepresentable.
    pub fn indices(&self) -> &[usize] {
        match self {
            Self::Exact(index) => std::slice::from_ref(index),
            Self::Combination(indices) => indices,
            Self::Unrepresentable { .. } => &[],
        }
    }
}

/// Decide which constants of `domain` make up `raw`.
pub fn decompose(raw: i64, domain: &EnumDomain) -> Decomposition {
    if let Some(index) = domain.index_of_value(raw) {
        return Decomposition::Exact(index);
    }
    if raw == 0 {
        return match domain.config().zero {
            ZeroPolicy::EmptySet => Decomposition::Combination(SmallVec::new()),
            ZeroPolicy::Reject => Decomposition::Unrepresentable { remainder: 0 },
        };
    }

    let mut remaining = raw;
    let mut indices = SmallVec::new();
    for (index, c) in domain.constants().iter().enumerate() {
        if c.value != 0 && remaining & c.value == c.value {
            indices.push(index);
            remaining &= !c.value;
        }
    }

    if remaining == 0 {
        Decomposition::Combination(indices)
    } else {
        Decomposition::Unrepresentable {
            remainder: remaining,
        }
    }
}

/// Strictly decode `raw` against `domain`.
///
/// Returns [`DecodeError::Unrepresentable`] (carrying `raw`) when no exact
/// constant or exhaustive combination exists. Use
/// [`ValuedHandle::from_raw`] to keep an undecodable value instead.
pub fn decode(raw: i64, domain: &Arc<EnumDomain>) -> Result<ValuedHandle, DecodeError> {
    let handle = ValuedHandle::from_raw(raw, Arc::clone(domain));
    if let Decomposition::Unrepresentable { remainder } = *handle.decomposition() {
        tracing::trace!(domain = domain.name(), raw, remainder, "unrepresentable enum value");
        return Err(DecodeError::Unrepresentable {
            domain: domain.name().to_string(),
            value: raw,
            remainder,
        });
    }
    Ok(handle)
}

/// Encode a handle back to its raw integer. Identity on the stored value.
pub fn encode(handle: &ValuedHandle) -> i64 {
    handle.value()
}

//! Process-unique identifiers for enum domains.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Counter for unique [`DomainId`] allocation.
static DOMAIN_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Identifies one built [`EnumDomain`](crate::EnumDomain).
///
/// Allocated from a monotonic atomic counter via [`DomainId::next`] when a
/// domain is built. Two domains built separately always have different IDs,
/// even if they declare identical constants, so handle equality never
/// confuses values from unrelated enumerated types.
///
/// Cloning a domain's `Arc` preserves its ID, which is correct because the
/// domain is immutable after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId(u32);

impl DomainId {
    /// Allocate a fresh, unique domain ID. Thread-safe.
    pub fn next() -> Self {
        Self(DOMAIN_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The numeric value of this ID.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

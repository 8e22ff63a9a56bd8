//! [`ValuedHandle`]: a raw integer bound to the domain that decoded it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::codec::{decompose, Decomposition};
use crate::domain::{EnumConstant, EnumDomain};
use crate::error::DomainError;
use crate::typed::ValuedEnum;

/// The result of decoding a raw integer against an [`EnumDomain`].
///
/// Immutable value object. [`value`](Self::value) always returns exactly
/// the integer the handle was built from, whether or not it decoded. The
/// contributing constants are derived from it once, at construction.
///
/// Equality and hashing use the domain identity and the raw value only;
/// the decomposition is not compared.
#[derive(Clone)]
pub struct ValuedHandle {
    raw: i64,
    domain: Arc<EnumDomain>,
    decomposition: Decomposition,
}

impl ValuedHandle {
    /// Build a handle without failing on unrepresentable values.
    ///
    /// The decomposition may be [`Decomposition::Unrepresentable`]; use
    /// [`decode`](crate::decode) for the strict variant.
    pub fn from_raw(raw: i64, domain: Arc<EnumDomain>) -> Self {
        let decomposition = decompose(raw, &domain);
        Self {
            raw,
            domain,
            decomposition,
        }
    }

    /// OR together the named constants of `domain`.
    ///
    /// The result is decoded leniently: with overlapping constant values
    /// the greedy decomposition may not reproduce the names given here.
    pub fn from_constants(domain: Arc<EnumDomain>, names: &[&str]) -> Result<Self, DomainError> {
        let mut raw = 0i64;
        for name in names {
            let c = domain.find(name).ok_or_else(|| DomainError::UnknownConstant {
                domain: domain.name().to_string(),
                name: (*name).to_string(),
            })?;
            raw |= c.value;
        }
        Ok(Self::from_raw(raw, domain))
    }

    /// The raw integer, verbatim.
    pub fn value(&self) -> i64 {
        self.raw
    }

    /// The domain this handle was decoded against.
    pub fn domain(&self) -> &Arc<EnumDomain> {
        &self.domain
    }

    /// Name of the enumerated type this value belongs to.
    pub fn enum_domain_name(&self) -> &str {
        self.domain.name()
    }

    /// How the raw value was decoded.
    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    /// Whether the raw value decoded to an exact constant or a combination.
    pub fn is_representable(&self) -> bool {
        self.decomposition.is_representable()
    }

    /// Number of contributing constants.
    pub fn len(&self) -> usize {
        self.decomposition.indices().len()
    }

    /// Whether no constant contributes (empty combination or unrepresentable).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the contributing constants in declaration order.
    ///
    /// Yields exactly one constant for an exact match and nothing for an
    /// unrepresentable value.
    pub fn iter(&self) -> ConstantIter<'_> {
        ConstantIter {
            domain: &self.domain,
            indices: self.decomposition.indices().iter(),
        }
    }

    /// Names of the contributing constants, in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether the named constant contributes to this value.
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|c| c.name == name)
    }

    /// Whether all bits of `value` are set in the raw value.
    ///
    /// Works on the raw bits, so it also answers for unrepresentable values.
    pub fn contains_value(&self, value: i64) -> bool {
        self.raw & value == value
    }

    /// Iterate over the contributing constants as a Rust enum type.
    ///
    /// Fails with [`DomainError::DomainMismatch`] if this handle was not
    /// decoded against `E`'s domain.
    pub fn iter_as<E: ValuedEnum>(&self) -> Result<impl Iterator<Item = E> + '_, DomainError> {
        self.check_domain(E::domain())?;
        Ok(self
            .decomposition
            .indices()
            .iter()
            .filter_map(|&i| E::from_index(i)))
    }

    /// Bitwise union with another handle over the same domain.
    pub fn union(&self, other: &ValuedHandle) -> Result<ValuedHandle, DomainError> {
        self.check_domain(&other.domain)?;
        Ok(Self::from_raw(self.raw | other.raw, Arc::clone(&self.domain)))
    }

    /// Clear the bits of `other` from this handle's value.
    pub fn difference(&self, other: &ValuedHandle) -> Result<ValuedHandle, DomainError> {
        self.check_domain(&other.domain)?;
        Ok(Self::from_raw(self.raw & !other.raw, Arc::clone(&self.domain)))
    }

    fn check_domain(&self, other: &EnumDomain) -> Result<(), DomainError> {
        if self.domain.id() == other.id() {
            Ok(())
        } else {
            Err(DomainError::DomainMismatch {
                expected: self.domain.name().to_string(),
                found: other.name().to_string(),
            })
        }
    }
}

impl PartialEq for ValuedHandle {
    fn eq(&self, other: &Self) -> bool {
        self.domain.id() == other.domain.id() && self.raw == other.raw
    }
}

impl Eq for ValuedHandle {}

impl Hash for ValuedHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.domain.id().hash(state);
        self.raw.hash(state);
    }
}

/// Prints the constant name for an exact match, names joined by the
/// domain's separator for a combination, and `Domain(raw)` otherwise.
impl fmt::Display for ValuedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{}({})", self.domain.name(), self.raw);
        }
        let separator = &self.domain.config().separator;
        for (i, c) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            f.write_str(&c.name)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ValuedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuedHandle")
            .field("domain", &self.domain.name())
            .field("raw", &self.raw)
            .field("decomposition", &self.decomposition)
            .finish()
    }
}

impl<'a> IntoIterator for &'a ValuedHandle {
    type Item = &'a EnumConstant;
    type IntoIter = ConstantIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the contributing constants of a [`ValuedHandle`].
pub struct ConstantIter<'a> {
    domain: &'a EnumDomain,
    indices: std::slice::Iter<'a, usize>,
}

impl<'a> Iterator for ConstantIter<'a> {
    type Item = &'a EnumConstant;

    fn next(&mut self) -> Option<Self::Item> {
        let &index = self.indices.next()?;
        self.domain.constant(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for ConstantIter<'_> {}

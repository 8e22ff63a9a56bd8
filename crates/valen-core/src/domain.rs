//! Enum domains: the ordered `(name, value)` table of one enumerated type.
//!
//! An [`EnumDomain`] is declared once per enumerated type and is immutable
//! afterwards. Declaration order is significant: it is both the tie-break
//! for exact matches and the order in which contributing constants are
//! reported. Values need not be unique or bit-disjoint.

use std::fmt;

use indexmap::IndexMap;

use crate::config::DomainConfig;
use crate::error::DomainError;
use crate::id::DomainId;

/// One named constant of a domain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumConstant {
    /// Declared name (e.g. `"Banana"`).
    pub name: String,
    /// Declared integer value (e.g. `8`).
    pub value: i64,
}

/// The ordered table of named constants for one enumerated type.
///
/// Built with [`EnumDomain::builder`]. Shared behind an `Arc` by every
/// [`ValuedHandle`](crate::ValuedHandle) decoded against it.
#[derive(Clone, Debug)]
pub struct EnumDomain {
    id: DomainId,
    name: String,
    constants: Vec<EnumConstant>,
    /// Name → declaration index. `IndexMap` keeps iteration in declaration
    /// order, matching `constants`.
    by_name: IndexMap<String, usize>,
    config: DomainConfig,
}

impl EnumDomain {
    /// Start building a domain with the given type name.
    pub fn builder(name: impl Into<String>) -> EnumDomainBuilder {
        EnumDomainBuilder {
            name: name.into(),
            constants: Vec::new(),
            config: DomainConfig::default(),
        }
    }

    /// Build a domain from `(name, value)` pairs with the default config.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(&str, i64)]) -> Result<Self, DomainError> {
        pairs
            .iter()
            .fold(Self::builder(name), |b, (n, v)| b.constant(*n, *v))
            .build()
    }

    /// Process-unique identity of this domain.
    pub fn id(&self) -> DomainId {
        self.id
    }

    /// The enumerated type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All constants in declaration order.
    pub fn constants(&self) -> &[EnumConstant] {
        &self.constants
    }

    /// The constant at a declaration index.
    pub fn constant(&self, index: usize) -> Option<&EnumConstant> {
        self.constants.get(index)
    }

    /// Declaration index of the constant with this name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Look up a constant by name.
    pub fn find(&self, name: &str) -> Option<&EnumConstant> {
        self.index_of(name).map(|i| &self.constants[i])
    }

    /// Declaration index of the first constant whose value equals `value`.
    pub fn index_of_value(&self, value: i64) -> Option<usize> {
        self.constants.iter().position(|c| c.value == value)
    }

    /// Number of declared constants.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Whether the domain declares no constants.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// The domain's decode and formatting configuration.
    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    /// Whether this domain is `name` with exactly `pairs`, in order.
    pub fn declares(&self, name: &str, pairs: &[(&str, i64)]) -> bool {
        self.name == name
            && self.constants.len() == pairs.len()
            && self
                .constants
                .iter()
                .zip(pairs)
                .all(|(c, (n, v))| c.name == *n && c.value == *v)
    }
}

impl fmt::Display for EnumDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.name)?;
        for (i, c) in self.constants.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}={}", c.name, c.value)?;
        }
        write!(f, " }}")
    }
}

/// Builder for [`EnumDomain`]. Constants are kept in call order.
#[derive(Clone, Debug)]
#[must_use]
pub struct EnumDomainBuilder {
    name: String,
    constants: Vec<EnumConstant>,
    config: DomainConfig,
}

impl EnumDomainBuilder {
    /// Append a constant.
    pub fn constant(mut self, name: impl Into<String>, value: i64) -> Self {
        self.constants.push(EnumConstant {
            name: name.into(),
            value,
        });
        self
    }

    /// Replace the domain's configuration.
    pub fn config(mut self, config: DomainConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate names and allocate a fresh [`DomainId`].
    pub fn build(self) -> Result<EnumDomain, DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::EmptyName);
        }
        let mut by_name = IndexMap::with_capacity(self.constants.len());
        for (index, c) in self.constants.iter().enumerate() {
            if c.name.is_empty() {
                return Err(DomainError::EmptyName);
            }
            if by_name.insert(c.name.clone(), index).is_some() {
                return Err(DomainError::DuplicateConstant {
                    domain: self.name,
                    name: c.name.clone(),
                });
            }
        }
        Ok(EnumDomain {
            id: DomainId::next(),
            name: self.name,
            constants: self.constants,
            by_name,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZeroPolicy;

    fn fruit() -> EnumDomain {
        EnumDomain::from_pairs(
            "Fruit",
            &[("Apple", 1), ("Pear", 2), ("Orange", 4), ("Banana", 8)],
        )
        .unwrap()
    }

    #[test]
    fn constants_keep_declaration_order() {
        let d = fruit();
        let names: Vec<&str> = d.constants().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Apple", "Pear", "Orange", "Banana"]);
        assert_eq!(d.len(), 4);
        assert!(!d.is_empty());
    }

    #[test]
    fn lookup_by_name_and_value() {
        let d = fruit();
        assert_eq!(d.index_of("Orange"), Some(2));
        assert_eq!(d.find("Banana").map(|c| c.value), Some(8));
        assert_eq!(d.find("Kiwi"), None);
        assert_eq!(d.index_of_value(2), Some(1));
        assert_eq!(d.index_of_value(3), None);
    }

    #[test]
    fn first_declared_wins_for_duplicate_values() {
        let d = EnumDomain::from_pairs("Alias", &[("A", 1), ("B", 1)]).unwrap();
        assert_eq!(d.index_of_value(1), Some(0));
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = EnumDomain::from_pairs("Dup", &[("A", 1), ("A", 2)]).unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateConstant {
                domain: "Dup".into(),
                name: "A".into()
            }
        );
    }

    #[test]
    fn empty_names_rejected() {
        assert_eq!(
            EnumDomain::builder("").build().unwrap_err(),
            DomainError::EmptyName
        );
        assert_eq!(
            EnumDomain::from_pairs("X", &[("", 1)]).unwrap_err(),
            DomainError::EmptyName
        );
    }

    #[test]
    fn each_build_gets_a_new_id() {
        assert_ne!(fruit().id(), fruit().id());
    }

    #[test]
    fn builder_carries_config() {
        let d = EnumDomain::builder("Z")
            .constant("A", 1)
            .config(DomainConfig::new().with_zero_policy(ZeroPolicy::Reject))
            .build()
            .unwrap();
        assert_eq!(d.config().zero, ZeroPolicy::Reject);
    }

    #[test]
    fn display_lists_constants() {
        let d = EnumDomain::from_pairs("MyEnum", &[("One", 0), ("Two", 1)]).unwrap();
        assert_eq!(d.to_string(), "MyEnum { One=0, Two=1 }");
    }
}

//! Error types for domains and the value codec.

use std::error::Error;
use std::fmt;

/// A raw integer could not be decoded against a domain.
///
/// The raw value is never lost: [`DecodeError::value`] returns exactly the
/// integer that was passed to the decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// No single constant equals the value and the greedy decomposition
    /// left bits unaccounted for.
    Unrepresentable {
        /// Name of the domain the value was decoded against.
        domain: String,
        /// The raw value, verbatim.
        value: i64,
        /// Bits left over after the decomposition scan. Zero only when the
        /// domain rejects a raw `0` ([`ZeroPolicy::Reject`](crate::ZeroPolicy)).
        remainder: i64,
    },
}

impl DecodeError {
    /// The raw integer that failed to decode.
    pub fn value(&self) -> i64 {
        match self {
            Self::Unrepresentable { value, .. } => *value,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrepresentable {
                domain,
                value: 0,
                remainder: 0,
            } => write!(f, "value 0 is not a constant of {domain}"),
            Self::Unrepresentable {
                domain,
                value,
                remainder,
            } => write!(
                f,
                "value {value} is not representable in {domain} (remainder {remainder:#x})"
            ),
        }
    }
}

impl Error for DecodeError {}

/// Errors from building, registering, or combining enum domains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// A domain or constant was given an empty name.
    EmptyName,
    /// Two constants in one domain share a name.
    DuplicateConstant {
        /// Domain being built.
        domain: String,
        /// The repeated constant name.
        name: String,
    },
    /// A constant name was not found in the domain.
    UnknownConstant {
        /// Domain that was searched.
        domain: String,
        /// The name that was not found.
        name: String,
    },
    /// A registry key is already bound to another domain.
    AlreadyRegistered {
        /// The registry key.
        key: String,
    },
    /// Two values from different domains were combined or compared.
    DomainMismatch {
        /// Name of the domain that was expected.
        expected: String,
        /// Name of the domain actually supplied.
        found: String,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "domain and constant names must not be empty"),
            Self::DuplicateConstant { domain, name } => {
                write!(f, "constant '{name}' declared twice in {domain}")
            }
            Self::UnknownConstant { domain, name } => {
                write!(f, "{domain} has no constant named '{name}'")
            }
            Self::AlreadyRegistered { key } => {
                write!(f, "a domain is already registered under '{key}'")
            }
            Self::DomainMismatch { expected, found } => {
                write!(f, "domain mismatch: expected {expected}, found {found}")
            }
        }
    }
}

impl Error for DomainError {}

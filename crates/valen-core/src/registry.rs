//! Domain registry: stable type key → shared [`EnumDomain`].
//!
//! Each enumerated type registers its ordered constant table once, under a
//! stable key (for Rust types declared with [`valued_enum!`](crate::valued_enum),
//! the module path plus type name). Lookups never need runtime type
//! introspection.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use indexmap::IndexMap;

use crate::domain::EnumDomain;
use crate::error::DomainError;
use crate::id::DomainId;

/// Ordered map from type key to domain.
///
/// `IndexMap` keeps registration order, so [`iter`](Self::iter) is
/// deterministic.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    domains: IndexMap<String, Arc<EnumDomain>>,
}

impl DomainRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            domains: IndexMap::new(),
        }
    }

    /// Register a domain under `key`.
    ///
    /// Fails with [`DomainError::AlreadyRegistered`] if the key is taken;
    /// the existing registration is left untouched.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        domain: EnumDomain,
    ) -> Result<Arc<EnumDomain>, DomainError> {
        let key = key.into();
        if self.domains.contains_key(&key) {
            return Err(DomainError::AlreadyRegistered { key });
        }
        let domain = Arc::new(domain);
        tracing::debug!(
            key = key.as_str(),
            domain = domain.name(),
            id = domain.id().get(),
            constants = domain.len(),
            "registered enum domain"
        );
        self.domains.insert(key, Arc::clone(&domain));
        Ok(domain)
    }

    /// Return the domain under `key`, building and registering it first if
    /// the key is new.
    pub fn get_or_register(
        &mut self,
        key: &str,
        build: impl FnOnce() -> Result<EnumDomain, DomainError>,
    ) -> Result<Arc<EnumDomain>, DomainError> {
        if let Some(domain) = self.domains.get(key) {
            return Ok(Arc::clone(domain));
        }
        self.register(key, build()?)
    }

    /// Return the domain under `key` if it [declares](EnumDomain::declares)
    /// `name` with `pairs`, building and registering it first if the key is
    /// new.
    ///
    /// A key already bound to a different table fails with
    /// [`DomainError::AlreadyRegistered`].
    pub fn declare(
        &mut self,
        key: &str,
        name: &str,
        pairs: &[(&str, i64)],
    ) -> Result<Arc<EnumDomain>, DomainError> {
        match self.domains.get(key) {
            Some(domain) if domain.declares(name, pairs) => Ok(Arc::clone(domain)),
            Some(domain) => {
                tracing::debug!(
                    key,
                    registered = %domain,
                    "registry key bound to a different constant table"
                );
                Err(DomainError::AlreadyRegistered {
                    key: key.to_string(),
                })
            }
            None => self.register(key, EnumDomain::from_pairs(name, pairs)?),
        }
    }

    /// Look up a domain by key.
    pub fn get(&self, key: &str) -> Option<&Arc<EnumDomain>> {
        self.domains.get(key)
    }

    /// Look up a domain by its [`DomainId`].
    pub fn get_by_id(&self, id: DomainId) -> Option<&Arc<EnumDomain>> {
        self.domains.values().find(|d| d.id() == id)
    }

    /// Number of registered domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Iterate over `(key, domain)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<EnumDomain>)> {
        self.domains.iter().map(|(k, d)| (k.as_str(), d))
    }
}

static GLOBAL: OnceLock<Mutex<DomainRegistry>> = OnceLock::new();

/// The process-global registry.
///
/// A poisoned lock is recovered: registrations are single inserts, so a
/// panic elsewhere cannot leave the map half-updated.
pub fn global() -> MutexGuard<'static, DomainRegistry> {
    GLOBAL
        .get_or_init(|| Mutex::new(DomainRegistry::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Register a domain in the global registry.
pub fn register_domain(
    key: impl Into<String>,
    domain: EnumDomain,
) -> Result<Arc<EnumDomain>, DomainError> {
    global().register(key, domain)
}

/// Look up a domain in the global registry.
pub fn lookup_domain(key: &str) -> Option<Arc<EnumDomain>> {
    global().get(key).cloned()
}

/// Global-registry form of [`DomainRegistry::get_or_register`].
pub fn get_or_register(
    key: &str,
    build: impl FnOnce() -> Result<EnumDomain, DomainError>,
) -> Result<Arc<EnumDomain>, DomainError> {
    global().get_or_register(key, build)
}

/// Global-registry form of [`DomainRegistry::declare`].
pub fn declare_domain(
    key: &str,
    name: &str,
    pairs: &[(&str, i64)],
) -> Result<Arc<EnumDomain>, DomainError> {
    global().declare(key, name, pairs)
}

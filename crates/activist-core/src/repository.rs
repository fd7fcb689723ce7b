//! Tenant repository and lookup seams
//!
//! The `TenantRepository` trait abstracts the durable tenant blob so the
//! store can run against a JSON file, an in-memory map, or any other backend.
//! The `TenantLookup` trait is the read-only view the domain resolver uses.

use async_trait::async_trait;
use std::sync::Arc;

use crate::tenant::{TenantConfig, TenantMap};
use crate::Result;

/// Durable storage for the whole tenant map.
///
/// Implementations:
/// - `JsonFileRepository`: a single JSON document on disk
/// - `MemoryRepository`: process memory, used in tests
///
/// Writes are whole-map and last-write-wins; there is no conditional write.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Load the persisted tenant map.
    ///
    /// # Returns
    /// `Ok(None)` when nothing has been persisted yet.
    ///
    /// # Errors
    /// - `Error::Persistence` if the backend cannot be read
    /// - `Error::InvalidData` if the blob is not a tenant map
    async fn load(&self) -> Result<Option<TenantMap>>;

    /// Replace the persisted tenant map.
    ///
    /// Must be all-or-nothing: after an error the previous blob is intact.
    async fn save(&self, tenants: &TenantMap) -> Result<()>;

    /// Human readable location, used in log lines.
    fn describe(&self) -> String;
}

/// Read-only slug lookup.
pub trait TenantLookup {
    /// Exact, case-sensitive match.
    fn get_by_slug(&self, slug: &str) -> Option<&TenantConfig>;
}

impl TenantLookup for TenantMap {
    fn get_by_slug(&self, slug: &str) -> Option<&TenantConfig> {
        self.get(slug)
    }
}

impl<T: TenantLookup + ?Sized> TenantLookup for Arc<T> {
    fn get_by_slug(&self, slug: &str) -> Option<&TenantConfig> {
        (**self).get_by_slug(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_tenants;

    #[test]
    fn test_lookup_is_case_sensitive() {
        let tenants = default_tenants();
        assert!(tenants.get_by_slug("climate-action").is_some());
        assert!(tenants.get_by_slug("Climate-Action").is_none());
        assert!(tenants.get_by_slug("").is_none());
    }
}

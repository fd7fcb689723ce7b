//! Tenant store
//!
//! `TenantStore` owns every tenant record. Readers take a [`TenantSnapshot`],
//! an immutable `Arc` of the whole map, so lookups never block writers and
//! never observe a half-applied mutation. Writers are serialized: each
//! mutation copies the map, persists the copy through the repository and only
//! then swaps it in, so a failed save leaves the visible state unchanged.

use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use activist_core::seed::default_tenants;
use activist_core::{Error, Result, TenantConfig, TenantMap, TenantRepository};

/// Read-only view of the tenant map at one point in time.
pub type TenantSnapshot = Arc<TenantMap>;

/// Where the initial tenant map came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOrigin {
    /// Loaded from the repository.
    Persisted,
    /// Nothing was persisted; the built-in defaults were seeded and saved.
    Seeded,
    /// The repository could not be read; running on the built-in defaults.
    Recovered,
}

impl StoreOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOrigin::Persisted => "persisted",
            StoreOrigin::Seeded => "seeded",
            StoreOrigin::Recovered => "recovered",
        }
    }
}

pub struct TenantStore {
    repository: Arc<dyn TenantRepository>,
    current: RwLock<TenantSnapshot>,
    write_gate: tokio::sync::Mutex<()>,
    origin: StoreOrigin,
}

impl TenantStore {
    /// Open the store on top of a repository.
    ///
    /// Never fails: an empty repository is seeded with the built-in tenants,
    /// and a repository that cannot be read is logged and replaced in memory
    /// by the built-in tenants without overwriting what is stored.
    pub async fn open(repository: Arc<dyn TenantRepository>) -> Self {
        let location = repository.describe();

        let (tenants, origin) = match repository.load().await {
            Ok(Some(tenants)) => {
                info!("Loaded {} tenants from {}", tenants.len(), location);
                (tenants, StoreOrigin::Persisted)
            }
            Ok(None) => {
                let tenants = default_tenants();
                if let Err(e) = repository.save(&tenants).await {
                    warn!("Failed to persist default tenants to {}: {}", location, e);
                }
                info!("Seeded {} default tenants into {}", tenants.len(), location);
                (tenants, StoreOrigin::Seeded)
            }
            Err(e) => {
                warn!(
                    "Failed to load tenants from {}, falling back to defaults: {}",
                    location, e
                );
                (default_tenants(), StoreOrigin::Recovered)
            }
        };

        Self {
            repository,
            current: RwLock::new(Arc::new(tenants)),
            write_gate: tokio::sync::Mutex::new(()),
            origin,
        }
    }

    pub fn origin(&self) -> StoreOrigin {
        self.origin
    }

    /// Current read-only view of all tenants.
    pub fn snapshot(&self) -> TenantSnapshot {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// All tenants, in slug order.
    pub fn list(&self) -> Vec<TenantConfig> {
        self.snapshot().values().cloned().collect()
    }

    /// Exact-match lookup. Slugs are case-sensitive; callers normalize.
    pub fn get_by_slug(&self, slug: &str) -> Option<TenantConfig> {
        self.snapshot().get(slug).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Add a tenant.
    ///
    /// Synthesizes the default hero when the tenant has no blocks and assigns
    /// ids to blocks that lack one. Returns the record as stored.
    ///
    /// # Errors
    /// - `Error::DuplicateSlug` if the slug is taken; nothing is changed
    /// - `Error::InvalidData` if another tenant already uses the id
    /// - `Error::Persistence` if the map could not be saved; nothing is changed
    pub async fn create(&self, mut tenant: TenantConfig) -> Result<TenantConfig> {
        let _guard = self.write_gate.lock().await;
        let current = self.snapshot();

        if current.contains_key(&tenant.slug) {
            return Err(Error::DuplicateSlug(tenant.slug.to_string()));
        }
        if current.values().any(|existing| existing.id == tenant.id) {
            return Err(Error::InvalidData(format!(
                "tenant id '{}' is already in use",
                tenant.id
            )));
        }

        tenant.normalize();

        let mut next = TenantMap::clone(&current);
        next.insert(tenant.slug.clone(), tenant.clone());
        self.commit(next).await?;

        info!("Created tenant '{}' ({})", tenant.slug, tenant.id);
        Ok(tenant)
    }

    /// Remove a tenant by slug.
    ///
    /// Idempotent: an absent slug changes nothing, performs no write and
    /// returns `Ok(false)`.
    pub async fn delete(&self, slug: &str) -> Result<bool> {
        let _guard = self.write_gate.lock().await;
        let current = self.snapshot();

        if !current.contains_key(slug) {
            debug!("Delete of unknown tenant '{}' ignored", slug);
            return Ok(false);
        }

        let mut next = TenantMap::clone(&current);
        next.remove(slug);
        self.commit(next).await?;

        info!("Deleted tenant '{}'", slug);
        Ok(true)
    }

    /// Re-read the repository and replace the in-memory view.
    ///
    /// On error, or when nothing is stored any more, the current view is kept.
    /// Returns the number of tenants now visible.
    pub async fn reload(&self) -> Result<usize> {
        let _guard = self.write_gate.lock().await;

        match self.repository.load().await {
            Ok(Some(tenants)) => {
                let count = tenants.len();
                *self.write_current() = Arc::new(tenants);
                info!("Reloaded {} tenants from {}", count, self.repository.describe());
                Ok(count)
            }
            Ok(None) => {
                warn!(
                    "Tenant storage {} is empty, keeping current tenants",
                    self.repository.describe()
                );
                Ok(self.snapshot().len())
            }
            Err(e) => {
                warn!("Tenant reload failed, keeping current tenants: {}", e);
                Err(e)
            }
        }
    }

    async fn commit(&self, next: TenantMap) -> Result<()> {
        self.repository.save(&next).await?;
        *self.write_current() = Arc::new(next);
        Ok(())
    }

    fn write_current(&self) -> std::sync::RwLockWriteGuard<'_, TenantSnapshot> {
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

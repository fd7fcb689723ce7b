//! In-memory TenantRepository implementation

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use activist_core::{
    Error, Result, TenantMap, TenantRepository, decode_tenant_map, encode_tenant_map,
};

/// Repository that keeps the serialized tenant blob in process memory.
///
/// The blob is held as JSON so loads go through the same decoding path as
/// the file repository. Loads and saves can be made to fail for tests.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    blob: Mutex<Option<Value>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryRepository {
    /// Empty repository: nothing persisted yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with a raw blob, e.g. an older storage shape.
    pub fn with_blob(blob: Value) -> Self {
        Self {
            blob: Mutex::new(Some(blob)),
            ..Self::default()
        }
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Current raw blob.
    pub fn blob(&self) -> Option<Value> {
        self.lock().clone()
    }

    /// Replace the raw blob, as another writer would.
    pub fn set_blob(&self, blob: Value) {
        *self.lock() = Some(blob);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Value>> {
        self.blob.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TenantRepository for MemoryRepository {
    async fn load(&self) -> Result<Option<TenantMap>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(Error::Persistence("tenant storage could not be read".to_string()));
        }
        match self.blob() {
            Some(value) => decode_tenant_map(value).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, tenants: &TenantMap) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Persistence("tenant storage could not be written".to_string()));
        }
        let mut blob = self.lock();
        let value = encode_tenant_map(tenants, blob.clone())?;
        *blob = Some(value);
        drop(blob);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

//! File-based TenantRepository implementation

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use activist_core::{
    Error, Result, TenantMap, TenantRepository, decode_tenant_map, encode_tenant_map,
};

use crate::atomic_writer::AtomicWriter;

/// Fixed storage key; the tenant file is `<dir>/<STORAGE_KEY>.json`.
pub const STORAGE_KEY: &str = "activist_app_tenants_v1";

/// Stream of tenant file change notifications
pub type TenantChangeStream = BoxStream<'static, Result<TenantChange>>;

/// Tenant file change notification
#[derive(Debug, Clone)]
pub struct TenantChange {
    pub path: PathBuf,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Tenant map stored as a single JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Repository backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = expand_home(path.into())?;
        info!("Initialized JsonFileRepository for {:?}", path);
        Ok(Self { path })
    }

    /// Repository backed by `<dir>/activist_app_tenants_v1.json`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = expand_home(dir.into())?;
        Self::new(dir.join(format!("{}.json", STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> Result<Option<TenantMap>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Tenant file {:?} does not exist yet", path);
                return Ok(None);
            }
            Err(e) => {
                error!("Failed to read tenant file {:?}: {}", path, e);
                return Err(Error::Persistence("tenant storage could not be read".to_string()));
            }
        };

        let value: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
            error!("Tenant file {:?} is not valid JSON: {}", path, e);
            Error::InvalidData("stored tenant map is not valid JSON".to_string())
        })?;

        decode_tenant_map(value).map(Some)
    }

    /// Raw document currently on disk, used to carry unreadable records
    /// through a save. A missing or corrupt file has nothing to keep.
    fn read_previous(path: &Path) -> Result<Option<serde_json::Value>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                error!("Failed to read tenant file {:?} before save: {}", path, e);
                return Err(Error::Persistence("tenant storage could not be read".to_string()));
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Overwriting tenant file {:?} that is not valid JSON: {}", path, e);
                Ok(None)
            }
        }
    }

    fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
        AtomicWriter::write_all(path, contents).map_err(|e| {
            error!("Failed to write tenant file {:?}: {}", path, e);
            Error::Persistence("tenant storage could not be written".to_string())
        })
    }

    /// Watch the tenant file for changes made outside this process.
    ///
    /// The parent directory is watched because saves replace the file by
    /// rename. Events for other files in the directory, including our own
    /// temporary file, are ignored.
    pub fn watch(&self) -> Result<TenantChangeStream> {
        let (tx, rx) = mpsc::channel(100);

        let path = self.path.clone();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| {
            error!("Failed to create tenant directory {:?}: {}", dir, e);
            Error::Persistence("tenant storage directory unavailable".to_string())
        })?;

        tokio::task::spawn_blocking(move || {
            let (notify_tx, notify_rx) = std::sync::mpsc::channel();

            let mut watcher = match RecommendedWatcher::new(
                move |res: std::result::Result<Event, notify::Error>| {
                    if let Err(e) = notify_tx.send(res) {
                        error!("Failed to send file watch event: {}", e);
                    }
                },
                notify::Config::default(),
            ) {
                Ok(w) => w,
                Err(e) => {
                    error!("Failed to create file watcher: {}", e);
                    return;
                }
            };

            if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
                error!("Failed to watch tenant directory: {}", e);
                return;
            }

            info!("Watching tenant file for changes: {:?}", path);

            while let Ok(event_result) = notify_rx.recv() {
                match event_result {
                    Ok(event) => {
                        let relevant = matches!(
                            event.kind,
                            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                        ) && event.paths.iter().any(|p| p.file_name() == path.file_name());

                        if relevant {
                            let change = TenantChange {
                                path: path.clone(),
                                timestamp: chrono::Utc::now(),
                            };
                            if tx.blocking_send(Ok(change)).is_err() {
                                debug!("Tenant change stream closed, stopping watcher");
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        warn!("File watch error: {}", e);
                        if tx
                            .blocking_send(Err(Error::Internal(format!("File watch error: {}", e))))
                            .is_err()
                        {
                            break;
                        }
                    }
                }
            }
        });

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl TenantRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<TenantMap>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::read_file(&path))
            .await
            .map_err(|e| Error::Internal(format!("tenant load task failed: {}", e)))?
    }

    async fn save(&self, tenants: &TenantMap) -> Result<()> {
        let tenants_to_write = tenants.clone();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let previous = Self::read_previous(&path)?;
            let document = encode_tenant_map(&tenants_to_write, previous)?;
            let contents = serde_json::to_vec_pretty(&document)?;
            Self::write_file(&path, &contents)
        })
        .await
        .map_err(|e| Error::Internal(format!("tenant save task failed: {}", e)))??;

        debug!("Saved {} tenants to {:?}", tenants.len(), self.path);
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn expand_home(path: PathBuf) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?
            .join(rest)),
        Err(_) => Ok(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activist_core::seed::default_tenants;
    use futures::StreamExt;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path()).unwrap();

        assert!(repo.load().await.unwrap().is_none());
        assert!(repo.path().ends_with("activist_app_tenants_v1.json"));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path()).unwrap();
        let tenants = default_tenants();

        repo.save(&tenants).await.unwrap();
        let loaded = repo.load().await.unwrap().unwrap();

        assert_eq!(loaded, tenants);
    }

    #[tokio::test]
    async fn test_stored_shape_is_slug_keyed_object() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path()).unwrap();
        repo.save(&default_tenants()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(repo.path()).unwrap()).unwrap();
        assert_eq!(raw["climate-action"]["slug"], "climate-action");
        assert_eq!(raw["city-bikes"]["theme"]["primary"], "#1d4ed8");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path()).unwrap();
        std::fs::write(repo.path(), "{not json").unwrap();

        assert!(matches!(repo.load().await, Err(Error::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_legacy_shape_loads() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path()).unwrap();
        std::fs::write(
            repo.path(),
            r##"{"city-bikes": {"id": "t_02", "name": "City Bike Initiative", "slug": "city-bikes",
                "description": "Reclaiming our streets for safer cycling.",
                "theme": {"primary": "#1d4ed8", "secondary": "#dbeafe", "accent": "#3b82f6"},
                "features": ["events", "volunteers"]}}"##,
        )
        .unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded["city-bikes"].landing_page_blocks.len(), 1);
    }

    #[tokio::test]
    async fn test_save_keeps_records_it_cannot_read() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path()).unwrap();
        std::fs::write(
            repo.path(),
            r#"{"Legacy Org": {"id": "t_40", "name": "Legacy Org", "slug": "Legacy Org"}}"#,
        )
        .unwrap();
        assert!(repo.load().await.unwrap().unwrap().is_empty());

        repo.save(&default_tenants()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(repo.path()).unwrap()).unwrap();
        assert_eq!(raw["Legacy Org"]["slug"], "Legacy Org");
        assert_eq!(raw["city-bikes"]["slug"], "city-bikes");
        assert_eq!(repo.load().await.unwrap().unwrap(), default_tenants());
    }

    #[tokio::test]
    async fn test_save_over_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path()).unwrap();
        std::fs::write(repo.path(), "{not json").unwrap();

        repo.save(&default_tenants()).await.unwrap();
        assert_eq!(repo.load().await.unwrap().unwrap(), default_tenants());
    }

    #[tokio::test]
    async fn test_watch_reports_external_write() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path()).unwrap();
        let mut changes = repo.watch().unwrap();

        // Give the watcher thread time to register
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(repo.path(), "{}").unwrap();

        let change = tokio::time::timeout(Duration::from_secs(5), changes.next())
            .await
            .expect("no change event")
            .expect("stream ended")
            .unwrap();
        assert_eq!(change.path, repo.path());
    }
}

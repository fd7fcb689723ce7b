//! Tenant storage for Activist
//!
//! This crate owns every tenant record in the process:
//! - `TenantStore`: the in-memory, copy-on-write view with create/delete
//! - `JsonFileRepository`: the tenant map as one JSON file, written atomically
//!   and watched for external edits
//! - `MemoryRepository`: an in-process repository for tests and demos
//!
//! # Example
//! ```no_run
//! # use activist_store::{JsonFileRepository, TenantStore};
//! # use std::sync::Arc;
//! # async fn example() -> activist_core::Result<()> {
//! let repository = JsonFileRepository::in_dir("~/.activist")?;
//! let store = TenantStore::open(Arc::new(repository)).await;
//! let tenant = store.get_by_slug("climate-action");
//! # Ok(())
//! # }
//! ```

mod atomic_writer;
mod file_repository;
mod memory_repository;
mod store;

pub use atomic_writer::AtomicWriter;
pub use file_repository::{JsonFileRepository, STORAGE_KEY, TenantChange, TenantChangeStream};
pub use memory_repository::MemoryRepository;
pub use store::{StoreOrigin, TenantSnapshot, TenantStore};

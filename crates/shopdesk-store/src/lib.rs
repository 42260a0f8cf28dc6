//! # ShopDesk Store
//!
//! Concrete [`DocumentStore`] backends plus typed repositories for the
//! `faq` and `products` collections.
//!
//! - [`SqliteStore`]: single-file SQLite database, one `documents` table.
//! - [`MemoryStore`]: process-local store for tests and throwaway runs.

pub mod memory;
pub mod repo;
pub mod sqlite;

pub use memory::MemoryStore;
pub use repo::{FaqRepo, ProductRepo, Stored};
pub use sqlite::SqliteStore;

use shopdesk_core::config::StoreConfig;
use shopdesk_core::error::{Result, ShopDeskError};
use shopdesk_core::traits::store::DocumentStore;
use std::sync::Arc;

/// Open the backend selected in the config.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.backend.as_str() {
        "sqlite" => {
            let path = config.resolved_path();
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let store = SqliteStore::open(&path)?;
            tracing::info!("💾 SQLite store opened: {}", path.display());
            Ok(Arc::new(store))
        }
        "memory" => {
            tracing::info!("💾 Using in-memory store (data is lost on exit)");
            Ok(Arc::new(MemoryStore::new()))
        }
        other => Err(ShopDeskError::Config(format!(
            "unknown store backend '{other}' (expected sqlite or memory)"
        ))),
    }
}

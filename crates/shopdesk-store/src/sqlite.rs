//! SQLite document store.
//!
//! All collections share one `documents` table. Document bodies are stored as
//! JSON text; `seq` keeps insertion order for listing.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use shopdesk_core::error::{Result, ShopDeskError};
use shopdesk_core::traits::store::{Document, DocumentStore};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed [`DocumentStore`]. Pass `:memory:` for a throwaway database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

fn store_err(context: &str, e: impl std::fmt::Display) -> ShopDeskError {
    ShopDeskError::Store(format!("{context}: {e}"))
}

fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_document(
    id: String,
    data: String,
    created_at: String,
    updated_at: String,
) -> Option<Document> {
    match serde_json::from_str(&data) {
        Ok(data) => Some(Document {
            id,
            data,
            created_at: parse_time(&created_at),
            updated_at: parse_time(&updated_at),
        }),
        Err(e) => {
            tracing::warn!("⚠️ Skipping document {id} with unreadable body: {e}");
            None
        }
    }
}

impl SqliteStore {
    /// Open or create the database and run migrations.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| store_err("Open", e))?;

        // WAL gives readers a consistent view while a write is in flight
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (collection, id)
            );
            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents (collection, seq);",
        )
        .map_err(|e| store_err("Migration", e))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| store_err("Lock", e))
    }
}

impl DocumentStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn add(&self, collection: &str, data: serde_json::Value) -> Result<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now().to_rfc3339();
        let body = serde_json::to_string(&data)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (collection, id, data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![collection, id, body, now],
        )
        .map_err(|e| store_err("Insert", e))?;
        Ok(id)
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT id, data, created_at, updated_at FROM documents
                 WHERE collection=?1 AND id=?2",
                params![collection, id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| store_err("Get", e))?;
        Ok(row.and_then(|(id, data, c, u)| row_to_document(id, data, c, u)))
    }

    fn set(&self, collection: &str, id: &str, data: serde_json::Value) -> Result<bool> {
        let body = serde_json::to_string(&data)?;
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE documents SET data=?1, updated_at=?2 WHERE collection=?3 AND id=?4",
                params![body, Utc::now().to_rfc3339(), collection, id],
            )
            .map_err(|e| store_err("Update", e))?;
        Ok(changed > 0)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "DELETE FROM documents WHERE collection=?1 AND id=?2",
                params![collection, id],
            )
            .map_err(|e| store_err("Delete", e))?;
        Ok(changed > 0)
    }

    fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, data, created_at, updated_at FROM documents
                 WHERE collection=?1 ORDER BY seq",
            )
            .map_err(|e| store_err("Prepare", e))?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| store_err("Query", e))?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, data, c, u) = row.map_err(|e| store_err("Row", e))?;
            if let Some(doc) = row_to_document(id, data, c, u) {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    fn count(&self, collection: &str) -> Result<usize> {
        let conn = self.lock()?;
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents WHERE collection=?1",
                params![collection],
                |r| r.get(0),
            )
            .map_err(|e| store_err("Count", e))?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> SqliteStore {
        SqliteStore::open(Path::new(":memory:")).unwrap()
    }

    #[test]
    fn test_document_crud() {
        let store = temp_store();

        // Create
        let id = store.add("products", json!({"name": "Pen", "price": 1.5})).unwrap();
        let doc = store.get("products", &id).unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.data["name"], "Pen");

        // Update
        assert!(store.set("products", &id, json!({"name": "Pen", "price": 2.0})).unwrap());
        let doc = store.get("products", &id).unwrap().unwrap();
        assert_eq!(doc.data["price"], 2.0);
        assert!(doc.updated_at >= doc.created_at);

        // Delete
        assert!(store.delete("products", &id).unwrap());
        assert!(store.get("products", &id).unwrap().is_none());
        assert!(!store.delete("products", &id).unwrap());
    }

    #[test]
    fn test_unknown_ids() {
        let store = temp_store();
        assert!(store.get("faq", "missing").unwrap().is_none());
        assert!(!store.set("faq", "missing", json!({})).unwrap());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let store = temp_store();
        for i in 0..5 {
            store.add("faq", json!({"question": format!("q{i}")})).unwrap();
        }
        let docs = store.list("faq").unwrap();
        let questions: Vec<_> = docs.iter().map(|d| d.data["question"].clone()).collect();
        assert_eq!(questions, vec!["q0", "q1", "q2", "q3", "q4"]);
    }

    #[test]
    fn test_collections_are_isolated() {
        let store = temp_store();
        let id = store.add("faq", json!({"question": "q"})).unwrap();
        store.add("products", json!({"name": "p"})).unwrap();

        assert_eq!(store.count("faq").unwrap(), 1);
        assert_eq!(store.count("products").unwrap(), 1);
        assert!(store.get("products", &id).unwrap().is_none());
        assert!(store.list("empty").unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let path = std::env::temp_dir().join(format!(
            "shopdesk-store-{}-{}.db",
            std::process::id(),
            uuid::Uuid::new_v4().simple()
        ));
        let id = {
            let store = SqliteStore::open(&path).unwrap();
            store.add("faq", json!({"question": "kept"})).unwrap()
        };
        let store = SqliteStore::open(&path).unwrap();
        let doc = store.get("faq", &id).unwrap().unwrap();
        assert_eq!(doc.data["question"], "kept");
        drop(store);
        std::fs::remove_file(&path).ok();
        std::fs::remove_file(path.with_extension("db-wal")).ok();
        std::fs::remove_file(path.with_extension("db-shm")).ok();
    }
}

//! In-memory document store. Nothing survives the process.

use chrono::Utc;
use shopdesk_core::error::{Result, ShopDeskError};
use shopdesk_core::traits::store::{Document, DocumentStore};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<Document>>>> {
        self.collections
            .lock()
            .map_err(|e| ShopDeskError::Store(format!("Lock: {e}")))
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn add(&self, collection: &str, data: serde_json::Value) -> Result<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        self.lock()?
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                data,
                created_at: now,
                updated_at: now,
            });
        Ok(id)
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(self
            .lock()?
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    fn set(&self, collection: &str, id: &str, data: serde_json::Value) -> Result<bool> {
        let mut guard = self.lock()?;
        let Some(doc) = guard
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(false);
        };
        doc.data = data;
        doc.updated_at = Utc::now();
        Ok(true)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let mut guard = self.lock()?;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(docs.len() < before)
    }

    fn list(&self, collection: &str) -> Result<Vec<Document>> {
        Ok(self.lock()?.get(collection).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_crud() {
        let store = MemoryStore::new();
        let a = store.add("faq", json!({"question": "a"})).unwrap();
        let b = store.add("faq", json!({"question": "b"})).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.count("faq").unwrap(), 2);

        assert!(store.set("faq", &a, json!({"question": "a2"})).unwrap());
        assert_eq!(store.get("faq", &a).unwrap().unwrap().data["question"], "a2");

        assert!(store.delete("faq", &a).unwrap());
        assert!(!store.delete("faq", &a).unwrap());
        let remaining = store.list("faq").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b);
    }

    #[test]
    fn test_memory_unknown_collection() {
        let store = MemoryStore::new();
        assert!(store.list("nothing").unwrap().is_empty());
        assert!(store.get("nothing", "x").unwrap().is_none());
        assert!(!store.set("nothing", "x", json!({})).unwrap());
        assert!(!store.delete("nothing", "x").unwrap());
    }
}

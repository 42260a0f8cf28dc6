//! Document store trait: collections of JSON documents keyed by generated ids.
//!
//! Modeled after a managed document database: callers address a named
//! collection, documents are schemaless JSON objects, and listing returns
//! documents in insertion order so downstream ranking stays reproducible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A stored document with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Backend for document collections.
///
/// Implementations must be safe to share across request handlers.
pub trait DocumentStore: Send + Sync {
    /// Backend name for logs and `/api/v1/info`.
    fn name(&self) -> &str;

    /// Insert a new document and return its generated id.
    fn add(&self, collection: &str, data: serde_json::Value) -> Result<String>;

    /// Fetch a document, `None` if the id is unknown.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Replace the data of an existing document.
    /// Returns `false` when the id is unknown.
    fn set(&self, collection: &str, id: &str, data: serde_json::Value) -> Result<bool>;

    /// Delete a document. Returns `false` when the id is unknown.
    fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    /// All documents of a collection, oldest first.
    fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Number of documents in a collection.
    fn count(&self, collection: &str) -> Result<usize> {
        Ok(self.list(collection)?.len())
    }
}

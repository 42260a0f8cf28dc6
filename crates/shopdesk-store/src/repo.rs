//! Typed access to the `faq` and `products` collections.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shopdesk_core::error::{Result, ShopDeskError};
use shopdesk_core::traits::store::{Document, DocumentStore};
use shopdesk_core::types::{FAQ_COLLECTION, FaqEntry, FaqRecord, PRODUCT_COLLECTION, Product};

/// A typed document with its id and timestamps, flattened for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stored<T> {
    pub id: String,
    #[serde(flatten)]
    pub item: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Stored<T> {
    fn from_document(doc: Document, item: T) -> Self {
        Self {
            id: doc.id,
            item,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

// ── FAQ ──────────────────────────────

pub struct FaqRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> FaqRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Validate and store one entry.
    pub fn add(&self, entry: &FaqEntry) -> Result<String> {
        entry.validate()?;
        self.store.add(FAQ_COLLECTION, serde_json::to_value(entry)?)
    }

    /// Append every entry, returning how many were stored.
    ///
    /// All entries are validated before the first write. Writes are not
    /// transactional: if the store fails partway, the entries already written
    /// stay and the error reports how many there were.
    pub fn seed(&self, entries: &[FaqEntry]) -> Result<usize> {
        for entry in entries {
            entry.validate()?;
        }
        for (added, entry) in entries.iter().enumerate() {
            if let Err(e) = self.add(entry) {
                tracing::warn!("⚠️ Seeding stopped after {added} of {} entries", entries.len());
                return Err(ShopDeskError::Store(format!(
                    "seeding stopped after {added} of {} entries: {e}",
                    entries.len()
                )));
            }
        }
        tracing::info!("📚 Seeded {} FAQ entries", entries.len());
        Ok(entries.len())
    }

    /// Raw records in insertion order. Documents that are not FAQ-shaped are
    /// logged and left out; records missing a question are kept for the
    /// matcher to skip.
    pub fn records(&self) -> Result<Vec<FaqRecord>> {
        Ok(self
            .store
            .list(FAQ_COLLECTION)?
            .iter()
            .filter_map(|doc| {
                let rec = FaqRecord::from_value(&doc.data);
                if rec.is_none() {
                    tracing::warn!("⚠️ FAQ document {} has an unexpected shape", doc.id);
                }
                rec
            })
            .collect())
    }

    /// Stored documents as-is, for listing.
    pub fn documents(&self) -> Result<Vec<Document>> {
        self.store.list(FAQ_COLLECTION)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        if self.store.delete(FAQ_COLLECTION, id)? {
            Ok(())
        } else {
            Err(ShopDeskError::NotFound(format!("faq entry '{id}'")))
        }
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count(FAQ_COLLECTION)
    }
}

// ── Products ──────────────────────────────

const RESERVED_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

pub struct ProductRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProductRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Document body for a product, minus keys owned by [`Stored`].
    fn body(product: &Product) -> Result<serde_json::Value> {
        let mut value = serde_json::to_value(product)?;
        if let Some(map) = value.as_object_mut() {
            for key in RESERVED_FIELDS {
                map.remove(*key);
            }
        }
        Ok(value)
    }

    fn parse(doc: Document) -> Result<Stored<Product>> {
        let product: Product = serde_json::from_value(doc.data.clone()).map_err(|e| {
            ShopDeskError::Store(format!("product '{}' is malformed: {e}", doc.id))
        })?;
        Ok(Stored::from_document(doc, product))
    }

    pub fn create(&self, product: &Product) -> Result<Stored<Product>> {
        product.validate()?;
        let id = self
            .store
            .add(PRODUCT_COLLECTION, Self::body(product)?)?;
        self.get(&id)
    }

    pub fn get(&self, id: &str) -> Result<Stored<Product>> {
        let doc = self
            .store
            .get(PRODUCT_COLLECTION, id)?
            .ok_or_else(|| ShopDeskError::NotFound(format!("product '{id}'")))?;
        Self::parse(doc)
    }

    /// Every well-formed product, oldest first. Malformed documents are logged and skipped.
    pub fn list(&self) -> Result<Vec<Stored<Product>>> {
        Ok(self
            .store
            .list(PRODUCT_COLLECTION)?
            .into_iter()
            .filter_map(|doc| match Self::parse(doc) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!("⚠️ {e}");
                    None
                }
            })
            .collect())
    }

    /// Raw product documents, including ones that fail to parse.
    pub fn documents(&self) -> Result<Vec<Document>> {
        self.store.list(PRODUCT_COLLECTION)
    }

    pub fn update(&self, id: &str, product: &Product) -> Result<Stored<Product>> {
        product.validate()?;
        if !self
            .store
            .set(PRODUCT_COLLECTION, id, Self::body(product)?)?
        {
            return Err(ShopDeskError::NotFound(format!("product '{id}'")));
        }
        self.get(id)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        if self.store.delete(PRODUCT_COLLECTION, id)? {
            Ok(())
        } else {
            Err(ShopDeskError::NotFound(format!("product '{id}'")))
        }
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count(PRODUCT_COLLECTION)
    }
}

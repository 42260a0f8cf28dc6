//! Price statistics over the product collection.

use serde::Serialize;
use shopdesk_core::traits::store::Document;
use shopdesk_core::types::Product;

use crate::routes::document_json;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub count: usize,
    pub max_price: f64,
    pub min_price: f64,
    pub average_price: f64,
    /// Every product priced at `max_price`, in insertion order.
    pub max_price_products: Vec<serde_json::Value>,
    pub min_price_products: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    /// The collection holds no documents at all.
    Empty,
    /// Documents exist but none has both a name and a numeric price.
    MissingFields,
}

/// Compute price extremes and the average over documents that parse as products.
pub fn price_stats(docs: &[Document]) -> Result<PriceStats, StatsError> {
    if docs.is_empty() {
        return Err(StatsError::Empty);
    }

    let priced: Vec<(&Document, f64)> = docs
        .iter()
        .filter_map(|doc| {
            serde_json::from_value::<Product>(doc.data.clone())
                .ok()
                .filter(|p| p.price.is_finite())
                .map(|p| (doc, p.price))
        })
        .collect();
    if priced.is_empty() {
        return Err(StatsError::MissingFields);
    }

    let max_price = priced.iter().map(|(_, p)| *p).fold(f64::MIN, f64::max);
    let min_price = priced.iter().map(|(_, p)| *p).fold(f64::MAX, f64::min);
    let total: f64 = priced.iter().map(|(_, p)| p).sum();

    let at = |price: f64| {
        priced
            .iter()
            .filter(|(_, p)| *p == price)
            .map(|(doc, _)| document_json(doc))
            .collect::<Vec<_>>()
    };

    Ok(PriceStats {
        count: priced.len(),
        max_price,
        min_price,
        average_price: total / priced.len() as f64,
        max_price_products: at(max_price),
        min_price_products: at(min_price),
    })
}

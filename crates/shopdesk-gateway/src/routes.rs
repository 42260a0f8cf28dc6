//! API route handlers for the gateway.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::json;
use shopdesk_core::error::ShopDeskError;
use shopdesk_core::traits::store::Document;
use shopdesk_core::types::{FaqEntry, Product};
use shopdesk_faq::{FaqIndex, MatchPolicy, MatchResult, seed::sample_faq};
use shopdesk_store::{FaqRepo, ProductRepo};
use std::sync::Arc;

use super::error::ApiError;
use super::extract::ApiJson;
use super::server::AppState;
use super::stats::{StatsError, price_stats};

type ApiResult = Result<Json<serde_json::Value>, ApiError>;

/// Body of both FAQ question endpoints.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Document body with its id folded in.
pub(crate) fn document_json(doc: &Document) -> serde_json::Value {
    let mut value = doc.data.clone();
    if let Some(map) = value.as_object_mut() {
        map.insert("id".into(), json!(doc.id));
    }
    value
}

/// Load the current FAQ set and answer one query. The index is rebuilt per
/// request so edits to the collection are visible immediately.
fn answer(state: &AppState, query: &str, policy: &MatchPolicy) -> Result<MatchResult, ApiError> {
    let records = FaqRepo::new(state.store.as_ref()).records()?;
    Ok(FaqIndex::from_records(records).respond(query, policy))
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "shopdesk-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// System information endpoint.
pub async fn system_info(State(state): State<Arc<AppState>>) -> ApiResult {
    let store = state.store.as_ref();
    Ok(Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "platform": format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "store": store.name(),
        "faq": {
            "entries": FaqRepo::new(store).count()?,
            "ask": {"threshold": state.ask_policy.threshold, "scorer": state.ask_policy.scorer},
            "chat": {"threshold": state.chat_policy.threshold, "scorer": state.chat_policy.scorer},
        },
        "products": ProductRepo::new(store).count()?,
    })))
}

// ── FAQ ──────────────────────────────

/// Answer a question with the `ask` profile.
pub async fn faq_ask(State(state): State<Arc<AppState>>, ApiJson(req): ApiJson<QueryRequest>) -> ApiResult {
    let result = answer(&state, &req.query, &state.ask_policy)?;
    Ok(Json(serde_json::to_value(result).map_err(ShopDeskError::from)?))
}

/// Chatbot endpoint: `chat` profile, echoes the query back.
pub async fn faq_chat(State(state): State<Arc<AppState>>, ApiJson(req): ApiJson<QueryRequest>) -> ApiResult {
    let result = answer(&state, &req.query, &state.chat_policy)?;
    if result.matched {
        tracing::info!("💬 chat hit (score={:.1})", result.score);
    }
    Ok(Json(json!({
        "query": req.query,
        "answer": result.answer,
        "matched": result.matched,
        "score": result.score,
    })))
}

pub async fn faq_list(State(state): State<Arc<AppState>>) -> ApiResult {
    let docs = FaqRepo::new(state.store.as_ref()).documents()?;
    let faq: Vec<_> = docs.iter().map(document_json).collect();
    Ok(Json(json!({"ok": true, "total": faq.len(), "faq": faq})))
}

pub async fn faq_add(State(state): State<Arc<AppState>>, ApiJson(entry): ApiJson<FaqEntry>) -> ApiResult {
    let id = FaqRepo::new(state.store.as_ref()).add(&entry)?;
    tracing::info!("📝 FAQ entry added: {}", entry.question);
    Ok(Json(json!({"ok": true, "id": id})))
}

/// Append the built-in sample FAQ set.
pub async fn faq_seed(State(state): State<Arc<AppState>>) -> ApiResult {
    let added = FaqRepo::new(state.store.as_ref()).seed(&sample_faq())?;
    Ok(Json(json!({"ok": true, "added": added})))
}

pub async fn faq_delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult {
    FaqRepo::new(state.store.as_ref()).delete(&id)?;
    Ok(Json(json!({"ok": true})))
}

// ── Products ──────────────────────────────

pub async fn product_list(State(state): State<Arc<AppState>>) -> ApiResult {
    let products = ProductRepo::new(state.store.as_ref()).list()?;
    Ok(Json(json!({"ok": true, "total": products.len(), "products": products})))
}

pub async fn product_create(
    State(state): State<Arc<AppState>>,
    ApiJson(product): ApiJson<Product>,
) -> ApiResult {
    let stored = ProductRepo::new(state.store.as_ref()).create(&product)?;
    tracing::info!("🛒 Product created: {} ({})", stored.item.name, stored.id);
    Ok(Json(json!({"ok": true, "product": stored})))
}

pub async fn product_get(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult {
    let stored = ProductRepo::new(state.store.as_ref()).get(&id)?;
    Ok(Json(json!({"ok": true, "product": stored})))
}

pub async fn product_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(product): ApiJson<Product>,
) -> ApiResult {
    let stored = ProductRepo::new(state.store.as_ref()).update(&id, &product)?;
    Ok(Json(json!({"ok": true, "product": stored})))
}

pub async fn product_delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult {
    ProductRepo::new(state.store.as_ref()).delete(&id)?;
    tracing::info!("🗑️ Product deleted: {id}");
    Ok(Json(json!({"ok": true})))
}

/// Price extremes and average over the catalog.
pub async fn product_stats(State(state): State<Arc<AppState>>) -> ApiResult {
    let docs = ProductRepo::new(state.store.as_ref()).documents()?;
    let stats = price_stats(&docs).map_err(|e| match e {
        StatsError::Empty => ApiError::from(ShopDeskError::NotFound("no products found".into())),
        StatsError::MissingFields => ApiError::MissingProductFields,
    })?;
    Ok(Json(serde_json::to_value(stats).map_err(ShopDeskError::from)?))
}

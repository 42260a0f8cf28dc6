//! HTTP server implementation using Axum.

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use shopdesk_core::config::ShopDeskConfig;
use shopdesk_core::error::Result;
use shopdesk_core::traits::store::DocumentStore;
use shopdesk_faq::MatchPolicy;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Env var with comma-separated origins; overrides `gateway.cors_origins`.
pub const CORS_ENV: &str = "SHOPDESK_CORS_ORIGINS";

/// Shared state for the gateway server.
pub struct AppState {
    pub config: ShopDeskConfig,
    /// Injected document store; handlers never open their own.
    pub store: Arc<dyn DocumentStore>,
    /// Policy for `/api/v1/faq/ask`.
    pub ask_policy: MatchPolicy,
    /// Policy for `/api/v1/faq/chat`.
    pub chat_policy: MatchPolicy,
    pub start_time: Instant,
}

impl AppState {
    /// Build state, resolving both FAQ profiles from the config.
    pub fn new(config: ShopDeskConfig, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let ask_policy = MatchPolicy::from_profile(&config.faq.ask)?;
        let chat_policy = MatchPolicy::from_profile(&config.faq.chat)?;
        Ok(Self {
            config,
            store,
            ask_policy,
            chat_policy,
            start_time: Instant::now(),
        })
    }
}

fn cors_layer(configured: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let origins: Vec<String> = match std::env::var(CORS_ENV) {
        Ok(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        Err(_) => configured.to_vec(),
    };

    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid CORS origin {o:?}");
                None
            }
        })
        .collect();
    cors.allow_origin(parsed)
}

/// Build the Axum router with all routes.
pub fn build_router(shared: Arc<AppState>) -> Router {
    use super::routes;

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/v1/info", get(routes::system_info))
        // FAQ
        .route("/api/v1/faq/ask", post(routes::faq_ask))
        .route("/api/v1/faq/chat", post(routes::faq_chat))
        .route("/api/v1/faq/seed", post(routes::faq_seed))
        .route("/api/v1/faq", get(routes::faq_list).post(routes::faq_add))
        .route("/api/v1/faq/{id}", axum::routing::delete(routes::faq_delete))
        // Products
        .route("/api/v1/products/stats", get(routes::product_stats))
        .route(
            "/api/v1/products",
            get(routes::product_list).post(routes::product_create),
        )
        .route(
            "/api/v1/products/{id}",
            get(routes::product_get)
                .put(routes::product_update)
                .delete(routes::product_delete),
        )
        .layer(cors_layer(&shared.config.gateway.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// Start the HTTP server and serve until Ctrl+C or SIGTERM.
pub async fn start(config: ShopDeskConfig, store: Arc<dyn DocumentStore>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = AppState::new(config, store)?;
    tracing::info!(
        "🎯 FAQ thresholds: ask={} ({}), chat={} ({})",
        state.ask_policy.threshold,
        state.ask_policy.scorer,
        state.chat_policy.threshold,
        state.chat_policy.scorer
    );
    tracing::info!("🗄️ Store backend: {}", state.store.name());

    let app = build_router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Gateway listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use shopdesk_store::MemoryStore;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(ShopDeskConfig::default(), Arc::new(MemoryStore::new())).unwrap();
        build_router(Arc::new(state))
    }

    #[tokio::test]
    async fn test_health_route() {
        let resp = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_route_wins_over_id() {
        let resp = app()
            .oneshot(
                Request::get("/api/v1/products/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        // empty collection: the stats handler answers, not the by-id lookup
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Not found: no products found");
    }

    #[tokio::test]
    async fn test_ask_route_roundtrip() {
        let resp = app()
            .oneshot(
                Request::post("/api/v1/faq/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query":"refund policy"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["matched"], false);
    }

    async fn post_json(uri: &str, body: &'static str) -> (StatusCode, serde_json::Value) {
        let resp = app()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_error_envelope() {
        // missing price
        let (status, body) = post_json("/api/v1/products", r#"{"name":"Pen"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Malformed payload"));

        // missing query
        let (status, body) = post_json("/api/v1/faq/ask", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);

        // not JSON at all
        let (status, body) = post_json("/api/v1/faq", "question=hi").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
    }

    #[test]
    fn test_state_rejects_unknown_scorer() {
        let mut config = ShopDeskConfig::default();
        config.faq.chat.scorer = "soundex".into();
        assert!(AppState::new(config, Arc::new(MemoryStore::new())).is_err());
    }
}

//! Router assembly and shared API state.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use callscope_blocklist::BlocklistManager;
use callscope_ledger::CallLedger;
use callscope_scan::{Reconciler, ScanClient};
use callscope_store::{BlocklistStore, CallStore};
use callscope_websocket::TrafficHub;

use crate::handlers;
use crate::metrics::ApiMetrics;

/// Everything the API requires of a storage engine.
pub trait ApiStore: CallStore + BlocklistStore + Send + Sync + 'static {}

impl<T: CallStore + BlocklistStore + Send + Sync + 'static> ApiStore for T {}

/// Shared state behind every handler: the core engines, all borrowing the
/// same store, plus the broadcast hub and the metrics registry.
pub struct ApiState<S> {
    pub store: Arc<S>,
    pub ledger: CallLedger<S>,
    pub blocklist: BlocklistManager<S>,
    pub reconciler: Reconciler<S>,
    pub hub: Arc<TrafficHub>,
    pub metrics: Arc<ApiMetrics>,
}

impl<S> ApiState<S> {
    pub fn new(
        store: Arc<S>,
        scan: ScanClient,
        hub: Arc<TrafficHub>,
        metrics: Arc<ApiMetrics>,
    ) -> Self {
        Self {
            ledger: CallLedger::new(store.clone()),
            blocklist: BlocklistManager::new(store.clone()),
            reconciler: Reconciler::new(store.clone(), scan),
            store,
            hub,
            metrics,
        }
    }
}

/// Build the HTTP API router. CORS is wide open, matching the service's
/// public read-mostly posture.
pub fn router<S: ApiStore>(state: Arc<ApiState<S>>) -> Router {
    let api: Router<Arc<ApiState<S>>> = Router::new()
        .route("/", get(handlers::service_info))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/stats/latency", get(handlers::get_average_latency))
        .route(
            "/api/traffic",
            get(handlers::get_traffic).post(handlers::add_call),
        )
        .route("/api/traffic/:id/confirm", post(handlers::confirm_call))
        .route(
            "/api/blocked",
            get(handlers::list_blocked).post(handlers::block_address),
        )
        .route(
            "/api/blocked/:address",
            get(handlers::get_blocked_address).delete(handlers::unblock_address),
        )
        .route("/api/blocked/:address/exists", get(handlers::blocked_exists))
        .route("/api/wallet/:address/history", get(handlers::wallet_history))
        .route("/api/wallet/:address/sync", get(handlers::sync_wallet));

    api.layer(CorsLayer::permissive()).with_state(state)
}

/// Build the `/metrics` router. Kept separate so the node can leave it
/// unmounted when metrics are disabled.
pub fn metrics_router<S: ApiStore>(state: Arc<ApiState<S>>) -> Router {
    let router: Router<Arc<ApiState<S>>> =
        Router::new().route("/metrics", get(handlers::export_metrics));
    router.with_state(state)
}

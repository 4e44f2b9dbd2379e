//! API request handlers.
//!
//! Thin layer over the core engines: decode the request, call the engine,
//! map errors onto [`ApiError`], serialize the result. Wall-clock reads
//! happen here so the engines stay clock-free.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use callscope_blocklist::BlockOutcome;
use callscope_ledger::TrafficStats;
use callscope_types::{Address, BlockedAddress, CallId, ContractCall, Timestamp};
use callscope_websocket::TrafficEvent;

use crate::error::ApiError;
use crate::server::{ApiState, ApiStore};

// ── Service ──────────────────────────────────────────────────────────────

/// GET `/` - service banner.
pub(crate) async fn service_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "callscope",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ── Stats ────────────────────────────────────────────────────────────────

/// GET `/api/stats` - ledger-wide counters.
pub(crate) async fn get_stats<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
) -> Result<Json<TrafficStats>, ApiError> {
    Ok(Json(state.ledger.stats()?))
}

/// GET `/api/stats/latency` - mean confirmation latency as a bare float.
pub(crate) async fn get_average_latency<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
) -> Result<Json<f64>, ApiError> {
    Ok(Json(state.ledger.average_latency_ms()?))
}

// ── Traffic ──────────────────────────────────────────────────────────────

/// Body for `POST /api/traffic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCallRequest {
    pub from: String,
    pub to: String,
    /// Optional; a blank method is recorded as `"unknown"`.
    #[serde(default)]
    pub method: String,
}

/// Query parameters shared by the list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// GET `/api/traffic` - most recent calls, newest first.
pub(crate) async fn get_traffic<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ContractCall>>, ApiError> {
    Ok(Json(state.ledger.recent_traffic(query.limit)?))
}

/// POST `/api/traffic` - record a pending call and broadcast it.
pub(crate) async fn add_call<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
    Json(request): Json<CreateCallRequest>,
) -> Result<(StatusCode, Json<ContractCall>), ApiError> {
    let call = state.ledger.create(
        Address::from(request.from),
        Address::from(request.to),
        request.method,
        Timestamp::now(),
    )?;
    state.metrics.calls_ingested.inc();

    // Observer delivery is best-effort; a failed send never fails the POST.
    let delivered = state
        .hub
        .broadcast(&TrafficEvent::NewCall(call.clone()))
        .await;
    debug!(call = %call.id, observers = delivered, "call recorded and broadcast");

    Ok((StatusCode::CREATED, Json(call)))
}

/// POST `/api/traffic/:id/confirm` - mark a call confirmed.
pub(crate) async fn confirm_call<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
    Path(id): Path<u64>,
) -> Result<Json<ContractCall>, ApiError> {
    let call = state.ledger.confirm(CallId::new(id), Timestamp::now())?;
    state.metrics.calls_confirmed.inc();
    Ok(Json(call))
}

// ── Blocklist ────────────────────────────────────────────────────────────

/// Body for `POST /api/blocked`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRequest {
    pub address: String,
}

/// Body for `DELETE /api/blocked/:address` responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

/// GET `/api/blocked` - all blocked addresses in insertion order.
pub(crate) async fn list_blocked<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
) -> Result<Json<Vec<BlockedAddress>>, ApiError> {
    Ok(Json(state.blocklist.list_all()?))
}

/// GET `/api/blocked/:address` - the row for one address, or 404.
pub(crate) async fn get_blocked_address<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
    Path(address): Path<String>,
) -> Result<Json<BlockedAddress>, ApiError> {
    let record = state
        .blocklist
        .get(&Address::from(address.as_str()))?
        .ok_or_else(|| ApiError::NotFound(format!("address {address} is not blocked")))?;
    Ok(Json(record))
}

/// GET `/api/blocked/:address/exists` - membership test as a bare bool.
pub(crate) async fn blocked_exists<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
    Path(address): Path<String>,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(state.blocklist.is_blocked(&Address::from(address))?))
}

/// POST `/api/blocked` - block an address; `created: false` when it
/// already was.
pub(crate) async fn block_address<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
    Json(request): Json<BlockRequest>,
) -> Result<Json<BlockOutcome>, ApiError> {
    let outcome = state.blocklist.block(&Address::from(request.address))?;
    if outcome.created {
        info!(wallet = %outcome.record.address, "address blocked");
    }
    Ok(Json(outcome))
}

/// DELETE `/api/blocked/:address` - unblock; absence reports
/// `removed: false` rather than an error.
pub(crate) async fn unblock_address<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
    Path(address): Path<String>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let removed = state.blocklist.unblock(&Address::from(address.as_str()))?;
    if removed {
        info!(wallet = %address, "address unblocked");
    }
    Ok(Json(RemovedResponse { removed }))
}

// ── Wallet ───────────────────────────────────────────────────────────────

/// GET `/api/wallet/:address/history` - calls involving the address.
pub(crate) async fn wallet_history<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
    Path(address): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ContractCall>>, ApiError> {
    let history = state
        .ledger
        .wallet_history(&Address::from(address), query.limit)?;
    Ok(Json(history))
}

/// GET `/api/wallet/:address/sync` - reconcile against the external
/// provider, then return the wallet's outbound calls. Provider failures
/// degrade to an empty merge, never an error.
pub(crate) async fn sync_wallet<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<ContractCall>>, ApiError> {
    let address = Address::from(address);
    state.metrics.wallet_syncs.inc();
    state.reconciler.sync_wallet(&address).await?;
    Ok(Json(state.ledger.wallet_outbound(&address)?))
}

// ── Metrics ──────────────────────────────────────────────────────────────

/// GET `/metrics` - Prometheus text exposition. Gauges are refreshed from
/// the store at scrape time.
pub(crate) async fn export_metrics<S: ApiStore>(
    State(state): State<Arc<ApiState<S>>>,
) -> Result<String, ApiError> {
    state.metrics.call_count.set(state.store.count_calls()? as i64);
    state
        .metrics
        .blocked_count
        .set(state.store.count_blocked()? as i64);
    state
        .metrics
        .observer_count
        .set(state.hub.observer_count().await as i64);
    state
        .metrics
        .render()
        .map_err(|err| ApiError::Internal(err.to_string()))
}

//! HTTP API for the callscope tracker.
//!
//! Exposes the call ledger, blocklist, and wallet reconciliation over JSON
//! endpoints, plus an optional Prometheus `/metrics` endpoint. The
//! WebSocket observer endpoint lives in `callscope-websocket`; the node
//! merges both routers.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;

pub use error::ApiError;
pub use handlers::{BlockRequest, CreateCallRequest, LimitQuery, RemovedResponse};
pub use metrics::ApiMetrics;
pub use server::{metrics_router, router, ApiState, ApiStore};

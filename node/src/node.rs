//! The callscope node — wires store, engines, and servers together.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::signal;
use tracing::info;

use callscope_rpc::{ApiMetrics, ApiState};
use callscope_scan::ScanClient;
use callscope_store_memory::MemoryStore;
use callscope_websocket::TrafficHub;

use crate::config::NodeConfig;
use crate::error::NodeError;

/// A running callscope node: one store, one broadcast hub, one listener
/// serving both the JSON API and the observer WebSocket.
pub struct CallscopeNode {
    pub config: NodeConfig,
    pub store: Arc<MemoryStore>,
    pub hub: Arc<TrafficHub>,
}

impl CallscopeNode {
    pub fn new(config: NodeConfig) -> Self {
        let hub = Arc::new(TrafficHub::new(config.observer_buffer));
        Self {
            config,
            store: Arc::new(MemoryStore::new()),
            hub,
        }
    }

    /// Assemble the shared API state from the configuration.
    pub fn api_state(&self) -> Arc<ApiState<MemoryStore>> {
        let scan =
            ScanClient::with_url(&self.config.scan_base_url, self.config.scan_api_key.clone())
                .with_timeout(Duration::from_secs(self.config.scan_timeout_secs));
        Arc::new(ApiState::new(
            self.store.clone(),
            scan,
            self.hub.clone(),
            Arc::new(ApiMetrics::new()),
        ))
    }

    /// Build the full router: JSON API plus the WebSocket endpoint, with
    /// `/metrics` mounted only when enabled.
    pub fn router(&self) -> Router {
        let state = self.api_state();
        let mut app = callscope_rpc::router(state.clone())
            .merge(callscope_websocket::server::router(self.hub.clone()));
        if self.config.enable_metrics {
            app = app.merge(callscope_rpc::metrics_router(state));
        }
        app
    }

    /// Bind the configured port and serve until SIGINT/SIGTERM.
    pub async fn start(&self) -> Result<(), NodeError> {
        let app = self.router();
        let addr = format!("0.0.0.0:{}", self.config.api_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(%addr, metrics = self.config.enable_metrics, "callscope node listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("callscope node stopped");
        Ok(())
    }
}

/// Resolves once SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { info!("received SIGINT, shutting down"); }
        _ = terminate => { info!("received SIGTERM, shutting down"); }
    }
}

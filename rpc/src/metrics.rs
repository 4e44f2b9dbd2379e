//! Prometheus metrics for the API surface.
//!
//! [`ApiMetrics`] owns a dedicated [`Registry`] that the `/metrics`
//! endpoint renders into the text exposition format. Counters are bumped
//! by handlers as requests land; gauges are refreshed from the store at
//! scrape time.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

/// Central collection of API-level Prometheus metrics.
pub struct ApiMetrics {
    /// The registry that owns every metric below.
    pub registry: Registry,

    /// Total calls ingested through `POST /api/traffic`.
    pub calls_ingested: IntCounter,
    /// Total calls confirmed through the confirm endpoint.
    pub calls_confirmed: IntCounter,
    /// Total wallet reconciliations triggered.
    pub wallet_syncs: IntCounter,

    /// Current number of call rows in the store.
    pub call_count: IntGauge,
    /// Current number of blocked addresses.
    pub blocked_count: IntGauge,
    /// Current number of connected traffic observers.
    pub observer_count: IntGauge,
}

impl ApiMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let calls_ingested = register_int_counter_with_registry!(
            Opts::new(
                "callscope_calls_ingested_total",
                "Total contract calls ingested"
            ),
            registry
        )
        .expect("failed to register calls_ingested counter");

        let calls_confirmed = register_int_counter_with_registry!(
            Opts::new(
                "callscope_calls_confirmed_total",
                "Total contract calls confirmed"
            ),
            registry
        )
        .expect("failed to register calls_confirmed counter");

        let wallet_syncs = register_int_counter_with_registry!(
            Opts::new(
                "callscope_wallet_syncs_total",
                "Total wallet reconciliations triggered"
            ),
            registry
        )
        .expect("failed to register wallet_syncs counter");

        let call_count = register_int_gauge_with_registry!(
            Opts::new("callscope_call_count", "Current number of call records"),
            registry
        )
        .expect("failed to register call_count gauge");

        let blocked_count = register_int_gauge_with_registry!(
            Opts::new(
                "callscope_blocked_count",
                "Current number of blocked addresses"
            ),
            registry
        )
        .expect("failed to register blocked_count gauge");

        let observer_count = register_int_gauge_with_registry!(
            Opts::new(
                "callscope_observer_count",
                "Current number of connected traffic observers"
            ),
            registry
        )
        .expect("failed to register observer_count gauge");

        Self {
            registry,
            calls_ingested,
            calls_confirmed,
            wallet_syncs,
            call_count,
            blocked_count,
            observer_count,
        }
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

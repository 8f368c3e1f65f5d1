//! Prometheus exporter for the cache and invalidation counters.

use axum::{routing::get, Router};
use ledger_config::ObservabilityConfig;
use ledger_core::{LedgerError, LedgerResult};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Installs the global Prometheus recorder when metrics are enabled.
pub fn install_recorder(config: &ObservabilityConfig) -> LedgerResult<Option<PrometheusHandle>> {
    if !config.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| LedgerError::Configuration(format!("Failed to install metrics recorder: {e}")))?;
    ledger_service::metrics::register_metrics();

    info!("Prometheus recorder installed");
    Ok(Some(handle))
}

/// Serves the rendered metrics at `path`.
pub fn metrics_router(handle: PrometheusHandle, path: &str) -> Router {
    Router::new().route(path, get(move || async move { handle.render() }))
}

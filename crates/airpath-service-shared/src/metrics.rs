//! Prometheus metrics for airpath services.
//!
//! [`init_metrics`] installs the global recorder once at startup and
//! [`metrics_handler`] renders it for scraping. The `record_*` helpers cover
//! the path business metrics:
//!
//! - `airpath_paths_calculated_total{algorithm, service}`
//! - `airpath_paths_failed_total{reason, service}`
//! - `airpath_path_stops{algorithm}` (histogram)
//!
//! ```no_run
//! use airpath_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//! use axum::{routing::get, Router};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialise metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

const DEFAULT_PATH: &str = "/metrics";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route the exposition endpoint is mounted on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: DEFAULT_PATH.to_string(),
        }
    }
}

impl MetricsConfig {
    /// Read `METRICS_ENABLED` (anything but `false` enables) and `METRICS_PATH`.
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|value| !value.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let path = std::env::var("METRICS_PATH")
            .ok()
            .filter(|path| path.starts_with('/'))
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        Self { enabled, path }
    }
}

/// Install the Prometheus recorder.
///
/// # Errors
///
/// Fails when metrics are disabled, when a recorder is already installed, or
/// when the exporter cannot be built.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Prometheus exposition text, or a comment line when no recorder is installed.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_else(|| "# metrics not initialised\n".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialised"),
            MetricsError::InstallFailed(e) => write!(f, "failed to install metrics recorder: {e}"),
        }
    }
}

impl std::error::Error for MetricsError {}

/// Count a successful path computation.
pub fn record_path_calculated(algorithm: &str, service: &str) {
    metrics::counter!(
        "airpath_paths_calculated_total",
        "algorithm" => algorithm.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Count a failed path computation. `reason` is an [`airpath_lib::Error::reason`]
/// label such as `unknown_airport` or `no_path`.
pub fn record_path_failed(reason: &str, service: &str) {
    metrics::counter!(
        "airpath_paths_failed_total",
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record how many legs a returned path has.
pub fn record_path_stops(stops: usize, algorithm: &str) {
    metrics::histogram!(
        "airpath_path_stops",
        "algorithm" => algorithm.to_string()
    )
    .record(stops as f64);
}

//! Request and cache metrics.
//!
//! Metrics are recorded through the `metrics` facade, so they cost nothing
//! until a recorder is installed. [`init_metrics`] installs the Prometheus
//! exporter with its own HTTP listener.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `heron_requests_total` | Counter | `operation`, `status` |
//! | `heron_request_duration_seconds` | Histogram | `operation` |
//! | `heron_cache_lookups_total` | Counter | `result` |

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Counter of completed requests.
pub const REQUESTS_TOTAL: &str = "heron_requests_total";
/// Histogram of request latency.
pub const REQUEST_DURATION_SECONDS: &str = "heron_request_duration_seconds";
/// Counter of cache gate lookups.
pub const CACHE_LOOKUPS_TOTAL: &str = "heron_cache_lookups_total";

/// Operation label used when no route matched.
pub const UNMATCHED_OPERATION: &str = "unmatched";

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether the Prometheus exporter is installed.
    pub enabled: bool,

    /// Address the exporter listens on (e.g., "0.0.0.0:9090").
    pub addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Installs the Prometheus exporter.
///
/// Must be called from inside a Tokio runtime: the exporter's listener is
/// spawned onto it.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidAddress` for an unparseable address and
/// `TelemetryError::MetricsInit` if the recorder cannot be installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    register_metric_descriptions();
    tracing::info!(metrics.addr = %addr, "prometheus exporter listening");
    Ok(())
}

fn register_metric_descriptions() {
    describe_counter!(REQUESTS_TOTAL, "Total number of requests handled");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Request duration from receipt to response"
    );
    describe_counter!(CACHE_LOOKUPS_TOTAL, "Cache gate lookups by result");
}

/// Records a completed request.
pub fn record_request(operation: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(
        REQUEST_DURATION_SECONDS,
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a cache gate lookup.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!(CACHE_LOOKUPS_TOTAL, "result" => result).increment(1);
}

//! Telemetry initialization: metrics and structured logging

pub mod metrics;

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise logging and, when enabled, the Prometheus recorder.
///
/// Returns `Some(PrometheusHandle)` when metrics are enabled so the embedding
/// application can render them on its own endpoint.
pub fn init(config: &TelemetryConfig) -> Option<PrometheusHandle> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "donor_core=info".into());

    let prometheus_handle = if config.metrics_enabled {
        match metrics::install_prometheus_recorder() {
            Ok(handle) => {
                metrics::describe_metrics();
                Some(handle)
            }
            Err(err) => {
                eprintln!("ERROR: Failed to install Prometheus recorder: {}", err);
                None
            }
        }
    } else {
        None
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    // try_init: the embedding application may already own the global subscriber.
    let result = if config.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(err) = result {
        eprintln!("WARN: tracing subscriber already installed: {}", err);
    }

    prometheus_handle
}

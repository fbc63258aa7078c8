//! Telemetry initialization: structured logging, tracing export, error
//! reporting and metrics.

pub mod metrics;
pub mod tracing_setup;

use crate::config::TelemetryConfig;
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "task_manager=info,tower_http=info,sqlx=warn";

/// Keeps exporters alive; flushes them when dropped.
pub struct TelemetryGuard {
    prometheus_handle: Option<PrometheusHandle>,
    otel_provider: Option<SdkTracerProvider>,
    _sentry_guard: Option<sentry::ClientInitGuard>,
}

impl TelemetryGuard {
    /// Handle for rendering `/metrics`, when metrics are enabled
    pub fn prometheus_handle(&self) -> Option<PrometheusHandle> {
        self.prometheus_handle.clone()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.otel_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down OpenTelemetry provider: {e}");
            }
        }
    }
}

/// Initialise the full telemetry stack. Call once, first thing in `main`.
pub fn init(config: &TelemetryConfig) -> Result<TelemetryGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // Sentry must be initialised before the subscriber so the layer has a hub
    let sentry_guard = tracing_setup::init_sentry(config);
    let otel_provider = tracing_setup::init_otel_provider(config);

    let prometheus_handle = if config.metrics_enabled {
        let handle = metrics::install_prometheus_recorder()?;
        metrics::describe_metrics();
        Some(handle)
    } else {
        None
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true);
        let otel_layer = tracing_setup::otel_layer(otel_provider.as_ref(), &config.service_name);
        let sentry_layer = sentry_guard.as_ref().map(|_| sentry_tracing::layer());
        registry
            .with(fmt_layer)
            .with(otel_layer)
            .with(sentry_layer)
            .try_init()?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let otel_layer = tracing_setup::otel_layer(otel_provider.as_ref(), &config.service_name);
        let sentry_layer = sentry_guard.as_ref().map(|_| sentry_tracing::layer());
        registry
            .with(fmt_layer)
            .with(otel_layer)
            .with(sentry_layer)
            .try_init()?;
    }

    if sentry_guard.is_some() {
        tracing::info!(environment = %config.environment, "Sentry error reporting enabled");
    }
    if otel_provider.is_some() {
        tracing::info!("OpenTelemetry trace export enabled");
    }

    Ok(TelemetryGuard {
        prometheus_handle,
        otel_provider,
        _sentry_guard: sentry_guard,
    })
}

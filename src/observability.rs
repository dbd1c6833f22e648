//! Observability module for logging and metrics setup.
//!
//! This module provides:
//! - Structured logging with configurable level and format
//! - Prometheus metrics recorder installation
//! - Metrics recording helpers for source loads, search and resolution

use std::time::Duration;

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::prelude::*;

use crate::observability_config::{LogFormat, ObservabilityConfig};

/// Initialize logging and, when enabled, metrics.
///
/// Returns the Prometheus handle so the caller can render metrics.
pub fn init_observability_with_config(config: &ObservabilityConfig) -> Result<Option<PrometheusHandle>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(config)?;

    let handle = if config.enable_metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        metrics = config.enable_metrics,
        "Observability initialized"
    );
    Ok(handle)
}

/// Initialize structured logging with tracing and configuration
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("recipe_viewer={}", config.log_level.to_lowercase()).parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?);

    match config.effective_log_format() {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_thread_names(false),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_thread_names(true),
                )
                .try_init()?;
        }
    }
    Ok(())
}

/// Install the global Prometheus recorder
fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    Ok(handle)
}

pub fn record_source_load_metrics(source: &str, success: bool) {
    metrics::counter!(
        "source_loads_total",
        "source" => source.to_string(),
        "result" => if success { "success" } else { "failure" }
    )
    .increment(1);
}

pub fn record_snapshot_refresh_metrics(duration: Duration) {
    metrics::counter!("snapshot_refreshes_total").increment(1);
    metrics::histogram!("snapshot_refresh_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_search_metrics(with_keyword: bool, results: usize, duration: Duration) {
    metrics::counter!(
        "search_queries_total",
        "keyword" => if with_keyword { "yes" } else { "no" }
    )
    .increment(1);
    metrics::histogram!("search_results_count").record(results as f64);
    metrics::histogram!("search_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_resolution_metrics(kind: &'static str) {
    metrics::counter!("ingredient_resolutions_total", "kind" => kind).increment(1);
}

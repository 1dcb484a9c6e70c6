//! Tracing and metrics setup
//!
//! Counters are recorded through the `metrics` facade and rendered by the
//! Prometheus exporter at `/metrics`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

pub const ENTRIES_LOGGED: &str = "gym_freak_entries_logged_total";
pub const AI_FALLBACKS: &str = "gym_freak_ai_fallback_total";
pub const MET_LOOKUPS: &str = "gym_freak_met_lookup_total";

/// Initialize tracing/logging
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "gym_freak_backend=info,tower_http=info".into()
        } else {
            "gym_freak_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

/// Install the global Prometheus recorder. Only the first call in a process succeeds.
pub fn install_metrics_recorder() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))
}

/// Count a persisted log entry (`food`, `workout`, `water`)
pub fn record_entry_logged(kind: &'static str) {
    metrics::counter!(ENTRIES_LOGGED, "kind" => kind).increment(1);
}

/// Count an AI feature answered from static text
pub fn record_ai_fallback(feature: &'static str) {
    metrics::counter!(AI_FALLBACKS, "feature" => feature).increment(1);
}

/// Count a catalog MET lookup by outcome (`found`, `not_found`, `failed`, `skipped`)
pub fn record_met_lookup(outcome: &'static str) {
    metrics::counter!(MET_LOOKUPS, "outcome" => outcome).increment(1);
}

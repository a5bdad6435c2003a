use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::listing::{
    METRIC_LIST_CACHE_HIT, METRIC_LIST_CACHE_MISS, METRIC_LIST_QUERY_MS,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register metric descriptions with whichever recorder is installed.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_LIST_CACHE_HIT,
            Unit::Count,
            "Total number of list requests served from the cache."
        );
        describe_counter!(
            METRIC_LIST_CACHE_MISS,
            Unit::Count,
            "Total number of list requests that queried the store."
        );
        describe_histogram!(
            METRIC_LIST_QUERY_MS,
            Unit::Milliseconds,
            "Store query latency on cache misses in milliseconds."
        );
    });
}

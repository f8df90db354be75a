//! Logging utilities for parley.
//!
//! Provides structured logging with a per-exchange `request_id` span.
//!
//! # Noise Filtering
//!
//! By default, noisy library modules (hyper, reqwest, h2, rustls, tower_http)
//! are set to `warn` level to reduce log clutter while keeping business logs
//! at the specified level.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default noisy modules that should be filtered to warn level.
pub const NOISY_MODULES: &[&str] = &[
    "hyper",
    "hyper_util",
    "reqwest",
    "h2",
    "rustls",
    "tokio_util",
    "tower_http",
];

/// Build the filter directives string for a base level.
fn build_directives(log_level: &str) -> String {
    let mut directives = String::from(log_level);

    for module in NOISY_MODULES {
        directives.push_str(&format!(",{}=warn", module));
    }

    directives
}

/// Build the default EnvFilter with noise suppression.
///
/// `RUST_LOG` wins when set.
fn build_filter(log_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(build_directives(log_level))
}

/// Install the global subscriber described by `config`.
///
/// The json format flattens event fields and attaches the enclosing
/// [`request_span`], so every line of one chat exchange carries its
/// `request_id`. Only the first call installs anything.
pub fn init_logging(config: &ObservabilityConfig) {
    let registry = tracing_subscriber::registry().with(build_filter(&config.log_level));

    let installed = if config.log_format == "json" {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_ansi(true).with_target(false))
            .try_init()
    };

    if installed.is_ok() {
        tracing::info!(
            log_level = %config.log_level,
            log_format = %config.log_format,
            "Logging initialized"
        );
    }
}

/// Generate a new request ID for tracing a single chat exchange.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Span covering one chat exchange.
pub fn request_span(request_id: &str) -> tracing::Span {
    tracing::info_span!("exchange", request_id = %request_id)
}

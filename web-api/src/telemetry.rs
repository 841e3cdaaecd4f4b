use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tracking_core::Environment;

use crate::settings::LogLevel;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the configured level.
pub fn init_tracer(log_level: LogLevel, environment: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_ref()));

    let registry = tracing_subscriber::registry().with(filter);

    match environment {
        Environment::Production | Environment::Development => registry
            .with(fmt::layer().json().with_current_span(true))
            .init(),
        Environment::Local | Environment::Test => registry.with(fmt::layer()).init(),
    }
}

//! Observability
//!
//! Structured logging through `tracing`:
//! - `init_tracing` installs the global subscriber (text or JSON lines)
//! - lifecycle events are typed `Event`s with stable names
//! - request spans come from `tower_http::trace::TraceLayer` in the router

mod events;

pub use events::Event;

use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            ObservabilityError::InvalidFilter {
                filter: config.filter.clone(),
                reason: e.to_string(),
            }
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    installed.map_err(|e| ObservabilityError::Install(e.to_string()))
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let details = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");

    if event.is_fatal() {
        error!(event = event.as_str(), %details, "lifecycle");
    } else {
        info!(event = event.as_str(), %details, "lifecycle");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            filter: "bookstore=loudest".to_string(),
            format: LogFormat::Text,
        };
        assert!(matches!(
            init_tracing(&config),
            Err(ObservabilityError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_log_event() {
        // No subscriber installed; must not panic
        log_event(Event::ServerStarting);
        log_event_with_fields(Event::ConfigLoaded, &[("path", "/tmp/bookstore.json")]);
    }
}

//! Lifecycle events
//!
//! Events are explicit and typed; their names are stable log keys.

use std::fmt;

/// Observable service lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Default configuration written to disk
    ConfigWritten,

    // Server lifecycle
    /// Router built, about to bind
    ServerStarting,
    /// Listener bound, accepting requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// All connections drained
    ShutdownComplete,
    /// Server stopped on an error
    ServerFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigWritten => "CONFIG_WRITTEN",
            Event::ServerStarting => "SERVER_STARTING",
            Event::Serving => "SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::ServerFailed => "SERVER_FAILED",
        }
    }

    /// Whether the event ends the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ServerFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        for event in [
            Event::ConfigLoaded,
            Event::ConfigWritten,
            Event::ServerStarting,
            Event::Serving,
            Event::ShutdownStart,
            Event::ShutdownComplete,
            Event::ServerFailed,
        ] {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
            assert_eq!(event.to_string(), name);
        }
    }

    #[test]
    fn test_only_failure_is_fatal() {
        assert!(Event::ServerFailed.is_fatal());
        assert!(!Event::ShutdownComplete.is_fatal());
    }
}

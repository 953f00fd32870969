//! Observability subsystem for tablegate
//!
//! - Structured logging through `tracing` (compact text or JSON lines)
//! - Typed lifecycle events
//! - Begin/complete scopes around gateway operations
//!
//! # Usage
//!
//! ```ignore
//! use tablegate::observability::{log_event, Event, ObservationScope};
//!
//! log_event(Event::BootStart);
//!
//! let scope = ObservationScope::with_table("DROP_TABLE", "orders");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{build_env_filter, init_logging, LogFormat, LoggingError};
pub use scope::ObservationScope;

use std::fmt;

/// `key=value` pairs rendered alphabetically, so identical events produce
/// identical lines
struct Fields<'a>(&'a [(&'a str, &'a str)]);

impl fmt::Display for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted: Vec<_> = self.0.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);
        for (i, (key, value)) in sorted.into_iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    if event.is_fatal() {
        tracing::error!(event = event.as_str());
    } else {
        tracing::info!(event = event.as_str());
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let fields = Fields(fields);
    if event.is_fatal() {
        tracing::error!(event = event.as_str(), %fields);
    } else {
        tracing::info!(event = event.as_str(), %fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_render_sorted() {
        let fields = [("port", "8000"), ("host", "0.0.0.0")];
        assert_eq!(Fields(&fields).to_string(), "host=0.0.0.0 port=8000");
        assert_eq!(Fields(&[]).to_string(), "");
    }

    #[test]
    fn test_log_event() {
        // Verifies no panic without a subscriber installed
        log_event(Event::BootStart);
        log_event(Event::BootFailed);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("schema", "public")]);
    }
}

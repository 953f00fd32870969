//! Lifecycle events for tablegate
//!
//! Events are explicit and typed. Each one is logged once as a structured
//! `event=` field.

use std::fmt;

/// Observable lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Process startup begins
    BootStart,
    /// Startup complete, gateway built
    BootComplete,
    /// Startup aborted (FATAL)
    BootFailed,
    /// Shutdown initiated
    ShutdownStart,
    /// Server drained and pool closed
    ShutdownComplete,

    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Default configuration written by `init`
    ConfigWritten,

    // Connection pool
    /// Pool created and first connection established
    PoolConnected,
    /// Pool drained and closed
    PoolClosed,

    // Operations
    /// Request rejected before reaching the engine
    OperationRejected,

    // Server
    /// Listener bound, serving requests
    Serving,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "TABLEGATE_STARTUP_BEGIN",
            Event::BootComplete => "TABLEGATE_STARTUP_COMPLETE",
            Event::BootFailed => "TABLEGATE_STARTUP_FAILED",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigWritten => "CONFIG_WRITTEN",

            Event::PoolConnected => "POOL_CONNECTED",
            Event::PoolClosed => "POOL_CLOSED",

            Event::OperationRejected => "OPERATION_REJECTED",

            Event::Serving => "TABLEGATE_SERVING",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

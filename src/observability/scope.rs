//! ObservationScope for begin/complete logging around one operation
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE`, `{name}_REJECTED` or `{name}_ERROR` when closed
//! - Logs `{name}_INCOMPLETE` if dropped unclosed (e.g. the request future
//!   was cancelled by a client disconnect)

use std::time::Instant;

/// A scope that logs start and outcome of one operation
///
/// ```ignore
/// let scope = ObservationScope::with_table("INSERT", "orders");
/// // ... do work ...
/// scope.complete(); // logs INSERT_COMPLETE with elapsed_ms
/// ```
pub struct ObservationScope {
    name: &'static str,
    table: Option<String>,
    started: Instant,
    closed: bool,
}

impl ObservationScope {
    pub fn new(name: &'static str) -> Self {
        tracing::debug!(event = %format!("{}_BEGIN", name));
        Self {
            name,
            table: None,
            started: Instant::now(),
            closed: false,
        }
    }

    /// Scope bound to one table; the name is attached to every line
    pub fn with_table(name: &'static str, table: &str) -> Self {
        tracing::debug!(event = %format!("{}_BEGIN", name), table);
        Self {
            name,
            table: Some(table.to_string()),
            started: Instant::now(),
            closed: false,
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    /// Logs `{name}_COMPLETE` at INFO
    pub fn complete(mut self) {
        self.closed = true;
        tracing::info!(
            event = %format!("{}_COMPLETE", self.name),
            table = self.table.as_deref(),
            elapsed_ms = self.elapsed_ms() as u64
        );
    }

    /// Logs `{name}_COMPLETE` at INFO with a rows count attached
    pub fn complete_with_rows(mut self, rows: u64) {
        self.closed = true;
        tracing::info!(
            event = %format!("{}_COMPLETE", self.name),
            table = self.table.as_deref(),
            rows,
            elapsed_ms = self.elapsed_ms() as u64
        );
    }

    /// Request refused before execution. Logs `{name}_REJECTED` at WARN.
    pub fn reject(mut self, reason: &str) {
        self.closed = true;
        tracing::warn!(
            event = %format!("{}_REJECTED", self.name),
            table = self.table.as_deref(),
            reason
        );
    }

    /// Logs `{name}_ERROR` at ERROR
    pub fn fail(mut self, reason: &str) {
        self.closed = true;
        tracing::error!(
            event = %format!("{}_ERROR", self.name),
            table = self.table.as_deref(),
            reason,
            elapsed_ms = self.elapsed_ms() as u64
        );
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!(
                event = %format!("{}_INCOMPLETE", self.name),
                table = self.table.as_deref(),
                reason = "scope dropped without completion"
            );
        }
    }
}

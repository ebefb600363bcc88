//! Aggregate operation counters for the AI layer.

/// Running totals maintained by the [`AiManager`](crate::manager::AiManager).
///
/// Individual behavior systems report their own
/// [`SystemStats`](crate::behavior::SystemStats); these counters cover the
/// coordination layer itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct AiMetrics {
    /// Events drained from the manager queue.
    pub events_processed: u64,
    /// System update or shutdown calls that returned an error.
    pub system_errors: u64,
    /// Event deliveries to systems that returned an error.
    pub handler_errors: u64,
    /// Entities registered for AI control over the process lifetime.
    pub entities_registered: u64,
    /// Entities released from AI control over the process lifetime.
    pub entities_unregistered: u64,
}

impl AiMetrics {
    /// Record drained events.
    pub fn record_events(&mut self, count: u64) {
        self.events_processed += count;
    }

    /// Record a failed system update or shutdown.
    pub fn record_system_error(&mut self) {
        self.system_errors += 1;
    }

    /// Record a failed event delivery.
    pub fn record_handler_error(&mut self) {
        self.handler_errors += 1;
    }
}

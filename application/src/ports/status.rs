//! Status observer port
//!
//! Receives one event per status transition of each queried model.

use panel_domain::StatusEvent;

/// Callback for per-model status transitions
///
/// Invoked synchronously from the executor, so implementations must not
/// block. Implementations live in the presentation layer.
pub trait StatusObserver: Send + Sync {
    fn on_status(&self, event: &StatusEvent);
}

/// No-op observer for when status reporting is not needed
pub struct NoStatus;

impl StatusObserver for NoStatus {
    fn on_status(&self, _event: &StatusEvent) {}
}

impl<F> StatusObserver for F
where
    F: Fn(&StatusEvent) + Send + Sync,
{
    fn on_status(&self, event: &StatusEvent) {
        self(event)
    }
}

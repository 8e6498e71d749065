use chrono::{DateTime, Utc};
use panel_application::RunNamer;

/// Names runs `run-YYYYMMDD-HHMMSS` (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampRunNamer;

impl RunNamer for TimestampRunNamer {
    fn name(&self, now: DateTime<Utc>) -> String {
        format!("run-{}", now.format("%Y%m%d-%H%M%S"))
    }
}

//! Aggregated result of querying every selected model.

use super::response::LlmResponse;
use super::status::{ModelQueryStatus, QueryStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::ser::{SerializeSeq, Serializer};

/// Wall-clock span of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timing {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
}

impl Timing {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let end = end.max(start);
        Self {
            start_time: start,
            end_time: end,
            duration_ms: (end - start).num_milliseconds().max(0) as u64,
        }
    }

    /// Earliest start to latest end across the given statuses.
    pub fn spanning<'a>(
        statuses: impl IntoIterator<Item = &'a ModelQueryStatus>,
        fallback: DateTime<Utc>,
    ) -> Self {
        let mut start: Option<DateTime<Utc>> = None;
        let mut end: Option<DateTime<Utc>> = None;
        for status in statuses {
            if let Some(s) = status.start_time {
                start = Some(start.map_or(s, |cur| cur.min(s)));
            }
            if let Some(e) = status.end_time {
                end = Some(end.map_or(e, |cur| cur.max(e)));
            }
        }
        let start = start.unwrap_or(fallback);
        Self::new(start, end.unwrap_or(start))
    }
}

/// Model key → status, iterating in input-model order.
///
/// Holds one entry per queried model, so a key selected twice appears
/// twice; [`get`](Self::get) returns the first.
#[derive(Debug, Clone, Default)]
pub struct StatusMap {
    entries: Vec<(String, ModelQueryStatus)>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, status: ModelQueryStatus) {
        self.entries.push((key.into(), status));
    }

    pub fn get(&self, key: &str) -> Option<&ModelQueryStatus> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, status)| status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelQueryStatus)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, status: QueryStatus) -> usize {
        self.entries.iter().filter(|(_, s)| s.status == status).count()
    }
}

impl Serialize for StatusMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry<'a> {
            model: &'a str,
            #[serde(flatten)]
            status: &'a ModelQueryStatus,
        }

        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (model, status) in &self.entries {
            seq.serialize_element(&Entry { model, status })?;
        }
        seq.end()
    }
}

/// Everything the executor learned about one run.
///
/// `responses` and `statuses` both hold exactly one entry per input
/// model, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct QueryExecutionResult {
    pub responses: Vec<LlmResponse>,
    pub statuses: StatusMap,
    pub timing: Timing,
}

impl QueryExecutionResult {
    pub fn success_count(&self) -> usize {
        self.responses.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.responses.len() - self.success_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &LlmResponse> {
        self.responses.iter().filter(|r| !r.is_success())
    }

    pub fn all_failed(&self) -> bool {
        !self.responses.is_empty() && self.success_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanelError;
    use chrono::Duration;

    #[test]
    fn test_timing_spans_earliest_to_latest() {
        let t0 = Utc::now();
        let a = ModelQueryStatus::success(t0 + Duration::milliseconds(10), t0 + Duration::milliseconds(300));
        let b = ModelQueryStatus::success(t0, t0 + Duration::milliseconds(100));

        let timing = Timing::spanning([&a, &b], Utc::now());
        assert_eq!(timing.start_time, t0);
        assert_eq!(timing.end_time, t0 + Duration::milliseconds(300));
        assert_eq!(timing.duration_ms, 300);
    }

    #[test]
    fn test_timing_without_statuses_uses_fallback() {
        let now = Utc::now();
        let timing = Timing::spanning(std::iter::empty(), now);
        assert_eq!(timing.start_time, now);
        assert_eq!(timing.duration_ms, 0);
    }

    #[test]
    fn test_status_map_preserves_order_and_counts() {
        let now = Utc::now();
        let mut map = StatusMap::new();
        map.push("b:2", ModelQueryStatus::success(now, now));
        map.push("a:1", ModelQueryStatus::error(now, now, PanelError::unknown("x")));

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b:2", "a:1"]);
        assert_eq!(map.count(QueryStatus::Success), 1);
        assert_eq!(map.count(QueryStatus::Error), 1);
        assert!(map.get("a:1").is_some());
        assert!(map.get("c:3").is_none());
    }

    #[test]
    fn test_status_map_serializes_as_ordered_list() {
        let now = Utc::now();
        let mut map = StatusMap::new();
        map.push("openai:gpt-4o", ModelQueryStatus::success(now, now));

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json[0]["model"], "openai:gpt-4o");
        assert_eq!(json[0]["status"], "success");
    }
}

//! Per-model query status and the events emitted on each transition.

use crate::core::model::ModelSpec;
use crate::error::PanelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of one model's query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Pending => "pending",
            QueryStatus::Running => "running",
            QueryStatus::Success => "success",
            QueryStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryStatus::Success | QueryStatus::Error)
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one model's query lifecycle.
#[derive(Debug, Clone, Serialize)]
pub struct ModelQueryStatus {
    pub status: QueryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The classified error that ended the query.
    #[serde(skip)]
    pub cause: Option<PanelError>,
}

impl ModelQueryStatus {
    pub fn pending() -> Self {
        Self {
            status: QueryStatus::Pending,
            start_time: None,
            end_time: None,
            duration_ms: None,
            message: None,
            cause: None,
        }
    }

    pub fn running(start: DateTime<Utc>) -> Self {
        Self {
            status: QueryStatus::Running,
            start_time: Some(start),
            ..Self::pending()
        }
    }

    pub fn success(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::finished(QueryStatus::Success, start, end)
    }

    pub fn error(start: DateTime<Utc>, end: DateTime<Utc>, error: PanelError) -> Self {
        Self {
            message: Some(error.message.clone()),
            cause: Some(error),
            ..Self::finished(QueryStatus::Error, start, end)
        }
    }

    /// A terminal status. `end` is clamped so it never precedes `start`,
    /// which keeps `duration_ms == end - start`.
    fn finished(status: QueryStatus, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let end = end.max(start);
        let duration_ms = (end - start).num_milliseconds().max(0) as u64;
        Self {
            status,
            start_time: Some(start),
            end_time: Some(end),
            duration_ms: Some(duration_ms),
            message: None,
            cause: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }
}

/// Context attached to every status event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusContext {
    pub provider: String,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl StatusContext {
    pub fn new(spec: &ModelSpec, group: Option<String>) -> Self {
        Self {
            provider: spec.provider.clone(),
            model_id: spec.model_id.clone(),
            group,
        }
    }
}

/// One status transition for one model, emitted synchronously.
#[derive(Debug, Clone, Serialize)]
pub struct StatusEvent {
    pub model_key: String,
    pub status: ModelQueryStatus,
    pub context: StatusContext,
}

// ABOUTME: Per-session run results and history aggregation
// ABOUTME: Defines history entries, session summaries, and the run-wide summary map

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ExecutionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Success,
    Failed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Success => write!(f, "SUCCESS"),
            TaskStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// One attempted invocation in a session's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub task: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration: Option<Duration>,
}

impl HistoryEntry {
    pub fn success(task: impl Into<String>, duration: Duration) -> Self {
        Self {
            task: task.into(),
            status: TaskStatus::Success,
            error: None,
            duration: Some(duration),
        }
    }

    pub fn failed(task: impl Into<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            task: task.into(),
            status: TaskStatus::Failed,
            error: Some(error.into()),
            duration: Some(duration),
        }
    }
}

/// Result of one session's pipeline: the terminal error (`None` when
/// the run ended without an unrecovered failure) and the ordered
/// history of every invocation that was actually attempted.
#[derive(Debug)]
pub struct Summary {
    pub error: Option<ExecutionError>,
    pub history: Vec<HistoryEntry>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
}

impl Summary {
    pub fn new() -> Self {
        Self {
            error: None,
            history: Vec::new(),
            start_time: Utc::now(),
            end_time: None,
            duration: None,
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    pub fn mark_completed(&mut self) {
        self.end_time = Some(Utc::now());
        self.duration = Some(
            (Utc::now() - self.start_time)
                .to_std()
                .unwrap_or(Duration::ZERO),
        );
    }

    /// True when the pipeline finished without an unrecovered failure.
    /// Individual entries may still be FAILED under `ignore_errors`.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn has_failures(&self) -> bool {
        self.history
            .iter()
            .any(|entry| entry.status == TaskStatus::Failed)
    }

    pub fn successful_tasks(&self) -> usize {
        self.history
            .iter()
            .filter(|entry| entry.status == TaskStatus::Success)
            .count()
    }

    pub fn failed_tasks(&self) -> usize {
        self.history
            .iter()
            .filter(|entry| entry.status == TaskStatus::Failed)
            .count()
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::new()
    }
}

/// Final output of a run: host identity -> summary, one entry per
/// session, in the order the sessions were supplied.
pub type SummaryMap = IndexMap<String, Summary>;

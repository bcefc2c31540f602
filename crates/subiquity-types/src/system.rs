//! Time zone, install source, snap refresh and task progress.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZoneInfo {
    pub timezone: String,
    pub from_geoip: bool,
}

/// One installable source (e.g. minimal or full desktop).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSelection {
    pub name: String,
    pub description: String,
    pub id: String,
    pub size: u64,
    pub variant: String,
    pub default: bool,
}

/// Response of `GET /source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSelectionAndSetting {
    pub sources: Vec<SourceSelection>,
    pub current_id: String,
    pub search_drivers: bool,
}

impl SourceSelectionAndSetting {
    pub fn current(&self) -> Option<&SourceSelection> {
        self.sources.iter().find(|s| s.id == self.current_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshCheckState {
    Unknown,
    Available,
    Unavailable,
}

/// Whether a newer installer snap is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshStatus {
    pub availability: RefreshCheckState,
    #[serde(default)]
    pub current_snap_version: String,
    #[serde(default)]
    pub new_snap_version: String,
}

/// Status of a snapd change or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Do,
    Doing,
    Done,
    Abort,
    Undo,
    Undoing,
    Hold,
    Error,
}

impl TaskStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Error | TaskStatus::Hold)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub label: String,
    pub done: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub kind: String,
    pub summary: String,
    pub status: TaskStatus,
    pub progress: TaskProgress,
}

/// A snapd change: a group of tasks with an overall status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub id: String,
    pub kind: String,
    pub summary: String,
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
    pub ready: bool,
    pub err: Option<String>,
    /// Opaque change-specific result.
    pub data: Option<serde_json::Value>,
}

impl Change {
    /// Fraction of work done across all tasks, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let (done, total) = self.tasks.iter().fold((0u64, 0u64), |(d, t), task| {
            (
                d.saturating_add(task.progress.done),
                t.saturating_add(task.progress.total),
            )
        });
        if total == 0 {
            if self.ready { 1.0 } else { 0.0 }
        } else {
            (done as f64 / total as f64).clamp(0.0, 1.0)
        }
    }
}

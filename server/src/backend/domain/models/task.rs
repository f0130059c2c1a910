//! Domain model for a study task.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{Subject, TaskStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub child_id: String,
    pub subject: Subject,
    pub name: String,
    /// Planned minutes
    pub duration: u32,
    pub points: u32,
    pub status: TaskStatus,
    pub date: NaiveDate,
    /// Seconds spent, recorded on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn generate_id() -> String {
        super::generate_id("task")
    }

    /// Status a cancelled run falls back to: a retry returns to `Completed`
    pub fn status_before_start(&self) -> TaskStatus {
        if self.actual_duration.is_some() {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }
}

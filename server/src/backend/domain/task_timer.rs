//! Ephemeral elapsed-time tracking for running tasks.
//!
//! Timers live only in memory: a cancelled or interrupted run leaves no
//! trace in storage. Elapsed time is persisted only through task completion.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TaskTimer {
    pub task_id: String,
    pub child_id: String,
    pub started_at: DateTime<Utc>,
}

impl TaskTimer {
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.started_at).num_seconds()).unwrap_or(0)
    }
}

/// Running timers keyed by task id
#[derive(Debug, Default)]
pub struct TaskTimers {
    timers: HashMap<String, TaskTimer>,
}

impl TaskTimers {
    /// Start (or restart) the timer of a task
    pub fn start(&mut self, task_id: &str, child_id: &str, now: DateTime<Utc>) {
        self.timers.insert(
            task_id.to_string(),
            TaskTimer {
                task_id: task_id.to_string(),
                child_id: child_id.to_string(),
                started_at: now,
            },
        );
    }

    pub fn stop(&mut self, task_id: &str) -> Option<TaskTimer> {
        self.timers.remove(task_id)
    }

    pub fn get(&self, task_id: &str) -> Option<&TaskTimer> {
        self.timers.get(task_id)
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

//! Task store: the canonical task collection and its lifecycle.
//!
//! The whole collection is loaded once, served from memory and rewritten
//! to the `growtree_tasks` document on every mutation. A mutation works on
//! a copy and only replaces the in-memory collection after the write
//! succeeded, so a failed write leaves memory and disk in agreement.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use shared::TaskStatus;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::domain::commands::tasks::{NewTask, PlanTasksCommand, TaskCompletion, TaskUpdate};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::task::Task;
use crate::backend::domain::schedule;
use crate::backend::domain::task_timer::TaskTimers;
use crate::backend::storage::{load_collection, save_document, DocumentKey, DocumentStorage};

/// Longest planned duration a task may have, in minutes
pub const MAX_TASK_DURATION: u32 = 24 * 60;

#[derive(Clone)]
pub struct TaskService {
    storage: Arc<dyn DocumentStorage>,
    tasks: Arc<RwLock<Vec<Task>>>,
    timers: Arc<RwLock<TaskTimers>>,
}

impl TaskService {
    /// Load the task collection from storage
    pub async fn load(storage: Arc<dyn DocumentStorage>) -> Result<Self> {
        let tasks: Vec<Task> = load_collection(storage.as_ref(), DocumentKey::Tasks).await?;
        info!("Loaded {} tasks", tasks.len());

        Ok(Self {
            storage,
            tasks: Arc::new(RwLock::new(tasks)),
            timers: Arc::new(RwLock::new(TaskTimers::default())),
        })
    }

    /// Swap every task of `user_id` for `imported` in one write.
    /// Tasks of other accounts keep their place.
    pub async fn replace_user_tasks(&self, user_id: &str, imported: Vec<Task>) -> DomainResult<usize> {
        info!("Replacing tasks of account {} with {} imported tasks", user_id, imported.len());

        let mut tasks = self.tasks.write().await;
        let removed: Vec<String> = tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| t.id.clone())
            .collect();

        let count = imported.len();
        let mut updated = imported;
        updated.extend(tasks.iter().filter(|t| t.user_id != user_id).cloned());
        save_document(self.storage.as_ref(), DocumentKey::Tasks, &updated).await?;
        *tasks = updated;
        drop(tasks);

        let mut timers = self.timers.write().await;
        for task_id in &removed {
            timers.stop(task_id);
        }

        info!("Replaced {} tasks of account {} with {}", removed.len(), user_id, count);
        Ok(count)
    }

    /// Create a pending task at the front of the collection
    pub async fn add_task(&self, command: NewTask) -> DomainResult<Task> {
        info!(
            "Adding task '{}' for child {} on {}",
            command.name, command.child_id, command.date
        );
        Self::validate_new_task(&command)?;

        let task = Self::build_task(command);

        let mut tasks = self.tasks.write().await;
        let mut updated = tasks.clone();
        updated.insert(0, task.clone());
        save_document(self.storage.as_ref(), DocumentKey::Tasks, &updated).await?;
        *tasks = updated;

        info!("Added task {}", task.id);
        Ok(task)
    }

    /// Expand a repeating plan and add one task per matching day
    pub async fn add_planned_tasks(&self, command: PlanTasksCommand) -> DomainResult<Vec<Task>> {
        info!(
            "Planning '{}' for child {} from {} ({:?})",
            command.task.name, command.task.child_id, command.task.date, command.repeat
        );
        Self::validate_new_task(&command.task)?;

        let dates = schedule::plan_dates(
            command.task.date,
            command.until,
            command.repeat,
            &command.weekdays,
        )?;
        if dates.is_empty() {
            warn!("Plan '{}' matches no day in its range", command.task.name);
            return Ok(Vec::new());
        }

        let created: Vec<Task> = dates
            .iter()
            .map(|date| {
                let mut new_task = command.task.clone();
                new_task.date = *date;
                Self::build_task(new_task)
            })
            .collect();

        let mut tasks = self.tasks.write().await;
        let mut updated = tasks.clone();
        // Each day is prepended in turn, so the last planned day ends up first
        for task in &created {
            updated.insert(0, task.clone());
        }
        save_document(self.storage.as_ref(), DocumentKey::Tasks, &updated).await?;
        *tasks = updated;

        info!("Planned {} tasks", created.len());
        Ok(created)
    }

    /// Merge the given fields into a task. `None` when no such task exists.
    pub async fn update_task(&self, task_id: &str, update: TaskUpdate) -> DomainResult<Option<Task>> {
        info!("Updating task {}", task_id);

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Task name cannot be empty"));
            }
        }
        if let Some(duration) = update.duration {
            Self::validate_duration(duration)?;
        }

        let status_change = update.status;
        let updated = self.modify_task(task_id, |task| {
            if let Some(subject) = update.subject {
                task.subject = subject;
            }
            if let Some(name) = update.name {
                task.name = name.trim().to_string();
            }
            if let Some(duration) = update.duration {
                task.duration = duration;
            }
            if let Some(points) = update.points {
                task.points = points;
            }
            if let Some(status) = update.status {
                task.status = status;
            }
            if let Some(date) = update.date {
                task.date = date;
            }
            if let Some(actual_duration) = update.actual_duration {
                task.actual_duration = Some(actual_duration);
            }
            if let Some(summary) = update.summary {
                task.summary = Some(summary);
            }
            Ok(())
        })
        .await?;

        if status_change.is_some_and(|status| status != TaskStatus::InProgress) {
            self.timers.write().await.stop(task_id);
        }
        Ok(updated)
    }

    /// Remove a task. Returns whether anything was removed.
    pub async fn delete_task(&self, task_id: &str) -> DomainResult<bool> {
        info!("Deleting task {}", task_id);

        let mut tasks = self.tasks.write().await;
        if !tasks.iter().any(|t| t.id == task_id) {
            warn!("Task not found for delete: {}", task_id);
            return Ok(false);
        }

        let updated: Vec<Task> = tasks.iter().filter(|t| t.id != task_id).cloned().collect();
        save_document(self.storage.as_ref(), DocumentKey::Tasks, &updated).await?;
        *tasks = updated;
        drop(tasks);

        self.timers.write().await.stop(task_id);
        info!("Deleted task {}", task_id);
        Ok(true)
    }

    /// Move a task to `in_progress` and start its timer.
    ///
    /// Fails with a conflict while another task of the same child is running.
    pub async fn start_task(&self, task_id: &str) -> DomainResult<Option<Task>> {
        info!("Starting task {}", task_id);

        let mut tasks = self.tasks.write().await;
        let Some(index) = tasks.iter().position(|t| t.id == task_id) else {
            warn!("Task not found for start: {}", task_id);
            return Ok(None);
        };

        if !tasks[index].status.can_start() {
            info!("Task {} is already in progress, restarting its timer", task_id);
        }

        let child_id = tasks[index].child_id.clone();
        let mut updated = tasks.clone();
        updated[index].status = TaskStatus::InProgress;
        Self::ensure_single_active(&updated, index)?;
        save_document(self.storage.as_ref(), DocumentKey::Tasks, &updated).await?;
        let task = updated[index].clone();
        *tasks = updated;
        drop(tasks);

        self.timers.write().await.start(task_id, &child_id, Utc::now());
        info!("Started task {} for child {}", task_id, child_id);
        Ok(Some(task))
    }

    /// Record a completion with the elapsed seconds.
    ///
    /// The summary is only replaced when one is given. `first_completion`
    /// tells whether the task had never been completed before.
    pub async fn complete_task(
        &self,
        task_id: &str,
        actual_seconds: u32,
        summary: Option<String>,
    ) -> DomainResult<Option<TaskCompletion>> {
        info!("Completing task {} after {}s", task_id, actual_seconds);

        let mut first_completion = false;
        let completed = self
            .modify_task(task_id, |task| {
                first_completion = task.actual_duration.is_none();
                task.status = TaskStatus::Completed;
                task.actual_duration = Some(actual_seconds);
                if let Some(summary) = summary {
                    task.summary = Some(summary);
                }
                Ok(())
            })
            .await?;

        self.timers.write().await.stop(task_id);

        Ok(completed.map(|task| {
            info!("Completed task {} (first completion: {})", task.id, first_completion);
            TaskCompletion {
                task,
                first_completion,
            }
        }))
    }

    /// Abandon a running task: drop its timer and return it to the state it
    /// was started from. Nothing of the abandoned run is persisted.
    pub async fn cancel_task(&self, task_id: &str) -> DomainResult<Option<Task>> {
        info!("Cancelling task {}", task_id);

        let timer = self.timers.write().await.stop(task_id);
        if timer.is_none() {
            info!("Task {} had no running timer", task_id);
        }

        self.modify_task(task_id, |task| {
            if task.status == TaskStatus::InProgress {
                task.status = task.status_before_start();
            }
            Ok(())
        })
        .await
    }

    /// Seconds since the task was started, `None` without a running timer
    pub async fn elapsed_seconds(&self, task_id: &str) -> Option<u64> {
        self.timers
            .read()
            .await
            .get(task_id)
            .map(|timer| timer.elapsed_seconds(Utc::now()))
    }

    pub async fn get_task(&self, user_id: &str, task_id: &str) -> Option<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .find(|t| t.id == task_id && t.user_id == user_id)
            .cloned()
    }

    /// Every task of an account, in collection order
    pub async fn get_user_tasks(&self, user_id: &str) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn get_tasks_by_date(&self, user_id: &str, child_id: &str, date: NaiveDate) -> Vec<Task> {
        self.filter_child_tasks(user_id, child_id, |t| t.date == date).await
    }

    /// Tasks dated before `current_date` that never reached `completed`
    pub async fn get_overdue_tasks(&self, user_id: &str, child_id: &str, current_date: NaiveDate) -> Vec<Task> {
        self.filter_child_tasks(user_id, child_id, |t| {
            t.date < current_date && t.status != TaskStatus::Completed
        })
        .await
    }

    pub async fn get_tasks_by_status(
        &self,
        user_id: &str,
        child_id: &str,
        date: NaiveDate,
        status: TaskStatus,
    ) -> Vec<Task> {
        self.filter_child_tasks(user_id, child_id, |t| t.date == date && t.status == status)
            .await
    }

    /// Open tasks of the day; running tasks count as pending
    pub async fn get_pending_tasks_count(&self, user_id: &str, child_id: &str, date: NaiveDate) -> usize {
        self.filter_child_tasks(user_id, child_id, |t| t.date == date && t.status.is_open())
            .await
            .len()
    }

    pub async fn get_completed_tasks_count(&self, user_id: &str, child_id: &str, date: NaiveDate) -> usize {
        self.filter_child_tasks(user_id, child_id, |t| {
            t.date == date && t.status == TaskStatus::Completed
        })
        .await
        .len()
    }

    /// Tasks between `start` and `end`, both inclusive, in collection order
    pub async fn get_tasks_in_range(
        &self,
        user_id: &str,
        child_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Task> {
        self.filter_child_tasks(user_id, child_id, |t| t.date >= start && t.date <= end)
            .await
    }

    async fn filter_child_tasks<F>(&self, user_id: &str, child_id: &str, predicate: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        self.tasks
            .read()
            .await
            .iter()
            .filter(|t| t.user_id == user_id && t.child_id == child_id && predicate(t))
            .cloned()
            .collect()
    }

    /// Apply `change` to one task and persist. `None` when the task is missing.
    async fn modify_task<F>(&self, task_id: &str, change: F) -> DomainResult<Option<Task>>
    where
        F: FnOnce(&mut Task) -> DomainResult<()>,
    {
        let mut tasks = self.tasks.write().await;
        let Some(index) = tasks.iter().position(|t| t.id == task_id) else {
            warn!("Task not found: {}", task_id);
            return Ok(None);
        };

        let mut updated = tasks.clone();
        change(&mut updated[index])?;
        if updated[index].status == TaskStatus::InProgress {
            Self::ensure_single_active(&updated, index)?;
        }
        save_document(self.storage.as_ref(), DocumentKey::Tasks, &updated).await?;
        let task = updated[index].clone();
        *tasks = updated;

        Ok(Some(task))
    }

    fn validate_new_task(command: &NewTask) -> DomainResult<()> {
        if command.name.trim().is_empty() {
            return Err(DomainError::validation("Task name cannot be empty"));
        }
        Self::validate_duration(command.duration)
    }

    fn validate_duration(duration: u32) -> DomainResult<()> {
        if duration == 0 {
            return Err(DomainError::validation("Task duration must be greater than zero"));
        }
        if duration > MAX_TASK_DURATION {
            return Err(DomainError::validation(format!(
                "Task duration cannot exceed {} minutes",
                MAX_TASK_DURATION
            )));
        }
        Ok(())
    }

    /// A child runs at most one task: `tasks[index]` must be its only
    /// `in_progress` task.
    fn ensure_single_active(tasks: &[Task], index: usize) -> DomainResult<()> {
        let task = &tasks[index];
        match tasks
            .iter()
            .find(|t| t.child_id == task.child_id && t.status == TaskStatus::InProgress && t.id != task.id)
        {
            Some(running) => {
                warn!(
                    "Refusing to run {} while {} is in progress for child {}",
                    task.id, running.id, task.child_id
                );
                Err(DomainError::Conflict(format!(
                    "Task '{}' is already in progress for this child",
                    running.name
                )))
            }
            None => Ok(()),
        }
    }

    fn build_task(command: NewTask) -> Task {
        Task {
            id: Task::generate_id(),
            user_id: command.user_id,
            child_id: command.child_id,
            subject: command.subject,
            name: command.name.trim().to_string(),
            duration: command.duration,
            points: command.points,
            status: TaskStatus::Pending,
            date: command.date,
            actual_duration: None,
            summary: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::json::test_utils::TestEnvironment;
    use shared::{RepeatType, Subject};

    const USER: &str = "user::1";
    const CHILD: &str = "child::1";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_task(name: &str, day: &str) -> NewTask {
        NewTask {
            user_id: USER.to_string(),
            child_id: CHILD.to_string(),
            subject: Subject::Math,
            name: name.to_string(),
            duration: 30,
            points: 10,
            date: date(day),
        }
    }

    async fn setup_test() -> (TestEnvironment, TaskService) {
        let env = TestEnvironment::new().expect("Failed to create test environment");
        let service = TaskService::load(env.storage()).await.expect("Failed to load tasks");
        (env, service)
    }

    #[tokio::test]
    async fn test_add_task_prepends_pending_task() {
        let (_env, service) = setup_test().await;

        let first = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();
        let second = service.add_task(new_task("Decimals", "2026-02-10")).await.unwrap();

        assert_eq!(first.status, TaskStatus::Pending);
        assert!(first.actual_duration.is_none());
        assert_ne!(first.id, second.id);

        let tasks = service.get_tasks_by_date(USER, CHILD, date("2026-02-10")).await;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, second.id);
    }

    #[tokio::test]
    async fn test_add_task_validation() {
        let (_env, service) = setup_test().await;

        let result = service.add_task(new_task("   ", "2026-02-10")).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let mut zero = new_task("Reading", "2026-02-10");
        zero.duration = 0;
        assert!(matches!(service.add_task(zero).await, Err(DomainError::Validation(_))));

        let mut endless = new_task("Reading", "2026-02-10");
        endless.duration = u32::MAX;
        assert!(matches!(service.add_task(endless).await, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_tasks_survive_reload() {
        let (env, service) = setup_test().await;
        let task = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();

        let reopened = TaskService::load(env.storage()).await.unwrap();
        assert_eq!(reopened.get_task(USER, &task.id).await, Some(task));
    }

    #[tokio::test]
    async fn test_reads_are_scoped_by_user() {
        let (_env, service) = setup_test().await;
        let task = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();

        assert!(service.get_task("user::other", &task.id).await.is_none());
        assert!(service
            .get_tasks_by_date("user::other", CHILD, date("2026-02-10"))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_task_are_no_ops() {
        let (_env, service) = setup_test().await;

        let updated = service
            .update_task("task::missing", TaskUpdate::default())
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(!service.delete_task("task::missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_task_merges_fields() {
        let (_env, service) = setup_test().await;
        let task = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();

        let updated = service
            .update_task(
                &task.id,
                TaskUpdate {
                    name: Some("Long division".to_string()),
                    points: Some(15),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Long division");
        assert_eq!(updated.points, 15);
        assert_eq!(updated.duration, 30);
    }

    #[tokio::test]
    async fn test_delete_task_is_idempotent() {
        let (_env, service) = setup_test().await;
        let task = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();

        assert!(service.delete_task(&task.id).await.unwrap());
        assert!(!service.delete_task(&task.id).await.unwrap());
        assert!(service.get_task(USER, &task.id).await.is_none());
    }

    #[tokio::test]
    async fn test_start_complete_and_retry() {
        let (_env, service) = setup_test().await;
        let task = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();

        let started = service.start_task(&task.id).await.unwrap().unwrap();
        assert_eq!(started.status, TaskStatus::InProgress);
        assert!(service.elapsed_seconds(&task.id).await.is_some());

        let completion = service
            .complete_task(&task.id, 1500, Some("Done".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert!(completion.first_completion);
        assert_eq!(completion.task.status, TaskStatus::Completed);
        assert_eq!(completion.task.actual_duration, Some(1500));
        assert!(service.elapsed_seconds(&task.id).await.is_none());

        // Retry keeps the previous summary when none is given
        service.start_task(&task.id).await.unwrap();
        let retry = service.complete_task(&task.id, 1200, None).await.unwrap().unwrap();
        assert!(!retry.first_completion);
        assert_eq!(retry.task.actual_duration, Some(1200));
        assert_eq!(retry.task.summary.as_deref(), Some("Done"));
    }

    #[tokio::test]
    async fn test_only_one_running_task_per_child() {
        let (_env, service) = setup_test().await;
        let first = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();
        let second = service.add_task(new_task("Decimals", "2026-02-10")).await.unwrap();

        service.start_task(&first.id).await.unwrap();
        let result = service.start_task(&second.id).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        // Restarting the running task is fine
        assert!(service.start_task(&first.id).await.unwrap().is_some());

        // Another child is unaffected
        let mut other = new_task("Spelling", "2026-02-10");
        other.child_id = "child::2".to_string();
        let other = service.add_task(other).await.unwrap();
        assert!(service.start_task(&other.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_cannot_start_a_second_task() {
        let (_env, service) = setup_test().await;
        let first = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();
        let second = service.add_task(new_task("Decimals", "2026-02-10")).await.unwrap();
        service.start_task(&first.id).await.unwrap();

        let result = service
            .update_task(
                &second.id,
                TaskUpdate {
                    status: Some(TaskStatus::InProgress),
                    ..TaskUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        let running = service
            .get_tasks_by_status(USER, CHILD, date("2026-02-10"), TaskStatus::InProgress)
            .await;
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].id, first.id);

        // Moving the running task out of in_progress drops its timer
        service
            .update_task(
                &first.id,
                TaskUpdate {
                    status: Some(TaskStatus::Pending),
                    ..TaskUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(service.elapsed_seconds(&first.id).await.is_none());

        let overlong = service
            .update_task(
                &second.id,
                TaskUpdate {
                    duration: Some(MAX_TASK_DURATION + 1),
                    ..TaskUpdate::default()
                },
            )
            .await;
        assert!(matches!(overlong, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cancel_restores_previous_status() {
        let (_env, service) = setup_test().await;
        let task = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();

        service.start_task(&task.id).await.unwrap();
        let cancelled = service.cancel_task(&task.id).await.unwrap().unwrap();
        assert_eq!(cancelled.status, TaskStatus::Pending);
        assert!(service.elapsed_seconds(&task.id).await.is_none());

        service.start_task(&task.id).await.unwrap();
        service.complete_task(&task.id, 600, None).await.unwrap();
        service.start_task(&task.id).await.unwrap();
        let cancelled_retry = service.cancel_task(&task.id).await.unwrap().unwrap();
        assert_eq!(cancelled_retry.status, TaskStatus::Completed);
        assert_eq!(cancelled_retry.actual_duration, Some(600));
    }

    #[tokio::test]
    async fn test_overdue_and_counts() {
        let (_env, service) = setup_test().await;
        let old_pending = service.add_task(new_task("Old", "2026-02-08")).await.unwrap();
        let old_done = service.add_task(new_task("Old done", "2026-02-08")).await.unwrap();
        let today = service.add_task(new_task("Today", "2026-02-10")).await.unwrap();
        service.add_task(new_task("Today too", "2026-02-10")).await.unwrap();

        service.complete_task(&old_done.id, 60, None).await.unwrap();
        service.start_task(&today.id).await.unwrap();

        let overdue = service.get_overdue_tasks(USER, CHILD, date("2026-02-10")).await;
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, old_pending.id);

        let day = date("2026-02-10");
        assert_eq!(service.get_pending_tasks_count(USER, CHILD, day).await, 2);
        assert_eq!(service.get_completed_tasks_count(USER, CHILD, day).await, 0);
        assert_eq!(
            service
                .get_tasks_by_status(USER, CHILD, day, TaskStatus::InProgress)
                .await
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_add_planned_tasks() {
        let (_env, service) = setup_test().await;

        let created = service
            .add_planned_tasks(PlanTasksCommand {
                task: new_task("Reading", "2026-02-09"),
                repeat: RepeatType::Weekday,
                until: Some(date("2026-02-15")),
                weekdays: Vec::new(),
            })
            .await
            .unwrap();
        assert_eq!(created.len(), 5);

        let week = service
            .get_tasks_in_range(USER, CHILD, date("2026-02-09"), date("2026-02-15"))
            .await;
        assert_eq!(week.len(), 5);
        assert_eq!(week[0].date, date("2026-02-13"));
        assert!(week.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[tokio::test]
    async fn test_replace_user_tasks_keeps_other_accounts() {
        let (env, service) = setup_test().await;
        let old = service.add_task(new_task("Fractions", "2026-02-10")).await.unwrap();
        service.start_task(&old.id).await.unwrap();
        let mut foreign = new_task("Spelling", "2026-02-10");
        foreign.user_id = "user::2".to_string();
        let foreign = service.add_task(foreign).await.unwrap();

        let mut imported = TaskService::build_task(new_task("Imported", "2026-02-11"));
        imported.id = "task::imported".to_string();
        let count = service.replace_user_tasks(USER, vec![imported.clone()]).await.unwrap();
        assert_eq!(count, 1);

        let mine = service.get_user_tasks(USER).await;
        assert_eq!(mine, vec![imported]);
        assert!(service.elapsed_seconds(&old.id).await.is_none());
        assert_eq!(service.get_task("user::2", &foreign.id).await, Some(foreign.clone()));

        let reopened = TaskService::load(env.storage()).await.unwrap();
        assert_eq!(reopened.get_user_tasks(USER).await.len(), 1);
        assert_eq!(reopened.get_user_tasks("user::2").await, vec![foreign]);
    }
}

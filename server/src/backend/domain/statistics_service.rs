//! Study statistics over a child's tasks in a date range.

use chrono::NaiveDate;
use indexmap::IndexMap;
use log::info;
use shared::{
    BestDay, CompletionType, CompletionTypeCount, DailyStudyData, StudyStats, Subject, SubjectStudyData,
    TaskStatus,
};

use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::task::Task;
use crate::backend::domain::task_service::TaskService;

#[derive(Clone)]
pub struct StatisticsService {
    task_service: TaskService,
}

impl StatisticsService {
    pub fn new(task_service: TaskService) -> Self {
        Self { task_service }
    }

    /// Statistics for the child's tasks dated `start..=end`
    pub async fn get_statistics(
        &self,
        user_id: &str,
        child_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<StudyStats> {
        info!("Computing statistics for child {} from {} to {}", child_id, start, end);

        if start > end {
            return Err(DomainError::validation("Start date must not be after end date"));
        }

        let tasks = self
            .task_service
            .get_tasks_in_range(user_id, child_id, start, end)
            .await;
        let stats = compute_stats(&tasks);

        info!(
            "Child {}: {}/{} tasks completed, {}s studied",
            child_id, stats.completed_tasks, stats.total_tasks, stats.total_duration
        );
        Ok(stats)
    }
}

/// Seconds to whole minutes, halves rounding up
fn to_minutes(seconds: u64) -> u32 {
    (seconds as f64 / 60.0).round() as u32
}

fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Aggregate a set of tasks in one pass.
///
/// Daily rows keep the order in which their dates first appear.
pub fn compute_stats(tasks: &[Task]) -> StudyStats {
    let mut daily: IndexMap<NaiveDate, (u32, u32)> = IndexMap::new();
    let mut by_subject: IndexMap<Subject, (u32, u64)> =
        Subject::ALL.iter().map(|subject| (*subject, (0, 0))).collect();
    let mut not_started = 0;
    let mut incomplete = 0;
    let mut completed = 0;
    let mut total_duration: u64 = 0;

    for task in tasks {
        let day = daily.entry(task.date).or_insert((0, 0));
        // Imported documents bypass duration validation
        day.0 = day.0.saturating_add(task.duration);

        match task.status {
            TaskStatus::Pending => not_started += 1,
            TaskStatus::InProgress => incomplete += 1,
            TaskStatus::Completed => {
                completed += 1;
                let seconds = u64::from(task.actual_duration.unwrap_or(0));
                total_duration += seconds;
                day.1 = day.1.saturating_add(to_minutes(seconds));

                let subject = by_subject.entry(task.subject).or_insert((0, 0));
                subject.0 += 1;
                subject.1 += seconds;
            }
        }
    }

    let total_tasks = tasks.len() as u32;

    let subject_distribution: Vec<SubjectStudyData> = by_subject
        .iter()
        .map(|(subject, (count, seconds))| SubjectStudyData {
            subject: *subject,
            count: *count,
            duration: to_minutes(*seconds),
            percentage: percentage(*count, completed),
        })
        .collect();
    let subject_data = subject_distribution
        .iter()
        .filter(|data| data.count > 0)
        .cloned()
        .collect();

    // Strictly greater, so ties keep the earliest group
    let mut best_day: Option<BestDay> = None;
    for (date, (_, minutes)) in &daily {
        let best = best_day.as_ref().map_or(0, |b| b.duration);
        if *minutes > best {
            best_day = Some(BestDay {
                date: date.format("%Y-%m-%d").to_string(),
                duration: *minutes,
            });
        }
    }

    let daily_data = daily
        .iter()
        .map(|(date, (planned, done))| DailyStudyData {
            date: date.format("%Y-%m-%d").to_string(),
            planned: *planned,
            completed: *done,
        })
        .collect();

    StudyStats {
        total_duration,
        completed_tasks: completed,
        total_tasks,
        completion_rate: percentage(completed, total_tasks),
        best_day,
        daily_data,
        subject_data,
        subject_distribution,
        task_completion_types: vec![
            CompletionTypeCount {
                completion_type: CompletionType::NotStarted,
                count: not_started,
            },
            CompletionTypeCount {
                completion_type: CompletionType::Incomplete,
                count: incomplete,
            },
            CompletionTypeCount {
                completion_type: CompletionType::Completed,
                count: completed,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(day: &str, subject: Subject, duration: u32, status: TaskStatus, actual: Option<u32>) -> Task {
        Task {
            id: format!("task::{}::{}", day, duration),
            user_id: "user::1".to_string(),
            child_id: "child::1".to_string(),
            subject,
            name: "Study".to_string(),
            duration,
            points: 10,
            status,
            date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
            actual_duration: actual,
            summary: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_range() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.completion_rate, 0);
        assert!(stats.best_day.is_none());
        assert!(stats.daily_data.is_empty());
        assert!(stats.subject_data.is_empty());
        assert_eq!(stats.subject_distribution.len(), 5);
        assert!(stats.subject_distribution.iter().all(|s| s.percentage == 0));
    }

    #[test]
    fn test_aggregates() {
        let tasks = vec![
            task("2026-02-11", Subject::Math, 30, TaskStatus::Completed, Some(1500)),
            task("2026-02-10", Subject::Math, 20, TaskStatus::Completed, Some(90)),
            task("2026-02-10", Subject::English, 25, TaskStatus::Pending, None),
            task("2026-02-11", Subject::Chinese, 40, TaskStatus::InProgress, None),
        ];

        let stats = compute_stats(&tasks);

        assert_eq!(stats.total_duration, 1590);
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.completion_rate, 50);

        // First-seen order, 90s rounds to 2 minutes
        assert_eq!(stats.daily_data[0].date, "2026-02-11");
        assert_eq!(stats.daily_data[0].planned, 70);
        assert_eq!(stats.daily_data[0].completed, 25);
        assert_eq!(stats.daily_data[1].completed, 2);

        assert_eq!(
            stats.best_day,
            Some(BestDay {
                date: "2026-02-11".to_string(),
                duration: 25
            })
        );

        assert_eq!(stats.subject_data.len(), 1);
        assert_eq!(stats.subject_data[0].subject, Subject::Math);
        assert_eq!(stats.subject_data[0].count, 2);
        assert_eq!(stats.subject_data[0].duration, 27);
        assert_eq!(stats.subject_data[0].percentage, 100);

        let counts: Vec<u32> = stats.task_completion_types.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![1, 1, 2]);
    }

    #[test]
    fn test_best_day_ties_keep_first() {
        let tasks = vec![
            task("2026-02-10", Subject::Math, 30, TaskStatus::Completed, Some(600)),
            task("2026-02-12", Subject::Math, 30, TaskStatus::Completed, Some(600)),
        ];

        let stats = compute_stats(&tasks);
        assert_eq!(stats.best_day.map(|b| b.date), Some("2026-02-10".to_string()));
    }

    #[test]
    fn test_completion_rate_rounds() {
        let tasks = vec![
            task("2026-02-10", Subject::Math, 30, TaskStatus::Completed, Some(60)),
            task("2026-02-10", Subject::Math, 30, TaskStatus::Pending, None),
            task("2026-02-10", Subject::Math, 30, TaskStatus::Pending, None),
        ];

        assert_eq!(compute_stats(&tasks).completion_rate, 33);
    }

    #[test]
    fn test_completion_rate_four_of_thirteen() {
        let mut tasks: Vec<Task> = (0..4)
            .map(|_| task("2026-02-10", Subject::Chinese, 20, TaskStatus::Completed, Some(600)))
            .collect();
        tasks.extend((0..9).map(|_| task("2026-02-11", Subject::English, 20, TaskStatus::Pending, None)));

        let stats = compute_stats(&tasks);
        assert_eq!(stats.total_tasks, 13);
        assert_eq!(stats.completed_tasks, 4);
        assert_eq!(stats.completion_rate, 31);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let tasks = vec![
            task("2026-02-10", Subject::Math, u32::MAX, TaskStatus::Completed, Some(u32::MAX)),
            task("2026-02-10", Subject::Math, u32::MAX, TaskStatus::Completed, Some(u32::MAX)),
        ];

        let stats = compute_stats(&tasks);
        assert_eq!(stats.daily_data.len(), 1);
        assert_eq!(stats.daily_data[0].planned, u32::MAX);
        assert_eq!(stats.total_duration, 2 * u64::from(u32::MAX));
        assert!(stats.best_day.is_some());
    }
}

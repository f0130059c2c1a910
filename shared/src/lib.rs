use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Study subject a task or grade belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Chinese,
    Math,
    English,
    Science,
    Sport,
}

impl Subject {
    /// Every subject, in display order
    pub const ALL: [Subject; 5] = [
        Subject::Chinese,
        Subject::Math,
        Subject::English,
        Subject::Science,
        Subject::Sport,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Chinese => "chinese",
            Subject::Math => "math",
            Subject::English => "english",
            Subject::Science => "science",
            Subject::Sport => "sport",
        }
    }

    /// Label shown to users
    pub fn display_name(self) -> &'static str {
        match self {
            Subject::Chinese => "语文",
            Subject::Math => "数学",
            Subject::English => "英语",
            Subject::Science => "科学",
            Subject::Sport => "运动",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| format!("invalid subject '{}'", s))
    }
}

/// Lifecycle state of a study task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, not yet started
    Pending,
    /// Being worked on right now
    InProgress,
    /// Elapsed time recorded
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Whether a task in this state may be (re)started.
    /// `Completed` is allowed: that is the retry path.
    pub fn can_start(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Completed)
    }

    /// Open tasks count towards the "pending" tally
    pub fn is_open(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a planned task repeats across days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    Once,
    Daily,
    Weekday,
    Weekend,
    Custom,
}

/// Classroom evaluation attached to an exam grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    Excellent,
    Good,
    Pass,
    Improve,
}

/// A single study assignment for a child on a calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub child_id: String,
    pub subject: Subject,
    pub name: String,
    /// Planned duration in minutes
    pub duration: u32,
    /// Points awarded on completion
    pub points: u32,
    pub status: TaskStatus,
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    /// Seconds actually spent, present once the task has been completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    pub grade: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub points: u32,
    pub growth_level: u8,
    pub growth_name: String,
    pub monthly_points: u32,
}

/// Account as seen by clients (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub phone: String,
    pub username: String,
    pub children: Vec<Child>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_child_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub name: String,
    /// Cost in points
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakPoint {
    pub knowledge: String,
    pub score: f64,
    pub total: f64,
}

/// Exam grade record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub child_id: String,
    pub subject: Subject,
    pub exam_type: String,
    pub exam_name: String,
    pub date: String,
    pub score: f64,
    pub total_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_score: Option<f64>,
    pub evaluation: Evaluation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_rank: Option<u32>,
    #[serde(default)]
    pub weak_points: Vec<WeakPoint>,
}

/// Growth ladder position of a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthProgress {
    pub child_id: String,
    pub level: u8,
    pub name: String,
    pub description: String,
    pub monthly_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_name: Option<String>,
    /// Percentage towards the next stage, 0-100
    pub progress_to_next: f64,
    pub points_needed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestDay {
    pub date: String,
    /// Completed minutes on that day
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStudyData {
    pub date: String,
    /// Planned minutes
    pub planned: u32,
    /// Completed minutes
    pub completed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStudyData {
    pub subject: Subject,
    pub count: u32,
    /// Minutes
    pub duration: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionType {
    NotStarted,
    Incomplete,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionTypeCount {
    #[serde(rename = "type")]
    pub completion_type: CompletionType,
    pub count: u32,
}

/// Aggregate study statistics for a child over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    /// Seconds spent on completed tasks
    pub total_duration: u64,
    pub completed_tasks: u32,
    pub total_tasks: u32,
    pub completion_rate: u32,
    pub best_day: Option<BestDay>,
    pub daily_data: Vec<DailyStudyData>,
    /// Subjects with at least one completion
    pub subject_data: Vec<SubjectStudyData>,
    /// All subjects, including those never completed
    pub subject_distribution: Vec<SubjectStudyData>,
    pub task_completion_types: Vec<CompletionTypeCount>,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub password: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub account: Account,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account: Account,
    pub current_child: Option<Child>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
    pub grade: u8,
    pub avatar: Option<String>,
}

/// Partial child update. Growth level and name are derived, never set directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub name: Option<String>,
    pub grade: Option<u8>,
    pub avatar: Option<String>,
    pub points: Option<u32>,
    pub monthly_points: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildResponse {
    pub child: Child,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildListResponse {
    pub children: Vec<Child>,
    pub current_child_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Defaults to the account's current child
    pub child_id: Option<String>,
    pub subject: Subject,
    pub name: String,
    pub duration: u32,
    pub points: u32,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTasksRequest {
    pub child_id: Option<String>,
    pub subject: Subject,
    pub name: String,
    pub duration: u32,
    pub points: u32,
    /// First day of the plan (YYYY-MM-DD)
    pub date: String,
    pub repeat: RepeatType,
    /// Last day of the plan, inclusive. Ignored for `once`.
    pub until: Option<String>,
    /// Days of week for `custom` (0 = Sunday ... 6 = Saturday)
    #[serde(default)]
    pub weekdays: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub subject: Option<Subject>,
    pub name: Option<String>,
    pub duration: Option<u32>,
    pub points: Option<u32>,
    pub status: Option<TaskStatus>,
    pub date: Option<String>,
    pub actual_duration: Option<u32>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteTaskRequest {
    pub actual_seconds: u32,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: Task,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteTaskResponse {
    pub task: Task,
    pub points_awarded: u32,
    /// Child after the award, when points were awarded
    pub child: Option<Child>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListRequest {
    pub child_id: Option<String>,
    pub date: String,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueTasksRequest {
    pub child_id: Option<String>,
    /// Defaults to today
    pub current_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCountsRequest {
    pub child_id: Option<String>,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCountsResponse {
    pub child_id: String,
    pub date: String,
    pub pending: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElapsedTimeResponse {
    pub task_id: String,
    pub elapsed_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRequest {
    pub child_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGradeRequest {
    pub child_id: Option<String>,
    pub subject: Subject,
    pub exam_type: String,
    pub exam_name: String,
    pub date: String,
    pub score: f64,
    pub total_score: f64,
    pub target_score: Option<f64>,
    pub evaluation: Evaluation,
    pub class_rank: Option<u32>,
    #[serde(default)]
    pub weak_points: Vec<WeakPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeListRequest {
    pub child_id: Option<String>,
    pub subject: Option<Subject>,
    /// Four digit year, e.g. "2026"
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeListResponse {
    pub grades: Vec<Grade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResponse {
    pub grade: Grade,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRewardRequest {
    pub name: String,
    pub points: u32,
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateRewardRequest {
    pub name: Option<String>,
    pub points: Option<u32>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardListResponse {
    pub rewards: Vec<Reward>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCsvRequest {
    pub child_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDataResponse {
    pub users_imported: Option<usize>,
    pub tasks_imported: Option<usize>,
    pub rewards_imported: Option<usize>,
    pub grades_imported: Option<usize>,
    pub success_message: String,
}

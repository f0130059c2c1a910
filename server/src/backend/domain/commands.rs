//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined
//! in the `shared` crate to these internal types.

pub mod tasks {
    use chrono::NaiveDate;
    use shared::{RepeatType, Subject, TaskStatus};

    use crate::backend::domain::models::child::Child;
    use crate::backend::domain::models::task::Task;

    /// Fields supplied when creating a task; id, status and timestamp are assigned.
    #[derive(Debug, Clone)]
    pub struct NewTask {
        pub user_id: String,
        pub child_id: String,
        pub subject: Subject,
        pub name: String,
        pub duration: u32,
        pub points: u32,
        pub date: NaiveDate,
    }

    /// Partial update merged into an existing task.
    #[derive(Debug, Clone, Default)]
    pub struct TaskUpdate {
        pub subject: Option<Subject>,
        pub name: Option<String>,
        pub duration: Option<u32>,
        pub points: Option<u32>,
        pub status: Option<TaskStatus>,
        pub date: Option<NaiveDate>,
        pub actual_duration: Option<u32>,
        pub summary: Option<String>,
    }

    /// A task template expanded over a range of days.
    #[derive(Debug, Clone)]
    pub struct PlanTasksCommand {
        /// Template; its date is the first day of the plan
        pub task: NewTask,
        pub repeat: RepeatType,
        pub until: Option<NaiveDate>,
        /// 0 = Sunday ... 6 = Saturday, used by `RepeatType::Custom`
        pub weekdays: Vec<u8>,
    }

    /// Outcome of recording a completion.
    #[derive(Debug, Clone)]
    pub struct TaskCompletion {
        pub task: Task,
        /// True when the task had never been completed before
        pub first_completion: bool,
    }

    /// Completion plus the points it paid out.
    #[derive(Debug, Clone)]
    pub struct CheckInResult {
        pub task: Task,
        pub points_awarded: u32,
        pub child: Option<Child>,
    }
}

pub mod accounts {
    /// Input for registering a new account.
    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub phone: String,
        pub password: String,
        pub username: Option<String>,
    }

    /// Partial account update; children are managed separately.
    #[derive(Debug, Clone, Default)]
    pub struct AccountUpdate {
        pub username: Option<String>,
        pub phone: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct NewChild {
        pub name: String,
        pub grade: u8,
        pub avatar: Option<String>,
    }

    /// Partial child update. Growth fields are always recomputed.
    #[derive(Debug, Clone, Default)]
    pub struct ChildUpdate {
        pub name: Option<String>,
        pub grade: Option<u8>,
        pub avatar: Option<String>,
        pub points: Option<u32>,
        pub monthly_points: Option<u32>,
    }

    #[derive(Debug, Clone)]
    pub struct NewReward {
        pub name: String,
        pub points: u32,
        pub icon: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct RewardUpdate {
        pub name: Option<String>,
        pub points: Option<u32>,
        pub icon: Option<String>,
        pub description: Option<String>,
    }
}

pub mod grades {
    use chrono::NaiveDate;
    use shared::{Evaluation, Subject, WeakPoint};

    #[derive(Debug, Clone)]
    pub struct NewGrade {
        pub child_id: String,
        pub subject: Subject,
        pub exam_type: String,
        pub exam_name: String,
        pub date: NaiveDate,
        pub score: f64,
        pub total_score: f64,
        pub target_score: Option<f64>,
        pub evaluation: Evaluation,
        pub class_rank: Option<u32>,
        pub weak_points: Vec<WeakPoint>,
    }

    /// Query for listing a child's grades.
    #[derive(Debug, Clone, Default)]
    pub struct GradeFilter {
        pub subject: Option<Subject>,
        pub year: Option<i32>,
    }
}

pub mod data {
    /// Number of records written per imported section; `None` when absent.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ImportSummary {
        pub users: Option<usize>,
        pub tasks: Option<usize>,
        pub rewards: Option<usize>,
        pub grades: Option<usize>,
    }
}

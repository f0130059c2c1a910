use chrono::SecondsFormat;
use shared::{CreateTaskRequest, PlanTasksRequest, Task as SharedTask, UpdateTaskRequest};

use super::{format_date, parse_date};
use crate::backend::domain::commands::tasks::{NewTask, PlanTasksCommand, TaskUpdate};
use crate::backend::domain::models::task::Task as DomainTask;
use crate::backend::domain::DomainResult;

/// Mapper to convert between shared Task DTOs and domain Task models.
pub struct TaskMapper;

impl TaskMapper {
    pub fn to_dto(domain: DomainTask) -> SharedTask {
        SharedTask {
            id: domain.id,
            user_id: domain.user_id,
            child_id: domain.child_id,
            subject: domain.subject,
            name: domain.name,
            duration: domain.duration,
            points: domain.points,
            status: domain.status,
            date: format_date(domain.date),
            actual_duration: domain.actual_duration,
            summary: domain.summary,
            created_at: domain.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainTask>) -> Vec<SharedTask> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    /// The child must already be resolved against the account
    pub fn to_new_task(user_id: &str, child_id: &str, request: CreateTaskRequest) -> DomainResult<NewTask> {
        Ok(NewTask {
            user_id: user_id.to_string(),
            child_id: child_id.to_string(),
            subject: request.subject,
            name: request.name,
            duration: request.duration,
            points: request.points,
            date: parse_date(&request.date, "date")?,
        })
    }

    pub fn to_plan_command(user_id: &str, child_id: &str, request: PlanTasksRequest) -> DomainResult<PlanTasksCommand> {
        let until = request
            .until
            .as_deref()
            .map(|until| parse_date(until, "until"))
            .transpose()?;

        Ok(PlanTasksCommand {
            task: NewTask {
                user_id: user_id.to_string(),
                child_id: child_id.to_string(),
                subject: request.subject,
                name: request.name,
                duration: request.duration,
                points: request.points,
                date: parse_date(&request.date, "date")?,
            },
            repeat: request.repeat,
            until,
            weekdays: request.weekdays,
        })
    }

    pub fn to_task_update(request: UpdateTaskRequest) -> DomainResult<TaskUpdate> {
        let date = request
            .date
            .as_deref()
            .map(|date| parse_date(date, "date"))
            .transpose()?;

        Ok(TaskUpdate {
            subject: request.subject,
            name: request.name,
            duration: request.duration,
            points: request.points,
            status: request.status,
            date,
            actual_duration: request.actual_duration,
            summary: request.summary,
        })
    }
}

//! Task check-in: records a completion and pays the task's points.
//!
//! Points are paid on the first completion only. A retried task records its
//! new elapsed time without paying again.

use log::{info, warn};

use crate::backend::domain::account_service::AccountService;
use crate::backend::domain::commands::tasks::CheckInResult;
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::task_service::TaskService;

#[derive(Clone)]
pub struct CheckInService {
    task_service: TaskService,
    account_service: AccountService,
}

impl CheckInService {
    pub fn new(task_service: TaskService, account_service: AccountService) -> Self {
        Self {
            task_service,
            account_service,
        }
    }

    /// Complete a task of `account_id` and award its points.
    ///
    /// `None` when the account has no such task.
    pub async fn complete_task(
        &self,
        account_id: &str,
        task_id: &str,
        actual_seconds: u32,
        summary: Option<String>,
    ) -> DomainResult<Option<CheckInResult>> {
        info!("Check-in of task {} for account {}", task_id, account_id);

        if self.task_service.get_task(account_id, task_id).await.is_none() {
            warn!("Task {} does not belong to account {}", task_id, account_id);
            return Ok(None);
        }

        let Some(completion) = self
            .task_service
            .complete_task(task_id, actual_seconds, summary)
            .await?
        else {
            return Ok(None);
        };

        let task = completion.task;
        if !completion.first_completion || task.points == 0 {
            info!("Task {} pays no points on this completion", task.id);
            let child = self.account_service.resolve_child(account_id, Some(&task.child_id)).await.ok();
            return Ok(Some(CheckInResult {
                task,
                points_awarded: 0,
                child,
            }));
        }

        match self
            .account_service
            .award_points(account_id, &task.child_id, task.points)
            .await
        {
            Ok(child) => Ok(Some(CheckInResult {
                points_awarded: task.points,
                task,
                child: Some(child),
            })),
            Err(DomainError::NotFound(what)) => {
                warn!(
                    "{} not found while awarding task {}, points not paid",
                    what, task.id
                );
                Ok(Some(CheckInResult {
                    task,
                    points_awarded: 0,
                    child: None,
                }))
            }
            Err(e) => Err(e),
        }
    }
}

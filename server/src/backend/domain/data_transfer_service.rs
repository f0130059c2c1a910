//! Backup export/import, plus a CSV task report.
//!
//! Over the API an account only ever sees its own slice: its user entry,
//! its tasks, its children's grades and the shared reward catalogue.
//! Importing checks the complete bundle before writing anything, then
//! replaces only the sections the bundle carries. The full document set
//! is exported from the command line only.

use anyhow::{anyhow, Context};
use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backend::domain::account_service::AccountService;
use crate::backend::domain::commands::data::ImportSummary;
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::grade_service::GradeService;
use crate::backend::domain::models::account::Account;
use crate::backend::domain::models::grade::Grade;
use crate::backend::domain::models::reward::Reward;
use crate::backend::domain::models::task::Task;
use crate::backend::domain::reward_service::RewardService;
use crate::backend::domain::task_service::TaskService;
use crate::backend::storage::{load_collection, load_document, DocumentKey, DocumentStorage};

pub const EXPORT_VERSION: &str = "1.0";

/// CSV header of the task report
pub const TASK_CSV_HEADER: [&str; 8] = [
    "date",
    "subject",
    "name",
    "status",
    "planned_minutes",
    "actual_minutes",
    "points",
    "summary",
];

/// A backup as written by `export` and `export_account`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub users: Vec<Account>,
    pub tasks: Vec<Task>,
    pub rewards: Vec<Reward>,
    pub grades: Vec<Grade>,
}

/// Import bundle; any section may be missing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    users: Option<Vec<Account>>,
    #[serde(default)]
    tasks: Option<Vec<Task>>,
    #[serde(default)]
    rewards: Option<Vec<Reward>>,
    #[serde(default)]
    grades: Option<Vec<Grade>>,
}

#[derive(Clone)]
pub struct DataTransferService {
    storage: Arc<dyn DocumentStorage>,
    account_service: AccountService,
    task_service: TaskService,
    reward_service: RewardService,
    grade_service: GradeService,
}

impl DataTransferService {
    pub fn new(
        storage: Arc<dyn DocumentStorage>,
        account_service: AccountService,
        task_service: TaskService,
        reward_service: RewardService,
        grade_service: GradeService,
    ) -> Self {
        Self {
            storage,
            account_service,
            task_service,
            reward_service,
            grade_service,
        }
    }

    /// Snapshot of every persisted document
    pub async fn export(&self) -> DomainResult<ExportDocument> {
        info!("Building full backup document");

        let storage = self.storage.as_ref();
        let document = ExportDocument {
            version: EXPORT_VERSION.to_string(),
            export_date: export_timestamp(),
            token: load_document(storage, DocumentKey::Token).await?,
            users: load_collection(storage, DocumentKey::Users).await?,
            tasks: load_collection(storage, DocumentKey::Tasks).await?,
            rewards: load_collection(storage, DocumentKey::Rewards).await?,
            grades: load_collection(storage, DocumentKey::Grades).await?,
        };

        log_export(&document);
        Ok(document)
    }

    /// Backup of one account: its own entry, tasks and grades, plus the
    /// reward catalogue. Never carries the session token.
    pub async fn export_account(&self, account_id: &str) -> DomainResult<ExportDocument> {
        info!("Building backup document for account {}", account_id);

        let account = self.account_service.get_account(account_id).await?;
        let child_ids = child_ids(&account);
        let document = ExportDocument {
            version: EXPORT_VERSION.to_string(),
            export_date: export_timestamp(),
            token: None,
            tasks: self.task_service.get_user_tasks(account_id).await,
            rewards: self.reward_service.list_rewards().await,
            grades: self.grade_service.grades_of_children(&child_ids).await,
            users: vec![account],
        };

        log_export(&document);
        Ok(document)
    }

    /// Write the full backup as `growtree_backup_<date>.json` into `directory`
    pub async fn export_to_directory(&self, directory: &Path) -> DomainResult<PathBuf> {
        info!("Writing backup to {}", directory.display());

        let document = self.export().await?;
        let contents = serde_json::to_string_pretty(&document).context("Failed to encode backup")?;

        fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create export directory {}", directory.display()))?;
        let path = directory.join(format!(
            "growtree_backup_{}.json",
            Local::now().format("%Y-%m-%d")
        ));
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Backup written to {}", path.display());
        Ok(path)
    }

    /// CSV report of a child's tasks in `start..=end`, oldest first
    pub async fn export_tasks_csv(
        &self,
        user_id: &str,
        child_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<String> {
        info!("Exporting task CSV for child {} from {} to {}", child_id, start, end);

        if start > end {
            return Err(DomainError::validation("Start date must not be after end date"));
        }

        let mut tasks = self
            .task_service
            .get_tasks_in_range(user_id, child_id, start, end)
            .await;
        tasks.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(TASK_CSV_HEADER)
            .context("Failed to write CSV header")?;

        for task in &tasks {
            let actual_minutes = task
                .actual_duration
                .map(|seconds| ((seconds as f64) / 60.0).round().to_string())
                .unwrap_or_default();
            writer
                .write_record([
                    task.date.format("%Y-%m-%d").to_string(),
                    task.subject.to_string(),
                    task.name.clone(),
                    task.status.to_string(),
                    task.duration.to_string(),
                    actual_minutes,
                    task.points.to_string(),
                    task.summary.clone().unwrap_or_default(),
                ])
                .with_context(|| format!("Failed to write CSV row for task {}", task.id))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to finish CSV: {}", e))?;
        let csv_content = String::from_utf8(bytes).context("CSV output is not UTF-8")?;

        info!("{} tasks written as CSV", tasks.len());
        Ok(csv_content)
    }

    /// Restore a backup into one account.
    ///
    /// The bundle must carry a `version`. Sections present replace that
    /// account's part of the store, absent sections are left as they are.
    /// A bundle naming another account, its tasks or its children is
    /// rejected as a whole. Rewards are merged into the catalogue by id.
    pub async fn import(&self, account_id: &str, contents: &str) -> DomainResult<ImportSummary> {
        info!("Importing backup into account {} ({} bytes)", account_id, contents.len());

        let document: ImportDocument = serde_json::from_str(contents).map_err(|e| {
            error!("Backup could not be decoded: {}", e);
            DomainError::InvalidImport(e.to_string())
        })?;

        match document.version.as_deref().map(str::trim) {
            Some(version) if !version.is_empty() => {
                if version != EXPORT_VERSION {
                    warn!("Backup version {} differs from {}, importing as is", version, EXPORT_VERSION);
                }
            }
            _ => {
                error!("Backup has no version");
                return Err(DomainError::InvalidImport("missing version".to_string()));
            }
        }

        if document.token.is_some() {
            warn!("Ignoring session token in backup imported by account {}", account_id);
        }

        let current = self.account_service.get_account(account_id).await?;
        let imported_account = match document.users {
            Some(users) => Some(Self::own_account(account_id, users)?),
            None => None,
        };

        let roster = child_ids(imported_account.as_ref().unwrap_or(&current));
        if let Some(tasks) = &document.tasks {
            if let Some(foreign) = tasks.iter().find(|t| t.user_id != account_id) {
                return Err(reject(format!("task {} belongs to another account", foreign.id)));
            }
        }
        if let Some(grades) = &document.grades {
            if let Some(foreign) = grades.iter().find(|g| !roster.contains(&g.child_id)) {
                return Err(reject(format!("grade {} is for a child outside this account", foreign.id)));
            }
        }

        let mut summary = ImportSummary::default();
        let mut replaced_children = child_ids(&current);

        if let Some(account) = imported_account {
            self.account_service.replace_account(account).await?;
            summary.users = Some(1);
            for id in &roster {
                if !replaced_children.contains(id) {
                    replaced_children.push(id.clone());
                }
            }
        }
        if let Some(tasks) = document.tasks {
            summary.tasks = Some(self.task_service.replace_user_tasks(account_id, tasks).await?);
        }
        if let Some(grades) = document.grades {
            summary.grades = Some(self.grade_service.replace_child_grades(&replaced_children, grades).await?);
        }
        if let Some(rewards) = document.rewards {
            summary.rewards = Some(self.reward_service.merge_rewards(rewards).await?);
        }

        info!("Import into account {} finished: {:?}", account_id, summary);
        Ok(summary)
    }

    fn own_account(account_id: &str, mut users: Vec<Account>) -> DomainResult<Account> {
        match users.pop() {
            Some(account) if users.is_empty() && account.id == account_id => Ok(account),
            _ => Err(reject("users section may only hold the importing account".to_string())),
        }
    }
}

fn child_ids(account: &Account) -> Vec<String> {
    account.children.iter().map(|c| c.id.clone()).collect()
}

fn reject(reason: String) -> DomainError {
    error!("Backup rejected: {}", reason);
    DomainError::InvalidImport(reason)
}

fn export_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn log_export(document: &ExportDocument) {
    info!(
        "Exported {} users, {} tasks, {} rewards, {} grades",
        document.users.len(),
        document.tasks.len(),
        document.rewards.len(),
        document.grades.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::commands::accounts::{NewChild, NewReward, RegisterCommand};
    use crate::backend::domain::commands::grades::NewGrade;
    use crate::backend::domain::commands::tasks::NewTask;
    use crate::backend::storage::json::test_utils::TestEnvironment;
    use shared::{Evaluation, Subject};

    struct Fixture {
        env: TestEnvironment,
        accounts: AccountService,
        tasks: TaskService,
        rewards: RewardService,
        grades: GradeService,
        transfer: DataTransferService,
    }

    async fn setup_test() -> Fixture {
        let env = TestEnvironment::new().unwrap();
        let storage = env.storage();
        let accounts = AccountService::load(storage.clone()).await.unwrap();
        let tasks = TaskService::load(storage.clone()).await.unwrap();
        let rewards = RewardService::load(storage.clone()).await.unwrap();
        let grades = GradeService::load(storage.clone()).await.unwrap();
        let transfer = DataTransferService::new(
            storage,
            accounts.clone(),
            tasks.clone(),
            rewards.clone(),
            grades.clone(),
        );
        Fixture {
            env,
            accounts,
            tasks,
            rewards,
            grades,
            transfer,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_task(user_id: &str, child_id: &str, name: &str, day: &str) -> NewTask {
        NewTask {
            user_id: user_id.to_string(),
            child_id: child_id.to_string(),
            subject: Subject::Math,
            name: name.to_string(),
            duration: 30,
            points: 10,
            date: date(day),
        }
    }

    /// Registers an account with one child and one grade, returns (user, child)
    async fn register_family(fixture: &Fixture, phone: &str, child: &str) -> (String, String) {
        let account = fixture
            .accounts
            .register(RegisterCommand {
                phone: phone.to_string(),
                password: "secret123".to_string(),
                username: None,
            })
            .await
            .unwrap();
        let child = fixture
            .accounts
            .add_child(
                &account.id,
                NewChild {
                    name: child.to_string(),
                    grade: 3,
                    avatar: None,
                },
            )
            .await
            .unwrap();
        fixture
            .grades
            .add_grade(NewGrade {
                child_id: child.id.clone(),
                subject: Subject::Math,
                exam_type: String::new(),
                exam_name: "Midterm".to_string(),
                date: date("2026-01-15"),
                score: 90.0,
                total_score: 100.0,
                target_score: None,
                evaluation: Evaluation::Good,
                class_rank: None,
                weak_points: Vec::new(),
            })
            .await
            .unwrap();

        (account.id, child.id)
    }

    /// Two families; the first has two tasks, the second one. Returns the
    /// first family's (user, child)
    async fn seed(fixture: &Fixture) -> (String, String) {
        let (user_id, child_id) = register_family(fixture, "13800000000", "Xiaoming").await;
        for (name, day) in [("Poem, part 2", "2026-02-11"), ("Fractions", "2026-02-10")] {
            fixture.tasks.add_task(new_task(&user_id, &child_id, name, day)).await.unwrap();
        }

        let (other_user, other_child) = register_family(fixture, "13900000000", "Xiaohong").await;
        fixture
            .tasks
            .add_task(new_task(&other_user, &other_child, "Spelling", "2026-02-10"))
            .await
            .unwrap();

        fixture
            .rewards
            .add_reward(NewReward {
                name: "Park trip".to_string(),
                points: 100,
                icon: None,
                description: None,
            })
            .await
            .unwrap();

        (user_id, child_id)
    }

    async fn other_user(fixture: &Fixture) -> Account {
        let (_, account) = fixture.accounts.login("13900000000", "secret123").await.unwrap();
        account
    }

    #[tokio::test]
    async fn test_export_account_holds_only_its_own_data() {
        let fixture = setup_test().await;
        let (user_id, child_id) = seed(&fixture).await;

        let exported = fixture.transfer.export_account(&user_id).await.unwrap();
        assert_eq!(exported.version, EXPORT_VERSION);
        assert!(exported.token.is_none());
        assert_eq!(exported.users.len(), 1);
        assert_eq!(exported.users[0].id, user_id);
        assert_eq!(exported.tasks.len(), 2);
        assert!(exported.tasks.iter().all(|t| t.user_id == user_id));
        assert_eq!(exported.grades.len(), 1);
        assert_eq!(exported.grades[0].child_id, child_id);
        assert_eq!(exported.rewards.len(), 1);

        // The command line backup still holds everything
        let full = fixture.transfer.export().await.unwrap();
        assert_eq!(full.users.len(), 2);
        assert_eq!(full.tasks.len(), 3);
        assert_eq!(full.grades.len(), 2);
    }

    #[tokio::test]
    async fn test_export_then_import_restores_account() {
        let fixture = setup_test().await;
        let (user_id, child_id) = seed(&fixture).await;
        let exported = fixture.transfer.export_account(&user_id).await.unwrap();
        let json = serde_json::to_string(&exported).unwrap();

        for task in fixture.tasks.get_user_tasks(&user_id).await {
            fixture.tasks.delete_task(&task.id).await.unwrap();
        }
        fixture
            .tasks
            .add_task(new_task(&user_id, &child_id, "Scratch work", "2026-02-12"))
            .await
            .unwrap();
        fixture.accounts.award_points(&user_id, &child_id, 40).await.unwrap();

        let summary = fixture.transfer.import(&user_id, &json).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                users: Some(1),
                tasks: Some(2),
                rewards: Some(1),
                grades: Some(1),
            }
        );

        let mut names: Vec<String> = fixture
            .tasks
            .get_user_tasks(&user_id)
            .await
            .into_iter()
            .map(|t| t.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Fractions", "Poem, part 2"]);

        let account = fixture.accounts.get_account(&user_id).await.unwrap();
        assert_eq!(account.children[0].points, 0);
        assert_eq!(fixture.rewards.list_rewards().await.len(), 1);

        // The other family is untouched
        let other = other_user(&fixture).await;
        assert_eq!(fixture.tasks.get_user_tasks(&other.id).await.len(), 1);
        assert_eq!(fixture.grades.grades_of_children(&[other.children[0].id.clone()]).await.len(), 1);

        // Everything was persisted
        let reopened = TaskService::load(fixture.env.storage()).await.unwrap();
        assert_eq!(reopened.get_user_tasks(&user_id).await.len(), 2);
        assert_eq!(reopened.get_user_tasks(&other.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_import_without_version_changes_nothing() {
        let fixture = setup_test().await;
        let (user_id, _) = seed(&fixture).await;
        let before = fixture.env.storage().read_document(DocumentKey::Tasks).await.unwrap();

        let result = fixture.transfer.import(&user_id, r#"{"tasks": []}"#).await;
        assert!(matches!(result, Err(DomainError::InvalidImport(_))));

        let garbage = fixture.transfer.import(&user_id, "not json").await;
        assert!(matches!(garbage, Err(DomainError::InvalidImport(_))));

        let after = fixture.env.storage().read_document(DocumentKey::Tasks).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_import_only_replaces_own_sections() {
        let fixture = setup_test().await;
        let (user_id, _) = seed(&fixture).await;
        let other = other_user(&fixture).await;

        let summary = fixture
            .transfer
            .import(&user_id, r#"{"version": "1.0", "tasks": []}"#)
            .await
            .unwrap();
        assert_eq!(summary.tasks, Some(0));
        assert_eq!(summary.users, None);

        assert!(fixture.tasks.get_user_tasks(&user_id).await.is_empty());
        assert_eq!(fixture.tasks.get_user_tasks(&other.id).await.len(), 1);
        assert!(fixture.accounts.get_account(&user_id).await.is_ok());
        assert_eq!(fixture.rewards.list_rewards().await.len(), 1);
    }

    #[tokio::test]
    async fn test_import_rejects_other_accounts_data() {
        let fixture = setup_test().await;
        let (user_id, _) = seed(&fixture).await;
        let other = other_user(&fixture).await;
        let before = fixture.transfer.export().await.unwrap();

        let theirs = fixture.transfer.export_account(&other.id).await.unwrap();
        let whole = serde_json::to_string(&theirs).unwrap();
        let users_only = serde_json::json!({"version": "1.0", "users": theirs.users}).to_string();
        let tasks_only = serde_json::json!({"version": "1.0", "tasks": theirs.tasks}).to_string();
        let grades_only = serde_json::json!({"version": "1.0", "grades": theirs.grades}).to_string();

        for contents in [whole, users_only, tasks_only, grades_only] {
            let result = fixture.transfer.import(&user_id, &contents).await;
            assert!(matches!(result, Err(DomainError::InvalidImport(_))));
        }

        let after = fixture.transfer.export().await.unwrap();
        assert_eq!(before.users, after.users);
        assert_eq!(before.tasks, after.tasks);
        assert_eq!(before.grades, after.grades);
    }

    #[tokio::test]
    async fn test_import_ignores_session_token() {
        let fixture = setup_test().await;
        let (user_id, _) = seed(&fixture).await;
        let other = other_user(&fixture).await;
        let (token, _) = fixture.accounts.login("13900000000", "secret123").await.unwrap();

        let contents = serde_json::json!({"version": "1.0", "token": "forged"}).to_string();
        let summary = fixture.transfer.import(&user_id, &contents).await.unwrap();
        assert_eq!(summary, ImportSummary::default());

        let stored: Option<String> = load_document(fixture.env.storage().as_ref(), DocumentKey::Token)
            .await
            .unwrap();
        assert_eq!(stored, Some(token));
        assert_eq!(fixture.accounts.restore_session().await.unwrap().map(|a| a.id), Some(other.id));
    }

    #[tokio::test]
    async fn test_export_to_directory() {
        let fixture = setup_test().await;
        seed(&fixture).await;

        let target = fixture.env.base_path.join("backups");
        let path = fixture.transfer.export_to_directory(&target).await.unwrap();

        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("growtree_backup_"));
        assert!(file_name.ends_with(".json"));

        let written: ExportDocument = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.tasks.len(), 3);
    }

    #[tokio::test]
    async fn test_export_tasks_csv() {
        let fixture = setup_test().await;
        let (user_id, child_id) = seed(&fixture).await;

        let task = fixture
            .tasks
            .get_tasks_by_date(&user_id, &child_id, date("2026-02-10"))
            .await
            .remove(0);
        fixture
            .tasks
            .complete_task(&task.id, 1530, Some("Easy".to_string()))
            .await
            .unwrap();

        let csv = fixture
            .transfer
            .export_tasks_csv(&user_id, &child_id, date("2026-02-01"), date("2026-02-28"))
            .await
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "date,subject,name,status,planned_minutes,actual_minutes,points,summary"
        );
        assert_eq!(lines[1], "2026-02-10,math,Fractions,completed,30,26,10,Easy");
        assert_eq!(lines[2], "2026-02-11,math,\"Poem, part 2\",pending,30,,10,");
    }
}

use anyhow::Result;
use chrono::Datelike;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::domain::commands::grades::{GradeFilter, NewGrade};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::grade::Grade;
use crate::backend::storage::{load_collection, save_document, DocumentKey, DocumentStorage};

/// Exam type recorded when none is given
pub const DEFAULT_EXAM_TYPE: &str = "unit";

/// Service for exam grade records
#[derive(Clone)]
pub struct GradeService {
    storage: Arc<dyn DocumentStorage>,
    grades: Arc<RwLock<Vec<Grade>>>,
}

impl GradeService {
    pub async fn load(storage: Arc<dyn DocumentStorage>) -> Result<Self> {
        let grades: Vec<Grade> = load_collection(storage.as_ref(), DocumentKey::Grades).await?;
        info!("Loaded {} grades", grades.len());

        Ok(Self {
            storage,
            grades: Arc::new(RwLock::new(grades)),
        })
    }

    /// Swap the grades of the given children for `imported` in one write
    pub async fn replace_child_grades(&self, child_ids: &[String], imported: Vec<Grade>) -> DomainResult<usize> {
        info!("Replacing grades of {} children with {} imported grades", child_ids.len(), imported.len());

        let mut grades = self.grades.write().await;
        let count = imported.len();
        let mut updated = imported;
        updated.extend(grades.iter().filter(|g| !child_ids.contains(&g.child_id)).cloned());
        save_document(self.storage.as_ref(), DocumentKey::Grades, &updated).await?;
        *grades = updated;

        Ok(count)
    }

    /// Record an exam result
    pub async fn add_grade(&self, command: NewGrade) -> DomainResult<Grade> {
        info!(
            "Adding {} grade '{}' for child {}",
            command.subject, command.exam_name, command.child_id
        );
        Self::validate(&command)?;

        let exam_type = match command.exam_type.trim() {
            "" => DEFAULT_EXAM_TYPE.to_string(),
            exam_type => exam_type.to_string(),
        };

        let grade = Grade {
            id: Grade::generate_id(),
            child_id: command.child_id,
            subject: command.subject,
            exam_type,
            exam_name: command.exam_name.trim().to_string(),
            date: command.date,
            score: command.score,
            total_score: command.total_score,
            target_score: command.target_score,
            evaluation: command.evaluation,
            class_rank: command.class_rank,
            weak_points: command.weak_points,
        };

        let mut grades = self.grades.write().await;
        let mut updated = grades.clone();
        updated.push(grade.clone());
        save_document(self.storage.as_ref(), DocumentKey::Grades, &updated).await?;
        *grades = updated;

        info!("Added grade {}", grade.id);
        Ok(grade)
    }

    pub async fn get_grade(&self, grade_id: &str) -> Option<Grade> {
        self.grades
            .read()
            .await
            .iter()
            .find(|g| g.id == grade_id)
            .cloned()
    }

    /// Every grade recorded for one of the given children
    pub async fn grades_of_children(&self, child_ids: &[String]) -> Vec<Grade> {
        self.grades
            .read()
            .await
            .iter()
            .filter(|g| child_ids.contains(&g.child_id))
            .cloned()
            .collect()
    }

    /// A child's grades matching the filter, newest exam first
    pub async fn list_grades(&self, child_id: &str, filter: &GradeFilter) -> Vec<Grade> {
        let mut grades: Vec<Grade> = self
            .grades
            .read()
            .await
            .iter()
            .filter(|g| g.child_id == child_id)
            .filter(|g| filter.subject.map_or(true, |subject| g.subject == subject))
            .filter(|g| filter.year.map_or(true, |year| g.date.year() == year))
            .cloned()
            .collect();

        grades.sort_by(|a, b| b.date.cmp(&a.date));
        grades
    }

    pub async fn delete_grade(&self, grade_id: &str) -> DomainResult<bool> {
        info!("Deleting grade {}", grade_id);

        let mut grades = self.grades.write().await;
        if !grades.iter().any(|g| g.id == grade_id) {
            warn!("Grade not found for delete: {}", grade_id);
            return Ok(false);
        }

        let updated: Vec<Grade> = grades.iter().filter(|g| g.id != grade_id).cloned().collect();
        save_document(self.storage.as_ref(), DocumentKey::Grades, &updated).await?;
        *grades = updated;

        Ok(true)
    }

    fn validate(command: &NewGrade) -> DomainResult<()> {
        if command.exam_name.trim().is_empty() {
            return Err(DomainError::validation("Exam name cannot be empty"));
        }
        if !(command.total_score > 0.0) {
            return Err(DomainError::validation("Total score must be greater than zero"));
        }
        if !(0.0..=command.total_score).contains(&command.score) {
            return Err(DomainError::validation("Score must be between 0 and the total score"));
        }
        if let Some(target) = command.target_score {
            if !(0.0..=command.total_score).contains(&target) {
                return Err(DomainError::validation("Target score must be between 0 and the total score"));
            }
        }
        Ok(())
    }
}

use shared::{CreateGradeRequest, Grade as SharedGrade, GradeListRequest};

use super::{format_date, parse_date};
use crate::backend::domain::commands::grades::{GradeFilter, NewGrade};
use crate::backend::domain::models::grade::Grade as DomainGrade;
use crate::backend::domain::{DomainError, DomainResult};

/// Mapper to convert between shared Grade DTOs and domain Grade models.
pub struct GradeMapper;

impl GradeMapper {
    pub fn to_dto(domain: DomainGrade) -> SharedGrade {
        SharedGrade {
            id: domain.id,
            child_id: domain.child_id,
            subject: domain.subject,
            exam_type: domain.exam_type,
            exam_name: domain.exam_name,
            date: format_date(domain.date),
            score: domain.score,
            total_score: domain.total_score,
            target_score: domain.target_score,
            evaluation: domain.evaluation,
            class_rank: domain.class_rank,
            weak_points: domain.weak_points,
        }
    }

    pub fn to_new_grade(child_id: &str, request: CreateGradeRequest) -> DomainResult<NewGrade> {
        Ok(NewGrade {
            child_id: child_id.to_string(),
            subject: request.subject,
            exam_type: request.exam_type,
            exam_name: request.exam_name,
            date: parse_date(&request.date, "date")?,
            score: request.score,
            total_score: request.total_score,
            target_score: request.target_score,
            evaluation: request.evaluation,
            class_rank: request.class_rank,
            weak_points: request.weak_points,
        })
    }

    pub fn to_filter(request: &GradeListRequest) -> DomainResult<GradeFilter> {
        let year = match request.year.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(year) => Some(
                year.parse::<i32>()
                    .map_err(|_| DomainError::validation(format!("Invalid year: '{}'", year)))?,
            ),
        };

        Ok(GradeFilter {
            subject: request.subject,
            year,
        })
    }
}

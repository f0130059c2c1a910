//! Domain model for an exam grade record.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Evaluation, Subject, WeakPoint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub child_id: String,
    pub subject: Subject,
    pub exam_type: String,
    pub exam_name: String,
    pub date: NaiveDate,
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

impl Grade {
    pub fn generate_id() -> String {
        super::generate_id("grade")
    }
}

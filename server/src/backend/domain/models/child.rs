//! Domain model for a child profile.
use serde::{Deserialize, Serialize};

use crate::backend::domain::growth;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    /// School grade, 1-12
    pub grade: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Lifetime points
    pub points: u32,
    pub growth_level: u8,
    pub growth_name: String,
    pub monthly_points: u32,
}

impl Child {
    pub const MIN_GRADE: u8 = 1;
    pub const MAX_GRADE: u8 = 12;

    pub fn generate_id() -> String {
        super::generate_id("child")
    }

    /// A fresh child at the bottom of the growth ladder
    pub fn new(id: String, name: String, grade: u8, avatar: Option<String>) -> Self {
        let mut child = Self {
            id,
            name,
            grade,
            avatar,
            points: 0,
            growth_level: 0,
            growth_name: String::new(),
            monthly_points: 0,
        };
        child.refresh_growth();
        child
    }

    pub fn is_valid_grade(grade: u8) -> bool {
        (Self::MIN_GRADE..=Self::MAX_GRADE).contains(&grade)
    }

    /// Recompute growth level and name from monthly points.
    /// Must run after every change to `monthly_points`.
    pub fn refresh_growth(&mut self) {
        let stage = growth::stage_for_points(self.monthly_points);
        self.growth_level = stage.level;
        self.growth_name = stage.name.to_string();
    }

    /// Add earned points to both the lifetime and monthly counters
    pub fn award(&mut self, points: u32) {
        self.points = self.points.saturating_add(points);
        self.monthly_points = self.monthly_points.saturating_add(points);
        self.refresh_growth();
    }
}

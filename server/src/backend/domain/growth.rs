//! Growth ladder derivation.
//!
//! Children climb six stages driven by their monthly points. The stored
//! `growth_level` selects the displayed stage; progress towards the next
//! stage compares monthly points against that stage's threshold.

use shared::GrowthProgress;

use super::models::child::Child;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthStage {
    pub level: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub min_points: u32,
    /// Exclusive upper bound, `None` for the last stage
    pub max_points: Option<u32>,
}

pub const GROWTH_STAGES: [GrowthStage; 6] = [
    GrowthStage { level: 1, name: "种子", description: "播下希望的种子", min_points: 0, max_points: Some(30) },
    GrowthStage { level: 2, name: "小芽", description: "破土而出，开始成长", min_points: 30, max_points: Some(100) },
    GrowthStage { level: 3, name: "幼苗", description: "茁壮成长，充满活力", min_points: 100, max_points: Some(200) },
    GrowthStage { level: 4, name: "小树", description: "枝繁叶茂，日渐茁壮", min_points: 200, max_points: Some(350) },
    GrowthStage { level: 5, name: "大树", description: "参天大树，硕果累累", min_points: 350, max_points: Some(500) },
    GrowthStage { level: 6, name: "森林", description: "郁郁葱葱，生机盎然", min_points: 500, max_points: None },
];

/// Highest stage whose level does not exceed `growth_level`
pub fn current_stage(growth_level: u8) -> &'static GrowthStage {
    GROWTH_STAGES
        .iter()
        .rev()
        .find(|stage| stage.level <= growth_level)
        .unwrap_or(&GROWTH_STAGES[0])
}

/// First stage above `growth_level`
pub fn next_stage(growth_level: u8) -> Option<&'static GrowthStage> {
    GROWTH_STAGES.iter().find(|stage| stage.level > growth_level)
}

/// Stage whose point range contains `monthly_points`
pub fn stage_for_points(monthly_points: u32) -> &'static GrowthStage {
    GROWTH_STAGES
        .iter()
        .rev()
        .find(|stage| monthly_points >= stage.min_points)
        .unwrap_or(&GROWTH_STAGES[0])
}

/// Percentage towards the next stage, clamped to 0-100
pub fn progress_to_next(growth_level: u8, monthly_points: u32) -> f64 {
    let current = current_stage(growth_level);
    let Some(next) = next_stage(growth_level) else {
        return 100.0;
    };

    let span = f64::from(next.min_points) - f64::from(current.min_points);
    if span <= 0.0 {
        return 100.0;
    }

    let gained = f64::from(monthly_points) - f64::from(current.min_points);
    (gained * 100.0 / span).clamp(0.0, 100.0)
}

/// Points still missing before the next stage, 0 at the top
pub fn points_needed(growth_level: u8, monthly_points: u32) -> u32 {
    next_stage(growth_level)
        .map(|next| next.min_points.saturating_sub(monthly_points))
        .unwrap_or(0)
}

/// Growth snapshot for display
pub fn progress_for(child: &Child) -> GrowthProgress {
    let stage = current_stage(child.growth_level);
    let next = next_stage(child.growth_level);

    GrowthProgress {
        child_id: child.id.clone(),
        level: stage.level,
        name: stage.name.to_string(),
        description: stage.description.to_string(),
        monthly_points: child.monthly_points,
        next_level: next.map(|s| s.level),
        next_name: next.map(|s| s.name.to_string()),
        progress_to_next: progress_to_next(child.growth_level, child.monthly_points),
        points_needed: points_needed(child.growth_level, child.monthly_points),
    }
}

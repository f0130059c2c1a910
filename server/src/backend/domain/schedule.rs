//! Expansion of repeating study plans into concrete days.

use chrono::{Datelike, Duration, NaiveDate};
use shared::RepeatType;

use super::error::{DomainError, DomainResult};

/// Longest range a single plan may cover
pub const MAX_PLAN_DAYS: i64 = 366;

/// Days (inclusive of both ends) on which a plan produces a task.
///
/// Weekdays follow the 0 = Sunday ... 6 = Saturday convention.
pub fn plan_dates(
    start: NaiveDate,
    until: Option<NaiveDate>,
    repeat: RepeatType,
    weekdays: &[u8],
) -> DomainResult<Vec<NaiveDate>> {
    if repeat == RepeatType::Once {
        return Ok(vec![start]);
    }

    let until = until.ok_or_else(|| DomainError::validation("A repeating plan needs an end date"))?;
    if until < start {
        return Err(DomainError::validation("Plan end date is before its start date"));
    }
    if (until - start).num_days() >= MAX_PLAN_DAYS {
        return Err(DomainError::validation(format!(
            "A plan cannot span more than {} days",
            MAX_PLAN_DAYS
        )));
    }

    if repeat == RepeatType::Custom {
        if weekdays.is_empty() {
            return Err(DomainError::validation("A custom plan needs at least one weekday"));
        }
        if weekdays.iter().any(|day| *day > 6) {
            return Err(DomainError::validation("Weekdays must be between 0 (Sunday) and 6 (Saturday)"));
        }
    }

    let mut dates = Vec::new();
    let mut day = start;
    while day <= until {
        let weekday = day.weekday().num_days_from_sunday() as u8;
        let included = match repeat {
            RepeatType::Once => day == start,
            RepeatType::Daily => true,
            RepeatType::Weekday => (1..=5).contains(&weekday),
            RepeatType::Weekend => weekday == 0 || weekday == 6,
            RepeatType::Custom => weekdays.contains(&weekday),
        };
        if included {
            dates.push(day);
        }
        day += Duration::days(1);
    }

    Ok(dates)
}

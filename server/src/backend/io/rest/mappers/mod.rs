//! Conversions between the public DTOs in `shared` and domain models.
//!
//! DTOs carry dates as strings; parsing failures surface as validation
//! errors naming the offending field.

pub mod account_mapper;
pub mod child_mapper;
pub mod grade_mapper;
pub mod reward_mapper;
pub mod task_mapper;

use chrono::NaiveDate;

use crate::backend::domain::{DomainError, DomainResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar day
pub fn parse_date(value: &str, field: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::validation(format!("Invalid {}: '{}' (expected YYYY-MM-DD)", field, value)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

//! # REST API Interface Layer
//!
//! HTTP endpoints of the study tracker. Handlers authenticate the caller,
//! map public DTOs to domain commands, call one service and map the result
//! back. Domain errors become JSON `{"error": ...}` bodies with a status
//! code chosen by error kind.
//!
//! ## Routes (all under `/api`)
//!
//! - **auth**: register, login, logout
//! - **account**: the signed-in account
//! - **children**: roster, current-child selection, growth
//! - **tasks**: daily lists, planning, start/complete/cancel
//! - **statistics**, **grades**, **rewards**
//! - **data**: backup export/import and CSV reports

pub mod account_apis;
pub mod auth;
pub mod auth_apis;
pub mod child_apis;
pub mod data_apis;
pub mod error;
pub mod grade_apis;
pub mod mappers;
pub mod reward_apis;
pub mod statistics_apis;
pub mod task_apis;

use crate::backend::domain::models::account::Account;
use crate::backend::domain::models::child::Child;
use crate::backend::domain::{DomainError, DomainResult};

/// The named child of the account, or its current child when none is named
pub fn resolve_child(account: &Account, child_id: Option<&str>) -> DomainResult<Child> {
    account
        .resolve_child(child_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("Child"))
}

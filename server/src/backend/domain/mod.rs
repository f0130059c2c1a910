//! # Domain Module
//!
//! Business logic of the study tracker: tasks and their lifecycle, the
//! account roster with its children, growth stages, statistics, grades and
//! backup transfer. Services depend on storage only through the
//! `DocumentStorage` trait and know nothing about HTTP.
//!
//! ## Module Organization
//!
//! - **task_service**: the task store and the task state machine
//! - **check_in_service**: completion plus the one-time point award
//! - **account_service**: accounts, children, sessions
//! - **reward_service**: the shared reward catalogue
//! - **grade_service**: exam grade records
//! - **statistics_service**: aggregate study statistics
//! - **data_transfer_service**: backup export/import and CSV reports
//! - **growth**: the growth stage table and progress arithmetic
//! - **schedule**: expansion of repeating plans into days
//! - **session**: token encoding and password hashing
//! - **task_timer**: in-memory timers of running tasks
//!
//! ## Business Rules
//!
//! - A child runs at most one task at a time
//! - A task pays its points on its first completion only
//! - Growth level always follows the child's monthly points
//! - Every read is scoped to the signed-in account

pub mod account_service;
pub mod check_in_service;
pub mod commands;
pub mod data_transfer_service;
pub mod error;
pub mod grade_service;
pub mod growth;
pub mod models;
pub mod reward_service;
pub mod schedule;
pub mod session;
pub mod statistics_service;
pub mod task_service;
pub mod task_timer;

pub use account_service::AccountService;
pub use check_in_service::CheckInService;
pub use data_transfer_service::DataTransferService;
pub use error::{DomainError, DomainResult};
pub use grade_service::GradeService;
pub use reward_service::RewardService;
pub use statistics_service::StatisticsService;
pub use task_service::TaskService;

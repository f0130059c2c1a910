//! Persisted domain models.
//!
//! These are the shapes written to the JSON documents. Field names are
//! camelCase so existing exports keep loading.

pub mod account;
pub mod child;
pub mod grade;
pub mod reward;
pub mod task;

use chrono::Utc;
use uuid::Uuid;

/// Generate an id of the form `<prefix>::<epoch_millis>::<random>`.
///
/// The millisecond part keeps ids roughly ordered, the random suffix keeps
/// ids created within the same millisecond distinct.
pub fn generate_id(prefix: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}::{}::{}", prefix, Utc::now().timestamp_millis(), &random[..8])
}

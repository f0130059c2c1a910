//! GrowTree study tracker backend.
//!
//! Children's study tasks, check-ins, growth stages and statistics, kept in
//! namespaced JSON documents and served over a REST API.

pub mod backend;

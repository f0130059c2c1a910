//! # IO Module
//!
//! Interface layer between HTTP clients and the domain. It owns request
//! parsing, authentication, DTO mapping and the translation of domain
//! errors into status codes. No business rule lives here.

pub mod rest;

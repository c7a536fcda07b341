//! Domain logic for repair-case and warranty-work tracking.
//!
//! This crate has no database or HTTP dependencies. Everything here is pure
//! and evaluated against data the caller has already loaded, so the same
//! rules can be shared by repositories, handlers, and tests.

pub mod case_status;
pub mod error;
pub mod filters;
pub mod pagination;
pub mod presence;
pub mod references;
pub mod status_engine;
pub mod status_rules;
pub mod types;

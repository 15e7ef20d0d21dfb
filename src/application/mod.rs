//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows. Each use case is driven by one page or
//! form submission of the dashboard.

pub mod auth;
pub mod invoice;

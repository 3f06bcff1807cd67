//! HTTP request handlers, organized by resource.

pub mod health;
pub mod notifications;
pub mod routes;
pub mod tickets;

pub use health::{health_check, metrics, readiness_check};

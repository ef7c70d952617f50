//! HTTP API handlers.

pub mod health;
pub mod project;
pub mod schedule;

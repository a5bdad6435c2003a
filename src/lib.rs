//! Read-only market data API serving cached, filterable list endpoints.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;

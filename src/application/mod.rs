//! Application services and the seams they depend on.

pub mod api_keys;
pub mod error;
pub mod filters;
pub mod listing;
pub mod query;
pub mod repos;

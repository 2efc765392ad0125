//! Hosting API client and endpoint helpers

pub mod client;
pub mod deployments;
pub mod projects;

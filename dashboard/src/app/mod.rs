//! Application options and lifecycle

pub mod options;
pub mod run;

//! Models and helpers of the deploydash HTTP surface

pub mod html;
pub mod models;

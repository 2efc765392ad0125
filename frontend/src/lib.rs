//! Browser side of the deploydash dashboard
//!
//! The controller logic compiles for every target; the DOM bindings only
//! for `wasm32`.

pub mod controller;
pub mod errors;
pub mod render;

#[cfg(target_arch = "wasm32")]
mod web;

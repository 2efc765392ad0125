//! Models of the remote hosting API

pub mod models;

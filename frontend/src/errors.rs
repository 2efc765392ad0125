//! Error types of the browser controller

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("DOM error: {0}")]
    Dom(String),
}

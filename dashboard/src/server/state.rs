//! Server state

use std::sync::Arc;

use crate::http::client::ApiClient;

/// Server state shared across handlers
pub struct ServerState {
    pub api_client: Arc<ApiClient>,
}

impl ServerState {
    pub fn new(api_client: Arc<ApiClient>) -> Self {
        Self { api_client }
    }
}

//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::errors::DashError;
use crate::http::client::ApiClient;
use crate::server::serve::serve;
use crate::server::state::ServerState;

/// Run the dashboard until the shutdown signal resolves
///
/// Fails before binding anything when the API client cannot be configured.
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DashError> {
    info!("Initializing deploydash...");

    let api_client = match ApiClient::new(options.client.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to configure the API client: {}", e);
            return Err(e);
        }
    };
    info!(
        "Using hosting API {} for organization {}",
        api_client.endpoint(),
        api_client.org_id()
    );

    let state = Arc::new(ServerState::new(api_client));
    let handle = serve(&options.server, state, shutdown_signal).await?;

    let result = handle
        .await
        .map_err(|e| DashError::ServerError(e.to_string()))?;
    info!("deploydash stopped");
    result
}

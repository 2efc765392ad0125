//! HTTP server setup

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::DashError;
use crate::server::handlers::{
    deployment_handler, deployments_handler, health_handler, index_handler, project_handler,
};
use crate::server::state::ServerState;

/// Build the dashboard router; unmatched paths are served from `static_dir`
pub fn router(state: Arc<ServerState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/deployments", get(deployments_handler))
        .route("/deployment", post(deployment_handler))
        .route("/project", post(project_handler))
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), DashError>>, DashError> {
    let app = router(state, &options.static_dir);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| DashError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| DashError::ServerError(e.to_string()))
    });

    Ok(handle)
}

//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use openapi_server::models::{CreateProjectForm, DeployRequest, DeploymentsQuery, HealthResponse};
use tracing::{info, warn};

use crate::errors::DashError;
use crate::http::deployments::single_file_deployment;
use crate::server::page::render_index;
use crate::server::state::ServerState;
use crate::utils::version_info;

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "deploydash".to_string(),
        version: version.version,
    })
}

/// Dashboard page
pub async fn index_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Html<String>, DashError> {
    let projects = state.api_client.list_all_projects().await?;
    Ok(Html(render_index(&projects)))
}

/// Deployments of a project, forwarded as returned by the platform
pub async fn deployments_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<DeploymentsQuery>,
) -> Result<Response, DashError> {
    let response = state
        .api_client
        .list_deployments(&query.project_id, None)
        .await?;
    forward_json(response).await
}

/// Deploy the submitted code as a single-file deployment
pub async fn deployment_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<DeployRequest>,
) -> Result<Response, DashError> {
    let deployment = single_file_deployment(&request.code);
    let response = state
        .api_client
        .create_deployment(&request.project_id, &deployment)
        .await?;

    if response.status().is_success() {
        info!("Created deployment for project {}", request.project_id);
    }
    forward_json(response).await
}

/// Create a project and go back to the dashboard
pub async fn project_handler(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<CreateProjectForm>,
) -> Result<Redirect, DashError> {
    let response = state.api_client.create_project(form.name()).await?;

    let status = response.status();
    if status.is_success() {
        info!("Created project {}", form.name().unwrap_or("<generated>"));
    } else {
        let body = response.text().await.unwrap_or_default();
        warn!("Project creation failed: {} - {}", status, body);
    }

    Ok(Redirect::to("/"))
}

async fn forward_json(response: reqwest::Response) -> Result<Response, DashError> {
    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    Ok((status, Json(body)).into_response())
}

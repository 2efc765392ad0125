//! Deployment endpoints

use std::collections::BTreeMap;

use openapi_client::models::{AppLogsQuery, Asset, CreateDeploymentRequest, ListQuery};
use reqwest::Response;

use crate::errors::DashError;
use crate::http::client::{encode_query, ApiClient, RequestOptions};

/// Start file of single-file deployments
pub const ENTRY_POINT: &str = "main.ts";

/// Deployment request bundling `code` as the only asset
pub fn single_file_deployment(code: &str) -> CreateDeploymentRequest {
    let mut assets = BTreeMap::new();
    assets.insert(ENTRY_POINT.to_string(), Asset::utf8_file(code));

    CreateDeploymentRequest {
        entry_point_url: ENTRY_POINT.to_string(),
        assets,
        env_vars: BTreeMap::new(),
        ..Default::default()
    }
}

impl ApiClient {
    /// List the deployments of a project
    ///
    /// Ids are percent-encoded into a single path segment.
    pub async fn list_deployments(
        &self,
        project_id: &str,
        query: Option<&ListQuery>,
    ) -> Result<Response, DashError> {
        let path = format!(
            "/projects/{}/deployments?{}",
            urlencoding::encode(project_id),
            encode_query(query)?
        );
        self.fetch(&path, RequestOptions::get()).await
    }

    /// Create a deployment of a project
    pub async fn create_deployment(
        &self,
        project_id: &str,
        deployment: &CreateDeploymentRequest,
    ) -> Result<Response, DashError> {
        let path = format!(
            "/projects/{}/deployments",
            urlencoding::encode(project_id)
        );
        self.fetch(&path, RequestOptions::post_json(deployment)?).await
    }

    /// List the application logs of a deployment
    pub async fn list_app_logs(
        &self,
        deployment_id: &str,
        query: Option<&AppLogsQuery>,
    ) -> Result<Response, DashError> {
        let path = format!(
            "/deployments/{}/app_logs?{}",
            urlencoding::encode(deployment_id),
            encode_query(query)?
        );
        self.fetch(&path, RequestOptions::get()).await
    }
}

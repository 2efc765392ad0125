//! Project endpoints

use std::collections::HashSet;

use openapi_client::models::{CreateProjectRequest, ListQuery, Project};
use reqwest::Response;
use tracing::{debug, warn};

use crate::errors::DashError;
use crate::http::client::{encode_query, next_page_url, read_json, ApiClient, RequestOptions};

impl ApiClient {
    /// List the organization's projects
    pub async fn list_projects(&self, query: Option<&ListQuery>) -> Result<Response, DashError> {
        let path = format!(
            "/organizations/{}/projects?{}",
            urlencoding::encode(self.org_id()),
            encode_query(query)?
        );
        self.fetch(&path, RequestOptions::get()).await
    }

    /// Create a project, letting the platform pick a name when none is given
    pub async fn create_project(&self, name: Option<&str>) -> Result<Response, DashError> {
        let path = format!(
            "/organizations/{}/projects",
            urlencoding::encode(self.org_id())
        );
        let body = CreateProjectRequest {
            name: name.map(str::to_string),
            description: None,
        };
        self.fetch(&path, RequestOptions::post_json(&body)?).await
    }

    /// Every project of the organization, following `next` links
    pub async fn list_all_projects(&self) -> Result<Vec<Project>, DashError> {
        let mut projects = Vec::new();
        let mut seen = HashSet::new();
        let mut response = self.list_projects(None).await?;

        loop {
            let next = next_page_url(&response);
            let page: Vec<Project> = read_json(response).await?;
            projects.extend(page);

            let Some(url) = next else {
                break;
            };
            if !seen.insert(url.clone()) {
                warn!("Pagination loop detected at {}", url);
                break;
            }

            debug!("Fetching next project page {}", url);
            response = self.fetch_url(&url, RequestOptions::get()).await?;
        }

        Ok(projects)
    }
}

//! Hosting API client tests

mod common;

use std::collections::BTreeMap;

use axum::http::header;
use deploydash::errors::DashError;
use deploydash::http::client::{read_json, next_page_url, RequestOptions};
use deploydash::http::deployments::single_file_deployment;
use http::{HeaderMap, HeaderValue, Method};
use openapi_client::models::{
    AppLog, AppLogsQuery, Asset, CreateDeploymentRequest, Deployment, ListQuery, Project,
};
use tokio_test::{assert_err, assert_ok};

use common::{client_for, spawn_upstream, ORG_ID, TOKEN};

#[tokio::test]
async fn test_list_projects_without_query() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    let response = assert_ok!(client.list_projects(None).await);
    assert!(response.status().is_success());

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, format!("/v1/organizations/{}/projects", ORG_ID));
    assert_eq!(request.query.as_deref().unwrap_or(""), "");
    assert_eq!(
        request.header(header::AUTHORIZATION).as_deref(),
        Some(format!("Bearer {}", TOKEN).as_str())
    );
    assert_eq!(
        request.header(header::CONTENT_TYPE).as_deref(),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_list_projects_with_query() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    let query = ListQuery {
        limit: Some(5),
        q: Some("demo".to_string()),
        ..Default::default()
    };
    let response = assert_ok!(client.list_projects(Some(&query)).await);
    let projects: Vec<Project> = assert_ok!(read_json(response).await);
    assert_eq!(projects[0].id, "p-1");

    let requests = upstream.requests();
    assert_eq!(requests[0].query.as_deref(), Some("limit=5&q=demo"));
}

#[tokio::test]
async fn test_list_all_projects_follows_next_links() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    let projects = assert_ok!(client.list_all_projects().await);
    let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);

    let requests = upstream.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].query.as_deref(), Some("page=2"));
}

#[tokio::test]
async fn test_next_page_url_from_response() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    let response = assert_ok!(client.list_projects(None).await);
    assert_eq!(
        next_page_url(&response),
        Some(format!(
            "{}/v1/organizations/{}/projects?page=2",
            upstream.base_url, ORG_ID
        ))
    );
}

#[tokio::test]
async fn test_create_project_body() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    assert_ok!(client.create_project(Some("demo")).await);
    assert_ok!(client.create_project(None).await);

    let requests = upstream.requests();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, format!("/v1/organizations/{}/projects", ORG_ID));
    assert_eq!(requests[0].json(), serde_json::json!({ "name": "demo" }));
    assert_eq!(requests[1].json(), serde_json::json!({}));
}

#[tokio::test]
async fn test_create_deployment_posts_options_verbatim() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    let mut deployment = single_file_deployment("Deno.serve(() => new Response('ok'))");
    deployment
        .assets
        .insert("util.ts".to_string(), Asset::Symlink { target: "main.ts".to_string() });
    deployment.env_vars = BTreeMap::from([("MODE".to_string(), "test".to_string())]);
    deployment.description = Some("from test".to_string());

    let response = assert_ok!(client.create_deployment("p-1", &deployment).await);
    let created: Deployment = assert_ok!(read_json(response).await);
    assert_eq!(created.id, "d-new");

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/v1/projects/p-1/deployments");
    assert_eq!(requests[0].json(), serde_json::to_value(&deployment).unwrap());

    let decoded: CreateDeploymentRequest = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(decoded, deployment);
}

#[tokio::test]
async fn test_list_deployments_and_app_logs() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    let response = assert_ok!(client.list_deployments("p-1", None).await);
    let deployments: Vec<Deployment> = assert_ok!(read_json(response).await);
    assert_eq!(deployments.len(), 1);
    assert_eq!(deployments[0].domains, vec!["p-1-d-1.example.dev"]);

    let query = AppLogsQuery {
        level: Some("error".to_string()),
        ..Default::default()
    };
    let response = assert_ok!(client.list_app_logs("d-1", Some(&query)).await);
    let logs: Vec<AppLog> = assert_ok!(read_json(response).await);
    assert_eq!(logs[0].message, "listening");

    let requests = upstream.requests();
    assert_eq!(requests[0].path, "/v1/projects/p-1/deployments");
    assert_eq!(requests[1].path, "/v1/deployments/d-1/app_logs");
    assert_eq!(requests[1].query.as_deref(), Some("level=error"));
}

#[tokio::test]
async fn test_ids_are_encoded_as_one_path_segment() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    assert_ok!(client.list_deployments("team/app?x=1#top", None).await);
    assert_ok!(client.list_app_logs("d 1", None).await);

    let requests = upstream.requests();
    assert_eq!(requests[0].path, "/v1/projects/team%2Fapp%3Fx%3D1%23top/deployments");
    assert_eq!(requests[0].query.as_deref().unwrap_or(""), "");
    assert_eq!(requests[1].path, "/v1/deployments/d%201/app_logs");
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    headers.insert("x-request-id", HeaderValue::from_static("abc"));
    let options = RequestOptions {
        headers,
        ..Default::default()
    };

    assert_ok!(client.fetch("/deployments/d-1/app_logs", options).await);

    let request = &upstream.requests()[0];
    assert_eq!(request.header(header::CONTENT_TYPE).as_deref(), Some("text/plain"));
    assert_eq!(request.headers.get("x-request-id").unwrap(), "abc");
    assert_eq!(
        request.header(header::AUTHORIZATION).as_deref(),
        Some(format!("Bearer {}", TOKEN).as_str())
    );
}

#[tokio::test]
async fn test_fetch_url_skips_endpoint() {
    let upstream = spawn_upstream().await;
    let client = client_for("http://unused.invalid/v1");

    let url = format!("{}/v1/deployments/d-9/app_logs?limit=1", upstream.base_url);
    assert_ok!(client.fetch_url(&url, RequestOptions::get()).await);

    let request = &upstream.requests()[0];
    assert_eq!(request.path, "/v1/deployments/d-9/app_logs");
    assert_eq!(request.query.as_deref(), Some("limit=1"));
}

#[tokio::test]
async fn test_error_status_is_reported_by_read_json() {
    let upstream = spawn_upstream().await;
    let client = upstream.client();

    let response = assert_ok!(client.list_deployments("", None).await);
    assert_eq!(response.status().as_u16(), 404);

    let result: Result<Vec<Deployment>, DashError> = read_json(response).await;
    match result {
        Err(DashError::Api { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("projectNotFound"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_network_failure_propagates() {
    let client = client_for("http://127.0.0.1:1/v1");

    let result = client.list_projects(None).await;
    assert!(matches!(assert_err!(result), DashError::HttpError(_)));
}

//! Local stand-in for the hosting API

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use deploydash::http::client::{ApiClient, ClientOptions};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";
pub const ORG_ID: &str = "org-1";

/// A request seen by the upstream
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: header::HeaderName) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone)]
pub struct Upstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Upstream {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1", self.base_url)
    }

    pub fn client(&self) -> ApiClient {
        client_for(&self.endpoint())
    }
}

pub fn client_for(endpoint: &str) -> ApiClient {
    let options = ClientOptions {
        access_token: Some(TOKEN.to_string()),
        org_id: Some(ORG_ID.to_string()),
        endpoint: Some(endpoint.to_string()),
        timeout: Some(Duration::from_secs(5)),
    };
    ApiClient::with_env(options, |_| None).unwrap()
}

pub fn project(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z",
    })
}

pub fn deployment(id: &str, project_id: &str) -> Value {
    json!({
        "id": id,
        "projectId": project_id,
        "status": "success",
        "domains": [format!("{}-{}.example.dev", project_id, id)],
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:05:00Z",
    })
}

/// Start the upstream on an ephemeral port
pub async fn spawn_upstream() -> Upstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let upstream = Upstream {
        base_url: format!("http://{}", addr),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .fallback(handle)
        .with_state(upstream.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    upstream
}

async fn handle(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    upstream.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: body.clone(),
    });

    let segments: Vec<&str> = uri.path().split('/').skip(2).collect();
    let query = uri.query().unwrap_or("");

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["organizations", org, "projects"]) => {
            if query.contains("page=2") {
                Json(json!([{ "id": "p-2", "name": "beta" }])).into_response()
            } else {
                let next = format!(
                    "<{}/v1/organizations/{}/projects?page=2>; rel=\"next\"",
                    upstream.base_url, org
                );
                ([(header::LINK, next)], Json(json!([project("p-1", "alpha")]))).into_response()
            }
        }
        ("POST", ["organizations", _, "projects"]) => {
            let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            let name = request["name"].as_str().unwrap_or("generated-name");
            if name == "taken" {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({"code": "projectNameInUse", "message": "taken"})),
                )
                    .into_response();
            }
            (StatusCode::OK, Json(project("p-new", name))).into_response()
        }
        ("GET", ["projects", "", "deployments"]) => (
            StatusCode::NOT_FOUND,
            Json(json!({"code": "projectNotFound", "message": "project not found"})),
        )
            .into_response(),
        ("GET", ["projects", project_id, "deployments"]) => {
            if *project_id == "empty" {
                Json(json!([])).into_response()
            } else {
                Json(json!([deployment("d-1", project_id)])).into_response()
            }
        }
        ("POST", ["projects", project_id, "deployments"]) => {
            let mut created = deployment("d-new", project_id);
            created["status"] = json!("pending");
            Json(created).into_response()
        }
        ("GET", ["deployments", _, "app_logs"]) => Json(json!([{
            "time": "2024-05-01T10:06:00Z",
            "level": "info",
            "message": "listening",
            "region": "gcp-europe-west3",
        }]))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"code": "notFound"}))).into_response(),
    }
}

//! Hosting API client

use std::time::Duration;

use http::{HeaderMap, HeaderValue, Method};
use reqwest::{header, Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::errors::DashError;
use crate::url::url_join;

/// Default base URL of the hosting API
pub const DEFAULT_ENDPOINT: &str = "https://api.deno.com/v1";

/// Environment fallback for the bearer token
pub const ACCESS_TOKEN_ENV: &str = "DEPLOY_ACCESS_TOKEN";

/// Environment fallback for the organization id
pub const ORG_ID_ENV: &str = "DEPLOY_ORG_ID";

/// Environment override for the endpoint
pub const ENDPOINT_ENV: &str = "DEPLOY_API_ENDPOINT";

/// Client construction options
///
/// Unset values are resolved from the environment when the client is built.
#[derive(Clone, Default)]
pub struct ClientOptions {
    pub access_token: Option<String>,
    pub org_id: Option<String>,
    pub endpoint: Option<String>,

    /// Per-request timeout, none by default
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("org_id", &self.org_id)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Options of a single request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,

    /// Merged over the default headers, replacing them per name
    pub headers: HeaderMap,

    pub body: Option<String>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    /// POST with a JSON encoded body
    pub fn post_json<B: Serialize>(body: &B) -> Result<Self, DashError> {
        Ok(Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: Some(serde_json::to_string(body)?),
        })
    }
}

/// Client of the hosting API
///
/// Every operation returns the raw response; decoding is left to the caller
/// (see [`read_json`]). Nothing is retried.
pub struct ApiClient {
    client: Client,
    endpoint: String,
    access_token: SecretString,
    authorization: HeaderValue,
    org_id: String,
}

impl ApiClient {
    /// Create a client, falling back to the process environment for unset options
    pub fn new(options: ClientOptions) -> Result<Self, DashError> {
        Self::with_env(options, |key| std::env::var(key).ok())
    }

    /// Create a client with an explicit environment lookup
    pub fn with_env<F>(options: ClientOptions, env: F) -> Result<Self, DashError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = resolve(options.access_token, &env, ACCESS_TOKEN_ENV).ok_or_else(|| {
            DashError::ConfigError(format!(
                "access token is missing, pass it explicitly or set {}",
                ACCESS_TOKEN_ENV
            ))
        })?;
        let org_id = resolve(options.org_id, &env, ORG_ID_ENV).ok_or_else(|| {
            DashError::ConfigError(format!(
                "organization id is missing, pass it explicitly or set {}",
                ORG_ID_ENV
            ))
        })?;
        let endpoint = resolve(options.endpoint, &env, ENDPOINT_ENV)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|_| {
                DashError::ConfigError("access token is not a valid header value".to_string())
            })?;
        authorization.set_sensitive(true);

        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint,
            access_token: SecretString::from(access_token),
            authorization,
            org_id,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, self.authorization.clone());
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers
    }

    /// Issue a request to a path relative to the endpoint
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> Result<Response, DashError> {
        let url = url_join([self.endpoint.as_str(), path]);
        self.fetch_url(&url, options).await
    }

    /// Issue a request to a complete URL, e.g. a pagination link
    pub async fn fetch_url(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, DashError> {
        let mut headers = self.default_headers();
        headers.extend(options.headers);

        debug!("{} {}", options.method, url);

        let mut request = self.client.request(options.method, url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        Ok(response)
    }
}

fn resolve<F>(explicit: Option<String>, env: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|value| !value.is_empty())
        .or_else(|| env(key))
        .filter(|value| !value.is_empty())
}

/// Serialize a typed query into a query string, skipping absent fields
pub fn encode_query<Q: Serialize>(query: Option<&Q>) -> Result<String, DashError> {
    let Some(query) = query else {
        return Ok(String::new());
    };

    let fields = match serde_json::to_value(query)? {
        serde_json::Value::Object(fields) => fields,
        serde_json::Value::Null => return Ok(String::new()),
        _ => {
            return Err(DashError::ValidationError(
                "query parameters must serialize to an object".to_string(),
            ))
        }
    };

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(value) => serializer.append_pair(&key, &value),
            value => serializer.append_pair(&key, &value.to_string()),
        };
    }
    Ok(serializer.finish())
}

/// Decode a successful response body
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, DashError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("API request failed: {} - {}", status, body);
        return Err(DashError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.json().await?;
    Ok(body)
}

/// URL of the next page advertised in the `Link` header
pub fn next_page_url(response: &Response) -> Option<String> {
    let link = response.headers().get(header::LINK)?.to_str().ok()?;
    parse_next_link(link)
}

fn parse_next_link(link: &str) -> Option<String> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

//! Application configuration options

use std::path::PathBuf;
use std::time::Duration;

use crate::http::client::ClientOptions;
use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Hosting API client configuration
    pub client: ClientOptions,

    /// Server configuration
    pub server: ServerOptions,
}

impl AppOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            client: ClientOptions {
                access_token: settings.api.access_token.clone(),
                org_id: settings.api.org_id.clone(),
                endpoint: settings.api.endpoint.clone(),
                timeout: settings.api.timeout_secs.map(Duration::from_secs),
            },
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
                static_dir: settings.server.static_dir.clone(),
            },
        }
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Root of the static assets, including the compiled frontend
    pub static_dir: PathBuf,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            static_dir: PathBuf::from("static"),
        }
    }
}

//! Settings file management

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::errors::DashError;
use crate::logs::LogLevel;

/// Dashboard settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Local server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Hosting API configuration
    #[serde(default)]
    pub api: ApiSettings,
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DashError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).await.map_err(|e| {
            DashError::ConfigError(format!("unable to read {}: {}", path.display(), e))
        })?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }
}

/// Local server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Hosting API settings
///
/// Unset credentials fall back to `DEPLOY_ACCESS_TOKEN` and `DEPLOY_ORG_ID`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub org_id: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("endpoint", &self.endpoint)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("org_id", &self.org_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let settings: Settings =
            serde_json::from_str(r#"{"log_level":"debug","server":{"port":9000}}"#).unwrap();

        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.static_dir, PathBuf::from("static"));
        assert!(settings.api.access_token.is_none());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = Settings::load("/nonexistent/deploydash/settings.json").await;
        assert!(matches!(result, Err(DashError::ConfigError(_))));
    }
}

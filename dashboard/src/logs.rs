//! Logging configuration

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::DashError;

/// Verbosity of the dashboard's own logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Filter directives for this level
    ///
    /// The HTTP client stack stays at `warn`. Request traces from the router
    /// are emitted at `debug` and are kept down to `info`.
    pub fn directives(&self) -> String {
        let requests = if *self <= LogLevel::Info {
            LogLevel::Debug.min(*self)
        } else {
            *self
        };
        format!(
            "{},hyper=warn,reqwest=warn,tower_http={}",
            self.as_str(),
            requests.as_str()
        )
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "warning" {
            return Ok(LogLevel::Warn);
        }
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("Invalid log level: {}", s))
    }
}

/// Logging options
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Log level, overridden by `RUST_LOG`
    pub log_level: LogLevel,

    /// One JSON object per line instead of the human readable format
    pub json_format: bool,
}

/// Install the global subscriber
pub fn init_logging(options: LogOptions) -> Result<(), DashError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.log_level.directives()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if options.json_format {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| DashError::ConfigError(format!("logging already initialized: {}", e)))
}

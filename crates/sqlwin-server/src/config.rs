//! Server configuration, loaded from `sqlwin.yml`

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlwin_engine::RunnerConfig;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "sqlwin.yml";

/// Complete server configuration - can be loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server settings
    pub server: ServerSettings,
    /// Query runner limits
    pub engine: EngineSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Server network settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// How long a request waits for a free query slot, in milliseconds
    pub queue_timeout_ms: u64,
    /// Maximum number of queries running at once
    pub max_concurrent_queries: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            request_timeout_secs: 30,
            queue_timeout_ms: 10_000,
            max_concurrent_queries: 16,
        }
    }
}

/// Query runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Rows returned before a result is cut off
    pub max_rows: usize,
    /// Per-statement deadline in milliseconds
    pub query_timeout_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let runner = RunnerConfig::default();
        Self {
            max_rows: runner.max_rows,
            query_timeout_ms: runner.query_timeout.as_millis() as u64,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Include target in logs
    pub show_target: bool,
    /// Include thread IDs in logs
    pub show_thread_ids: bool,
    /// Include file and line numbers
    pub show_location: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_target: true,
            show_thread_ids: false,
            show_location: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ServerConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Write default config to a file
    pub fn write_default(path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(&Self::default())?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Get log level
    pub fn log_level(&self) -> Level {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Convert to RunnerConfig
    pub fn to_runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            max_rows: self.engine.max_rows,
            query_timeout: Duration::from_millis(self.engine.query_timeout_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Socket address to bind; IPv6 hosts such as `::` work unbracketed
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid bind address {}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Queue wait, capped so a queued query can still finish before the
    /// request timeout answers 408 in its place
    pub fn queue_timeout(&self) -> Duration {
        let budget = self
            .request_timeout()
            .saturating_sub(Duration::from_millis(self.engine.query_timeout_ms));
        Duration::from_millis(self.server.queue_timeout_ms).min(budget)
    }
}

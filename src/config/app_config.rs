use std::time::Duration;

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend gateway.
    pub base_url: String,
    /// Request timeout in seconds. Absent or zero means no timeout, the
    /// search backend can take a while.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Tenant identifier sent as the `app_id` header on every request.
    pub app_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DedupConfig {
    /// How long an in-flight entry may sit unsettled before it is dropped.
    pub inflight_ttl_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: None,
            app_id: "blog".to_string(),
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            inflight_ttl_ms: 5_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    /// Timeout as a duration, `None` when requests should wait indefinitely.
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            Some(0) | None => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        }
    }
}

impl DedupConfig {
    pub fn inflight_ttl(&self) -> Duration {
        Duration::from_millis(self.inflight_ttl_ms)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub runpod: RunpodConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunpodConfig {
    #[serde(default = "default_runpod_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub endpoint_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub mode: CallMode,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

/// How a request reaches the remote endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallMode {
    /// POST `/runsync` and wait for the result in the same response.
    #[default]
    Sync,
    /// POST `/run`, then poll `/status/{id}` until the job settles.
    Async,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_mb")]
    pub max_file_mb: u64,
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl RunpodConfig {
    pub fn is_configured(&self) -> bool {
        !self.endpoint_id.is_empty() && !self.api_key.is_empty()
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint_id
        )
    }

    pub fn runsync_url(&self) -> String {
        format!("{}/runsync", self.endpoint_url())
    }

    pub fn run_url(&self) -> String {
        format!("{}/run", self.endpoint_url())
    }

    pub fn status_url(&self, job_id: &str) -> String {
        format!("{}/status/{}", self.endpoint_url(), job_id)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl UploadConfig {
    pub fn max_file_bytes(&self) -> usize {
        usize::try_from(self.max_file_mb)
            .unwrap_or(usize::MAX)
            .saturating_mul(1024 * 1024)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for RunpodConfig {
    fn default() -> Self {
        Self {
            base_url: default_runpod_base_url(),
            endpoint_id: String::new(),
            api_key: String::new(),
            mode: CallMode::default(),
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_mb: default_max_file_mb(),
            allowed_types: default_allowed_types(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_runpod_base_url() -> String {
    "https://api.runpod.ai/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    180
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    180
}

fn default_max_file_mb() -> u64 {
    5
}

fn default_allowed_types() -> Vec<String> {
    ["image/jpeg", "image/jpg", "image/png", "image/webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

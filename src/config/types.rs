// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub proxy: ProxyConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Outbound fetch policy for `/proxy`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Deadline for the whole outbound exchange, body included
    pub timeout_ms: u64,
    /// Largest accepted image body in bytes
    pub max_bytes: u64,
    /// Redirect hops followed before giving up
    pub max_redirects: usize,
    #[serde(default)]
    pub browser: BrowserProfile,
}

impl ProxyConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 20_000,
            max_bytes: 10 * 1024 * 1024,
            max_redirects: 10,
            browser: BrowserProfile::default(),
        }
    }
}

/// Header values presented to origins so requests look like a browser
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BrowserProfile {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117 Safari/537.36".to_string()
}

fn default_accept() -> String {
    "image/avif,image/webp,image/apng,image/*,*/*;q=0.8".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written to the server log: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

/// Static directory served at the web root
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StaticFilesConfig {
    #[serde(default = "default_static_root")]
    pub root: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

fn default_static_root() -> String {
    "public".to_string()
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: default_static_root(),
            index_files: default_index_files(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

fn default_healthz_path() -> String {
    "/healthz".to_string()
}

fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Assets fetched once at startup when they are missing locally
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BootstrapConfig {
    #[serde(default = "default_bootstrap_timeout")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub assets: Vec<BootstrapAsset>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_bootstrap_timeout() -> u64 {
    30_000
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_bootstrap_timeout(),
            assets: Vec::new(),
        }
    }
}

/// A single startup asset: file path relative to the static root, and its source
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BootstrapAsset {
    pub file: String,
    pub url: String,
}

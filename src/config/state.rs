// Application state module
// Holds the configuration and the outbound client shared by all connections

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::proxy::{self, ProxyError};

/// Application state
///
/// Built once at startup and shared read-only behind an `Arc`.
pub struct AppState {
    pub config: Config,
    /// Outbound HTTP client carrying the redirect policy
    pub client: reqwest::Client,
    /// Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ProxyError> {
        let client = proxy::build_client(&config.proxy)?;
        let cached_access_log = Arc::new(AtomicBool::new(config.logging.access_log));

        Ok(Self {
            config,
            client,
            cached_access_log,
        })
    }
}
